//! Builders for completions, tool calls and a small two-agent catalog.

use handoff_agent::{ChatCompletionResponse, Choice};
use handoff_core::{AssistantMessage, Param, ParamType, ToolCall};
use handoff_tools::{AgentCatalog, AgentDeclaration, Member};
use serde_json::{Value, json};

/// Search scope of [`catalog`].
pub const SCOPE: &str = "fixtures";

/// Wrap an assistant turn into a single-choice completion.
pub fn completion(message: AssistantMessage) -> ChatCompletionResponse {
    let finish_reason = if message.has_tool_calls() {
        "tool_calls"
    } else {
        "stop"
    };
    ChatCompletionResponse {
        id: Some(format!("chatcmpl-{}", uuid::Uuid::new_v4().simple())),
        model: Some("gpt-4o".to_string()),
        choices: vec![Choice {
            index: 0,
            message,
            finish_reason: Some(finish_reason.to_string()),
        }],
    }
}

/// A tool call with a generated id.
pub fn tool_call(name: &str, arguments: &str) -> ToolCall {
    ToolCall::function(
        format!("call_{}", uuid::Uuid::new_v4().simple()),
        name,
        arguments,
    )
}

/// A tool call whose arguments are given as JSON.
pub fn tool_call_json(name: &str, arguments: Value) -> ToolCall {
    tool_call(name, &arguments.to_string())
}

/// State of the fixture agents.
#[derive(Debug, Default)]
pub struct Desk {
    pub greeting: String,
}

/// Two agents in [`SCOPE`]:
///
/// - `Coordinator` (id 0): no members besides its handoff capability
/// - `Helper` (id 1): `lookup_order(order_id)`, `remember(ctx, key, value)`
///   and `join_tags(tags)`
pub fn catalog() -> AgentCatalog {
    let coordinator = AgentDeclaration::coordinator::<Desk>("Coordinator", "fixtures::desk")
        .instructions("Route the user to the right agent.")
        .description("Routes requests to the right agent")
        .construct_with(|| Ok(Desk::default()))
        .build();

    let helper = AgentDeclaration::agent::<Desk>("Helper", "fixtures::desk::helper")
        .model("gpt-4o-mini")
        .instructions("Answer questions about orders.")
        .description("Answers questions about orders")
        .construct_with(|| {
            Ok(Desk {
                greeting: "Hello from Helper".to_string(),
            })
        })
        .capability(
            Member::new("lookup_order", "Look up the status of an order")
                .param(Param::of::<String>().describe("order id")),
            |_desk, frame| {
                let order_id: String = frame.arg(0)?;
                Ok(format!("order {order_id}: shipped").into())
            },
        )
        .capability(
            Member::new("remember", "Store a value in the developer context")
                .param(Param::context())
                .param(Param::of::<String>())
                .param(Param::value(ParamType::Object)),
            |_desk, mut frame| {
                let key: String = frame.arg(0)?;
                let value: Value = frame.arg(1)?;
                frame.context()?.insert(key, value);
                Ok(json!({"stored": true}).into())
            },
        )
        .capability(
            Member::new("join_tags", "Join tags with commas")
                .param(Param::of::<Vec<String>>()),
            |_desk, frame| {
                let tags: Vec<String> = frame.arg(0)?;
                Ok(tags.join(",").into())
            },
        )
        .capability(Member::new("greet", "Greet the user"), |desk, _frame| {
            Ok(desk.greeting.clone().into())
        })
        .build();

    let mut catalog = AgentCatalog::new();
    for declaration in [coordinator, helper] {
        catalog
            .register(declaration)
            .expect("fixture agent names are unique");
    }
    catalog
}
