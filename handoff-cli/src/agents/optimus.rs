//! The coordinator of the demo REPL.
//!
//! Besides routing requests to the other agents it manages the session
//! itself: leaving the REPL, trimming or listing the history and changing
//! the log level.

use handoff_core::error::BoxError;
use handoff_core::{ChatMessage, Param};
use handoff_tools::{AgentDeclaration, CapabilityOutput, Member};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Developer-context key set when the user asks to leave.
pub const EXIT_KEY: &str = "exit";

/// Replaces the active log filter with the given directive.
pub type LevelSwitch = Arc<dyn Fn(&str) -> Result<(), BoxError> + Send + Sync>;

pub struct Optimus {
    levels: LevelSwitch,
}

const INSTRUCTIONS: &str = "You are Optimus, the central command unit of the Handoff \
    REPL. Evaluate every incoming request and dispatch it to the specialised agent \
    best suited for it. Be clear, decisive and precise, and take requests back \
    when no other agent fits.";

pub fn declaration(levels: LevelSwitch) -> AgentDeclaration {
    AgentDeclaration::coordinator::<Optimus>("Optimus", module_path!())
        .model("gpt-4o")
        .instructions(INSTRUCTIONS)
        .description(
            "Use me to coordinate multiple agents or to return control to the agent in charge.",
        )
        .construct_with(move || {
            Ok(Optimus {
                levels: Arc::clone(&levels),
            })
        })
        .static_capability(
            Member::new("exit", "Exit the program").param(Param::context()),
            |mut frame| {
                info!("Exit requested");
                frame.context()?.insert(EXIT_KEY, Value::Bool(true));
                Ok("Exiting program...".into())
            },
        )
        .static_capability(
            Member::new("clear_history", "Clear the history of the conversation")
                .param(Param::context()),
            |mut frame| {
                let history = frame.context()?.history_mut();
                let keep_from = history.len().saturating_sub(1);
                history.drain(..keep_from);
                Ok("History cleared.".into())
            },
        )
        .static_capability(
            Member::new(
                "get_history",
                "Get the history of the conversation. Always return these messages as a markdown bullet list.",
            )
            .param(Param::context()),
            |mut frame| {
                let lines: Vec<String> = frame
                    .context()?
                    .history()
                    .iter()
                    .map(render_message)
                    .collect();
                CapabilityOutput::json(&lines)
            },
        )
        .static_capability(Member::new("random_string", "Get a random string"), |_frame| {
            Ok(format!("Random String: {}", uuid::Uuid::new_v4()).into())
        })
        .capability(
            Member::new(
                "change_log_level",
                "Change the log level. One of trace, debug, info, warn or error.",
            )
            .param(Param::of::<String>().describe("the new level"))
            .global(),
            |optimus, frame| {
                let level: String = frame.arg(0)?;
                let level = level.trim().to_lowercase();
                level.parse::<tracing::Level>()?;
                (optimus.levels)(&level)?;
                info!(level = %level, "Log level changed");
                Ok(format!("Log level changed to {level}").into())
            },
        )
        .build()
}

/// One line of the rendered history.
pub fn render_message(message: &ChatMessage) -> String {
    match message {
        ChatMessage::Assistant(reply) if reply.has_tool_calls() => {
            let calls: Vec<String> = reply
                .tool_calls
                .iter()
                .map(|call| format!("{}({})", call.name(), call.arguments()))
                .collect();
            format!("assistant: {}", calls.join(", "))
        }
        other => format!("{}: {}", other.role(), other.content()),
    }
}
