//! Argument marshalling and capability execution.

use crate::capability::{Arguments, CallFrame, Capability, CapabilityOutput, CapabilityTarget};
use handoff_core::ConversationContext;
use handoff_core::error::{InvocationError, InvocationResult};
use handoff_core::schema::{Param, ParamKind, argument_key};
use handoff_core::value::{coerce, json_kind};
use serde_json::{Map, Value};
use tracing::debug;

/// Parse a model-supplied arguments payload.
///
/// An empty payload counts as `{}`. Anything but a JSON object is rejected.
pub fn parse_payload(payload: &str) -> InvocationResult<Map<String, Value>> {
    if payload.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(payload)? {
        Value::Object(fields) => Ok(fields),
        other => Err(InvocationError::MalformedArguments {
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

/// Map a payload onto the visible parameters of `params`.
///
/// Each visible parameter is read from `arg<i>`, `i` counting visible
/// parameters only, and coerced to its declared type. Keys without a
/// matching parameter are ignored.
pub fn marshal_arguments(params: &[Param], payload: &str) -> InvocationResult<Arguments> {
    let mut fields = parse_payload(payload)?;
    let mut values = Vec::with_capacity(params.len());

    for ty in params.iter().filter_map(|param| match &param.kind {
        ParamKind::Context => None,
        ParamKind::Value(ty) => Some(ty),
    }) {
        let key = argument_key(values.len());
        let raw = fields
            .remove(&key)
            .ok_or_else(|| InvocationError::MissingArgument { key: key.clone() })?;
        values.push(coerce(ty, &key, &raw)?);
    }

    Ok(Arguments::new(values))
}

/// Invoke `capability` with a model-supplied payload.
///
/// The context is passed to the handler only when the capability declares
/// it. Handler failures are reported as [`InvocationError::Execution`],
/// unless the handler itself returned an [`InvocationError`].
pub fn invoke(
    capability: &Capability,
    context: ConversationContext<'_>,
    payload: &str,
) -> InvocationResult<CapabilityOutput> {
    debug!(
        capability = %capability.name(),
        has_context = capability.has_context(),
        "Invoking capability"
    );

    let args = marshal_arguments(capability.params(), payload)?;

    match capability.target() {
        CapabilityTarget::Handoff(agent) => Ok(CapabilityOutput::Handoff(agent.clone())),
        CapabilityTarget::Handler(handler) => {
            let context = capability.has_context().then_some(context);
            handler(CallFrame::new(context, args)).map_err(|err| {
                match err.downcast::<InvocationError>() {
                    Ok(invocation) => *invocation,
                    Err(source) => InvocationError::Execution {
                        capability: capability.name().to_string(),
                        source,
                    },
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{CapabilityScope, Handler};
    use handoff_core::{
        Agent, AgentId, AgentProfile, AgentRole, CapabilityName, ChatMessage, DeveloperContext,
        ParamType,
    };
    use serde_json::json;
    use std::sync::Arc;

    fn capability(params: Vec<Param>, handler: Handler) -> Capability {
        Capability::new(
            CapabilityName::new_unchecked("0_Test_member"),
            "test member",
            params,
            CapabilityScope::Instance,
            None,
            CapabilityTarget::Handler(handler),
        )
    }

    #[test]
    fn test_round_trip_of_string_and_list() {
        let params = vec![
            Param::value(ParamType::String),
            Param::value(ParamType::array_of(ParamType::String)),
        ];
        let args = marshal_arguments(&params, r#"{"arg0":"x","arg1":["a","b"]}"#).unwrap();
        assert_eq!(args.values(), &[json!("x"), json!(["a", "b"])]);
        assert_eq!(args.get::<String>(0).unwrap(), "x");
        assert_eq!(args.get::<Vec<String>>(1).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_context_parameter_does_not_consume_a_key() {
        let params = vec![Param::context(), Param::value(ParamType::Integer)];
        let args = marshal_arguments(&params, r#"{"arg0": "42"}"#).unwrap();
        assert_eq!(args.values(), &[json!(42)]);
    }

    #[test]
    fn test_missing_argument_names_key() {
        let params = vec![Param::of::<String>(), Param::of::<i32>()];
        let err = marshal_arguments(&params, r#"{"arg0": "x"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Missing argument for parameter: arg1");
    }

    #[test]
    fn test_empty_payload_is_empty_object() {
        assert!(marshal_arguments(&[], "").unwrap().is_empty());
        assert!(marshal_arguments(&[], "  ").unwrap().is_empty());
    }

    #[test]
    fn test_non_object_payload_is_malformed() {
        for payload in ["[1, 2]", "\"arg0\"", "{not json"] {
            let err = marshal_arguments(&[], payload).unwrap_err();
            assert_eq!(err.error_code(), "MALFORMED_ARGUMENTS", "payload: {payload}");
        }
    }

    #[test]
    fn test_invoke_injects_context() {
        let handler: Handler = Arc::new(|mut frame: CallFrame<'_>| {
            let city: String = frame.arg(0)?;
            let ctx = frame.context()?;
            ctx.insert("last_city", city.clone());
            ctx.history_mut().clear();
            Ok(format!("noted {city}").into())
        });
        let capability = capability(vec![Param::context(), Param::of::<String>()], handler);

        let mut history = vec![ChatMessage::user("hi")];
        let mut developer = DeveloperContext::new();
        let output = invoke(
            &capability,
            ConversationContext::new(&mut history, &mut developer),
            r#"{"arg0": "Paris"}"#,
        )
        .unwrap();

        assert_eq!(output.to_content(), "noted Paris");
        assert!(history.is_empty());
        assert_eq!(developer.get("last_city"), Some(&json!("Paris")));
    }

    #[test]
    fn test_invoke_without_declared_context_hides_it() {
        let handler: Handler = Arc::new(|frame: CallFrame<'_>| Ok(json!(frame.has_context()).into()));
        let capability = capability(vec![], handler);
        let mut history = Vec::new();
        let mut developer = DeveloperContext::new();
        let output = invoke(
            &capability,
            ConversationContext::new(&mut history, &mut developer),
            "{}",
        )
        .unwrap();
        assert_eq!(output, CapabilityOutput::Value(json!(false)));
    }

    #[test]
    fn test_handler_failure_is_execution_error() {
        let handler: Handler = Arc::new(|_frame: CallFrame<'_>| Err("station offline".into()));
        let capability = capability(vec![], handler);
        let mut history = Vec::new();
        let mut developer = DeveloperContext::new();
        let err = invoke(
            &capability,
            ConversationContext::new(&mut history, &mut developer),
            "",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InvocationError::Execution { ref capability, .. } if capability == "0_Test_member"
        ));
        assert!(err.to_string().contains("station offline"));
    }

    #[test]
    fn test_handoff_target_yields_agent() {
        let agent = Agent::new(AgentId::new(1), AgentProfile::new("Helper", AgentRole::Member));
        let capability = Capability::new(
            CapabilityName::new_unchecked("1_Helper_transfer_to_agent"),
            "",
            Vec::new(),
            CapabilityScope::Global,
            Some(agent.clone()),
            CapabilityTarget::Handoff(agent.clone()),
        );
        let mut history = Vec::new();
        let mut developer = DeveloperContext::new();
        let output = invoke(
            &capability,
            ConversationContext::new(&mut history, &mut developer),
            "{}",
        )
        .unwrap();
        assert_eq!(output.as_handoff(), Some(&agent));
    }
}
