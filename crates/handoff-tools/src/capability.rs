//! Capability model.
//!
//! A [`Capability`] is one callable entry advertised to the model: its
//! validated name, a description, the JSON schema of its parameters, the
//! agent it is bound to and an executable [`CapabilityTarget`].

use handoff_core::error::{BoxError, InvocationError, InvocationResult};
use handoff_core::schema::{Param, argument_key};
use handoff_core::value::json_kind;
use handoff_core::{Agent, CapabilityName, ConversationContext};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Where a capability is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityScope {
    /// Visible only while the owning agent is active.
    Instance,
    /// Bound to an agent instance but visible to every agent.
    Global,
    /// Not bound to an instance; visible to every agent.
    Static,
}

impl CapabilityScope {
    pub fn is_global(self) -> bool {
        !matches!(self, CapabilityScope::Instance)
    }
}

/// Executable body of a declared capability.
pub type Handler =
    Arc<dyn Fn(CallFrame<'_>) -> Result<CapabilityOutput, BoxError> + Send + Sync + 'static>;

/// What runs when a capability is invoked.
#[derive(Clone)]
pub enum CapabilityTarget {
    /// A declared member, already bound to its agent instance.
    Handler(Handler),
    /// The implicit "transfer to" capability of an agent.
    Handoff(Agent),
}

impl fmt::Debug for CapabilityTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityTarget::Handler(_) => f.write_str("Handler(..)"),
            CapabilityTarget::Handoff(agent) => f.debug_tuple("Handoff").field(agent).finish(),
        }
    }
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityOutput {
    Value(Value),
    /// Switch the active agent.
    Handoff(Agent),
}

impl CapabilityOutput {
    /// Serialize any value into an output.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, BoxError> {
        Ok(CapabilityOutput::Value(serde_json::to_value(value)?))
    }

    /// Output with no meaningful value.
    pub fn unit() -> Self {
        CapabilityOutput::Value(Value::Null)
    }

    pub fn as_handoff(&self) -> Option<&Agent> {
        match self {
            CapabilityOutput::Handoff(agent) => Some(agent),
            CapabilityOutput::Value(_) => None,
        }
    }

    /// Text sent back to the model as the tool response content.
    ///
    /// Strings are sent verbatim, any other value as compact JSON.
    pub fn to_content(&self) -> String {
        match self {
            CapabilityOutput::Value(Value::String(text)) => text.clone(),
            CapabilityOutput::Value(value) => value.to_string(),
            CapabilityOutput::Handoff(agent) => agent.name().to_string(),
        }
    }
}

impl From<Value> for CapabilityOutput {
    fn from(value: Value) -> Self {
        CapabilityOutput::Value(value)
    }
}

impl From<String> for CapabilityOutput {
    fn from(text: String) -> Self {
        CapabilityOutput::Value(Value::String(text))
    }
}

impl From<&str> for CapabilityOutput {
    fn from(text: &str) -> Self {
        CapabilityOutput::Value(Value::String(text.to_string()))
    }
}

impl From<Agent> for CapabilityOutput {
    fn from(agent: Agent) -> Self {
        CapabilityOutput::Handoff(agent)
    }
}

/// Marshalled values of the visible parameters, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Deserialize the visible argument at `index`.
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> InvocationResult<T> {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| InvocationError::MissingArgument {
                key: argument_key(index),
            })?;
        serde_json::from_value(value.clone()).map_err(|_| InvocationError::TypeMismatch {
            key: argument_key(index),
            expected: std::any::type_name::<T>().to_string(),
            found: json_kind(value).to_string(),
        })
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Everything a handler receives for one call.
#[derive(Debug)]
pub struct CallFrame<'a> {
    context: Option<ConversationContext<'a>>,
    args: Arguments,
}

impl<'a> CallFrame<'a> {
    pub fn new(context: Option<ConversationContext<'a>>, args: Arguments) -> Self {
        Self { context, args }
    }

    pub fn args(&self) -> &Arguments {
        &self.args
    }

    /// Shorthand for `self.args().get(index)`.
    pub fn arg<T: DeserializeOwned>(&self, index: usize) -> InvocationResult<T> {
        self.args.get(index)
    }

    /// The conversation context, present when the capability declares it.
    pub fn context(&mut self) -> Result<&mut ConversationContext<'a>, BoxError> {
        self.context
            .as_mut()
            .ok_or_else(|| "capability does not declare a context parameter".into())
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }
}

/// A registered capability.
#[derive(Debug, Clone)]
pub struct Capability {
    name: CapabilityName,
    description: String,
    parameters: Value,
    params: Arc<[Param]>,
    scope: CapabilityScope,
    owner: Option<Agent>,
    target: CapabilityTarget,
}

impl Capability {
    pub fn new(
        name: CapabilityName,
        description: impl Into<String>,
        params: impl Into<Arc<[Param]>>,
        scope: CapabilityScope,
        owner: Option<Agent>,
        target: CapabilityTarget,
    ) -> Self {
        let params = params.into();
        Self {
            name,
            description: description.into(),
            parameters: handoff_core::parameters_schema(&params),
            params,
            scope,
            owner,
            target,
        }
    }

    pub fn name(&self) -> &CapabilityName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// JSON schema of the visible parameters.
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn scope(&self) -> CapabilityScope {
        self.scope
    }

    pub fn is_global(&self) -> bool {
        self.scope.is_global()
    }

    /// The bound agent instance; `None` for static capabilities.
    pub fn owner(&self) -> Option<&Agent> {
        self.owner.as_ref()
    }

    /// Whether the first parameter receives the conversation context.
    pub fn has_context(&self) -> bool {
        self.params.first().is_some_and(Param::is_context)
    }

    pub fn target(&self) -> &CapabilityTarget {
        &self.target
    }

    pub fn is_handoff(&self) -> bool {
        matches!(self.target, CapabilityTarget::Handoff(_))
    }
}
