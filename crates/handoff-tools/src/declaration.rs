//! Agent declarations and the catalog they are discovered from.
//!
//! Agents are declared explicitly: a typed builder collects the agent's
//! metadata, a constructor for its state and one handler per capability
//! member. [`AgentDeclarationBuilder::build`] erases the state type so
//! declarations of different agents can live in one [`AgentCatalog`].
//!
//! ```rust
//! use handoff_tools::{AgentCatalog, AgentDeclaration, Member};
//! use handoff_core::Param;
//!
//! struct Greeter;
//!
//! let greeter = AgentDeclaration::coordinator::<Greeter>("Greeter", module_path!())
//!     .instructions("Greet the user.")
//!     .construct_with(|| Ok(Greeter))
//!     .capability(
//!         Member::new("greet", "Greet someone").param(Param::of::<String>()),
//!         |_agent: &Greeter, frame| {
//!             let name: String = frame.arg(0)?;
//!             Ok(format!("Hello, {name}!").into())
//!         },
//!     )
//!     .build();
//!
//! let mut catalog = AgentCatalog::new();
//! catalog.register(greeter).unwrap();
//! assert_eq!(catalog.discover(module_path!()).len(), 1);
//! ```

use crate::capability::{CallFrame, CapabilityOutput, CapabilityScope, Handler};
use handoff_core::error::{BoxError, ConfigError};
use handoff_core::{AgentProfile, AgentRole, Param};
use std::fmt;
use std::sync::Arc;

/// Declared metadata of one capability member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub description: String,
    pub params: Vec<Param>,
    pub scope: CapabilityScope,
}

impl Member {
    /// An instance-scoped member with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
            scope: CapabilityScope::Instance,
        }
    }

    /// Append a parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Make the member visible to every agent.
    pub fn global(mut self) -> Self {
        self.scope = CapabilityScope::Global;
        self
    }
}

type InstanceHandler<T> =
    Arc<dyn Fn(&T, CallFrame<'_>) -> Result<CapabilityOutput, BoxError> + Send + Sync + 'static>;

enum Binding<T> {
    Instance(InstanceHandler<T>),
    Static(Handler),
}

type Constructor<T> = Arc<dyn Fn() -> Result<T, BoxError> + Send + Sync + 'static>;
type Factory = Box<dyn Fn() -> Result<Vec<Handler>, BoxError> + Send + Sync + 'static>;

/// Typed builder for an [`AgentDeclaration`].
pub struct AgentDeclarationBuilder<T> {
    profile: AgentProfile,
    module: String,
    constructor: Option<Constructor<T>>,
    members: Vec<(Member, Binding<T>)>,
}

impl<T: Send + Sync + 'static> AgentDeclarationBuilder<T> {
    fn new(name: impl Into<String>, module: impl Into<String>, role: AgentRole) -> Self {
        Self {
            profile: AgentProfile::new(name, role),
            module: module.into(),
            constructor: None,
            members: Vec::new(),
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.profile = self.profile.with_model(model);
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.profile = self.profile.with_instructions(instructions);
        self
    }

    /// Description shown in the agent's "transfer to" capability.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.profile = self.profile.with_description(description);
        self
    }

    /// Set the function creating the agent's state when the registry is built.
    pub fn construct_with<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    /// Add a member bound to the agent's state.
    pub fn capability<F>(mut self, member: Member, handler: F) -> Self
    where
        F: Fn(&T, CallFrame<'_>) -> Result<CapabilityOutput, BoxError> + Send + Sync + 'static,
    {
        self.members.push((member, Binding::Instance(Arc::new(handler))));
        self
    }

    /// Add a member that does not use the agent's state. Always global.
    pub fn static_capability<F>(mut self, mut member: Member, handler: F) -> Self
    where
        F: Fn(CallFrame<'_>) -> Result<CapabilityOutput, BoxError> + Send + Sync + 'static,
    {
        member.scope = CapabilityScope::Static;
        self.members.push((member, Binding::Static(Arc::new(handler))));
        self
    }

    pub fn build(self) -> AgentDeclaration {
        let agent_name = self.profile.name.clone();
        let constructor = self.constructor;
        let (members, bindings): (Vec<Member>, Vec<Binding<T>>) = self.members.into_iter().unzip();

        let factory: Factory = Box::new(move || -> Result<Vec<Handler>, BoxError> {
            let constructor = constructor
                .as_ref()
                .ok_or_else(|| format!("no constructor declared for agent '{agent_name}'"))?;
            let instance = Arc::new(constructor()?);
            Ok(bindings
                .iter()
                .map(|binding| match binding {
                    Binding::Instance(handler) => {
                        let instance = Arc::clone(&instance);
                        let handler = Arc::clone(handler);
                        Arc::new(move |frame: CallFrame<'_>| handler(&instance, frame)) as Handler
                    }
                    Binding::Static(handler) => Arc::clone(handler),
                })
                .collect())
        });

        AgentDeclaration {
            profile: self.profile,
            module: self.module,
            members,
            factory,
        }
    }
}

/// Type-erased declaration of an agent.
pub struct AgentDeclaration {
    profile: AgentProfile,
    module: String,
    members: Vec<Member>,
    factory: Factory,
}

impl AgentDeclaration {
    /// Declare the coordinator, the agent every conversation starts with.
    pub fn coordinator<T: Send + Sync + 'static>(
        name: impl Into<String>,
        module: impl Into<String>,
    ) -> AgentDeclarationBuilder<T> {
        AgentDeclarationBuilder::new(name, module, AgentRole::Coordinator)
    }

    /// Declare an agent reachable through a handoff.
    pub fn agent<T: Send + Sync + 'static>(
        name: impl Into<String>,
        module: impl Into<String>,
    ) -> AgentDeclarationBuilder<T> {
        AgentDeclarationBuilder::new(name, module, AgentRole::Member)
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    /// Module path the agent was declared in.
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_coordinator(&self) -> bool {
        self.profile.is_coordinator()
    }

    /// Whether the declaration lives in `scope` or one of its submodules.
    pub fn in_scope(&self, scope: &str) -> bool {
        self.module == scope
            || self
                .module
                .strip_prefix(scope)
                .is_some_and(|rest| rest.starts_with("::"))
    }

    /// Construct the agent's state and bind every member handler to it.
    ///
    /// Handlers are returned in member order.
    pub fn instantiate(&self) -> Result<Vec<Handler>, ConfigError> {
        (self.factory)().map_err(|source| ConfigError::AgentConstruction {
            agent: self.profile.name.clone(),
            source,
        })
    }
}

impl fmt::Debug for AgentDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentDeclaration")
            .field("profile", &self.profile)
            .field("module", &self.module)
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of agent declarations.
#[derive(Debug, Default)]
pub struct AgentCatalog {
    declarations: Vec<AgentDeclaration>,
}

impl AgentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration. Agent names are unique within a catalog.
    pub fn register(&mut self, declaration: AgentDeclaration) -> Result<(), ConfigError> {
        if self
            .declarations
            .iter()
            .any(|existing| existing.name() == declaration.name())
        {
            return Err(ConfigError::DuplicateDeclaration {
                agent: declaration.name().to_string(),
            });
        }
        self.declarations.push(declaration);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, declaration: AgentDeclaration) -> Result<Self, ConfigError> {
        self.register(declaration)?;
        Ok(self)
    }

    /// Declarations within `scope`, in registration order.
    pub fn discover(&self, scope: &str) -> Vec<&AgentDeclaration> {
        self.declarations
            .iter()
            .filter(|declaration| declaration.in_scope(scope))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentDeclaration> {
        self.declarations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Arguments;
    use handoff_core::ParamType;
    use serde_json::json;

    struct Counter {
        start: i64,
    }

    fn counter(name: &str, module: &str) -> AgentDeclaration {
        AgentDeclaration::agent::<Counter>(name, module)
            .construct_with(|| Ok(Counter { start: 10 }))
            .capability(
                Member::new("add", "Add to the start value").param(Param::of::<i64>()),
                |counter, frame| {
                    let amount: i64 = frame.arg(0)?;
                    Ok(json!(counter.start + amount).into())
                },
            )
            .static_capability(Member::new("zero", "Zero"), |_frame| Ok(json!(0).into()))
            .build()
    }

    #[test]
    fn test_scope_matching() {
        let declaration = counter("Counter", "app::agents::math");
        assert!(declaration.in_scope("app::agents::math"));
        assert!(declaration.in_scope("app::agents"));
        assert!(declaration.in_scope("app"));
        assert!(!declaration.in_scope("app::agent"));
        assert!(!declaration.in_scope("other"));
    }

    #[test]
    fn test_discover_keeps_catalog_order() {
        let catalog = AgentCatalog::new()
            .with(counter("B", "app::b"))
            .and_then(|c| c.with(counter("A", "app::a")))
            .and_then(|c| c.with(counter("C", "lib::c")))
            .unwrap();
        let names: Vec<&str> = catalog.discover("app").iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let mut catalog = AgentCatalog::new();
        catalog.register(counter("Counter", "app")).unwrap();
        let err = catalog.register(counter("Counter", "app")).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_DECLARATION");
    }

    #[test]
    fn test_instantiate_binds_handlers_in_order() {
        let declaration = counter("Counter", "app");
        assert_eq!(declaration.members()[1].scope, CapabilityScope::Static);
        assert_eq!(
            declaration.members()[0].params,
            vec![Param::value(ParamType::Integer)]
        );

        let handlers = declaration.instantiate().unwrap();
        assert_eq!(handlers.len(), 2);
        let out = handlers[0](CallFrame::new(None, Arguments::new(vec![json!(5)]))).unwrap();
        assert_eq!(out, CapabilityOutput::Value(json!(15)));
        let out = handlers[1](CallFrame::new(None, Arguments::default())).unwrap();
        assert_eq!(out, CapabilityOutput::Value(json!(0)));
    }

    #[test]
    fn test_missing_constructor_fails_instantiation() {
        let declaration = AgentDeclaration::agent::<Counter>("Lazy", "app").build();
        let err = declaration.instantiate().err().unwrap();
        assert!(matches!(err, ConfigError::AgentConstruction { ref agent, .. } if agent == "Lazy"));
    }

    #[test]
    fn test_failing_constructor_is_reported() {
        let declaration = AgentDeclaration::agent::<Counter>("Broken", "app")
            .construct_with(|| Err("no data".into()))
            .build();
        let err = declaration.instantiate().err().unwrap();
        assert!(err.to_string().contains("no data"));
    }
}
