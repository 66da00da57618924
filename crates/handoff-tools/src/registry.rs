//! Capability registry.
//!
//! The registry is built once from an [`AgentCatalog`]: it discovers the
//! declarations within a search scope, checks that exactly one of them is
//! the coordinator, instantiates every agent and registers its members.
//! Afterwards it is immutable and can be shared between conversations.
//!
//! Capabilities live in two maps. The global map holds every capability
//! visible to all agents, including each agent's "transfer to" capability.
//! The instance map holds, per agent, the capabilities visible only while
//! that agent is active.

use crate::capability::{Capability, CapabilityScope, CapabilityTarget, Handler};
use crate::declaration::{AgentCatalog, AgentDeclaration};
use handoff_core::error::{ConfigError, RegistrationError, RegistryResult};
use handoff_core::{Agent, AgentId, CapabilityName, Param};
use std::collections::HashMap;
use tracing::{debug, info};

/// Environment variable holding the default search scope.
pub const SCOPE_ENV_VAR: &str = "HANDOFF_AGENT_SCOPE";

/// Member name of the implicit capability that hands the conversation
/// over to its agent.
pub const HANDOFF_MEMBER: &str = "transfer_to_agent";

/// Read the search scope from [`SCOPE_ENV_VAR`].
///
/// Unset and empty values are both reported as
/// [`ConfigError::MissingSearchScope`].
pub fn scope_from_env() -> Result<String, ConfigError> {
    match std::env::var(SCOPE_ENV_VAR) {
        Ok(scope) if !scope.trim().is_empty() => Ok(scope.trim().to_string()),
        _ => Err(ConfigError::MissingSearchScope),
    }
}

/// Immutable store of every agent and capability of a conversation system.
#[derive(Debug)]
pub struct CapabilityRegistry {
    scope: String,
    agents: Vec<Agent>,
    global: HashMap<CapabilityName, Capability>,
    instance: HashMap<AgentId, HashMap<CapabilityName, Capability>>,
}

impl CapabilityRegistry {
    /// Build the registry from the declarations found in `scope`.
    ///
    /// Without an explicit scope, [`SCOPE_ENV_VAR`] is used. The coordinator
    /// is registered first and receives id `0`; the other agents follow in
    /// catalog order.
    pub fn build(catalog: &AgentCatalog, scope: Option<&str>) -> RegistryResult<Self> {
        let scope = match scope.map(str::trim) {
            Some(scope) if !scope.is_empty() => scope.to_string(),
            Some(_) => return Err(ConfigError::MissingSearchScope.into()),
            None => scope_from_env()?,
        };

        let declarations = catalog.discover(&scope);
        let ordered = coordinator_first(&scope, declarations)?;

        let mut instantiated = Vec::with_capacity(ordered.len());
        for declaration in ordered {
            let handlers = declaration.instantiate()?;
            instantiated.push((declaration, handlers));
        }

        let mut registry = Self {
            scope,
            agents: Vec::with_capacity(instantiated.len()),
            global: HashMap::new(),
            instance: HashMap::new(),
        };

        for (ordinal, (declaration, handlers)) in (0u32..).zip(instantiated) {
            let agent = Agent::new(AgentId::new(ordinal), declaration.profile().clone());
            registry.register_agent(&agent, declaration, handlers)?;
            registry.agents.push(agent);
        }

        info!(
            scope = %registry.scope,
            agents = registry.agents.len(),
            capabilities = registry.len(),
            "Capability registry built"
        );
        Ok(registry)
    }

    fn register_agent(
        &mut self,
        agent: &Agent,
        declaration: &AgentDeclaration,
        handlers: Vec<Handler>,
    ) -> RegistryResult<()> {
        for (member, handler) in declaration.members().iter().zip(handlers) {
            let name = compose_name(agent, &member.name)?;
            check_context_order(&name, &member.params)?;

            let owner = match member.scope {
                CapabilityScope::Static => None,
                CapabilityScope::Instance | CapabilityScope::Global => Some(agent.clone()),
            };
            let capability = Capability::new(
                name,
                member.description.clone(),
                member.params.clone(),
                member.scope,
                owner,
                CapabilityTarget::Handler(handler),
            );
            self.insert(agent, capability)?;
        }

        let handoff = Capability::new(
            compose_name(agent, HANDOFF_MEMBER)?,
            agent.description(),
            Vec::new(),
            CapabilityScope::Global,
            Some(agent.clone()),
            CapabilityTarget::Handoff(agent.clone()),
        );
        self.insert(agent, handoff)
    }

    fn contains(&self, name: &CapabilityName) -> bool {
        self.global.contains_key(name)
            || self
                .instance
                .values()
                .any(|capabilities| capabilities.contains_key(name))
    }

    fn insert(&mut self, agent: &Agent, capability: Capability) -> RegistryResult<()> {
        // Names are unique across both scopes, not only within the target map.
        if self.contains(capability.name()) {
            return Err(RegistrationError::DuplicateCapability {
                name: capability.name().to_string(),
            }
            .into());
        }

        let map = if capability.is_global() {
            &mut self.global
        } else {
            self.instance.entry(agent.id()).or_default()
        };

        debug!(
            capability = %capability.name(),
            agent = %agent,
            scope = ?capability.scope(),
            has_context = capability.has_context(),
            "Registered capability"
        );
        map.insert(capability.name().clone(), capability);
        Ok(())
    }

    /// Every capability visible while `agent` is active, sorted by name.
    pub fn capabilities_for(&self, agent: &Agent) -> Vec<&Capability> {
        let mut visible: Vec<&Capability> = self
            .global
            .values()
            .chain(self.instance.get(&agent.id()).into_iter().flat_map(HashMap::values))
            .collect();
        visible.sort_by(|a, b| a.name().cmp(b.name()));
        visible
    }

    /// Look up a capability visible to `agent`, global scope first.
    pub fn capability(&self, name: &str, agent: &Agent) -> Option<&Capability> {
        self.global.get(name).or_else(|| {
            self.instance
                .get(&agent.id())
                .and_then(|capabilities| capabilities.get(name))
        })
    }

    /// The agent every conversation starts with.
    pub fn coordinator(&self) -> &Agent {
        &self.agents[0]
    }

    /// Registered agents, coordinator first.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.name() == name)
    }

    /// The search scope the registry was built from.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Names in the global scope.
    pub fn global_names(&self) -> impl Iterator<Item = &CapabilityName> {
        self.global.keys()
    }

    /// Total number of registered capabilities.
    pub fn len(&self) -> usize {
        self.global.len() + self.instance.values().map(HashMap::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn coordinator_first<'a>(
    scope: &str,
    declarations: Vec<&'a AgentDeclaration>,
) -> Result<Vec<&'a AgentDeclaration>, ConfigError> {
    let (coordinators, members): (Vec<_>, Vec<_>) = declarations
        .into_iter()
        .partition(|declaration| declaration.is_coordinator());

    match coordinators.as_slice() {
        [] => Err(ConfigError::NoCoordinator {
            scope: scope.to_string(),
        }),
        [coordinator] => Ok(std::iter::once(*coordinator).chain(members).collect()),
        many => Err(ConfigError::MultipleCoordinators {
            scope: scope.to_string(),
            agents: many.iter().map(|d| d.name().to_string()).collect(),
        }),
    }
}

fn compose_name(agent: &Agent, member: &str) -> Result<CapabilityName, RegistrationError> {
    CapabilityName::compose(agent.id(), agent.name(), member).map_err(|reason| {
        RegistrationError::InvalidName {
            name: format!("{}_{}_{}", agent.id(), agent.name(), member),
            reason,
        }
    })
}

fn check_context_order(name: &CapabilityName, params: &[Param]) -> Result<(), RegistrationError> {
    let misplaced = params
        .iter()
        .enumerate()
        .any(|(index, param)| param.is_context() && index > 0);
    if misplaced {
        return Err(RegistrationError::ContextParameterOrder {
            capability: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CallFrame;
    use crate::declaration::Member;
    use handoff_core::{AgentRole, ParamType, RegistryError};
    use serde_json::json;

    struct Unit;

    fn agent(name: &str, role: AgentRole, module: &str) -> AgentDeclaration {
        let builder = match role {
            AgentRole::Coordinator => AgentDeclaration::coordinator::<Unit>(name, module),
            AgentRole::Member => AgentDeclaration::agent::<Unit>(name, module),
        };
        builder
            .description(format!("{name} handles things"))
            .construct_with(|| Ok(Unit))
            .capability(Member::new("lookup", "Look up"), |_, _frame| {
                Ok(json!("found").into())
            })
            .build()
    }

    fn catalog(declarations: Vec<AgentDeclaration>) -> AgentCatalog {
        let mut catalog = AgentCatalog::new();
        for declaration in declarations {
            catalog.register(declaration).unwrap();
        }
        catalog
    }

    #[test]
    fn test_coordinator_registered_first() {
        let catalog = catalog(vec![
            agent("Helper", AgentRole::Member, "app"),
            agent("Lead", AgentRole::Coordinator, "app"),
        ]);
        let registry = CapabilityRegistry::build(&catalog, Some("app")).unwrap();
        assert_eq!(registry.coordinator().name(), "Lead");
        assert_eq!(registry.coordinator().id(), AgentId::new(0));
        assert_eq!(registry.agent("Helper").unwrap().id(), AgentId::new(1));
        assert_eq!(registry.scope(), "app");
    }

    #[test]
    fn test_no_coordinator() {
        let catalog = catalog(vec![agent("Helper", AgentRole::Member, "app")]);
        let err = CapabilityRegistry::build(&catalog, Some("app")).unwrap_err();
        assert_eq!(err.error_code(), "NO_COORDINATOR");
    }

    #[test]
    fn test_multiple_coordinators() {
        let catalog = catalog(vec![
            agent("A", AgentRole::Coordinator, "app"),
            agent("B", AgentRole::Coordinator, "app"),
        ]);
        let err = CapabilityRegistry::build(&catalog, Some("app")).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Config(ConfigError::MultipleCoordinators { ref agents, .. })
                if agents == &["A".to_string(), "B".to_string()]
        ));
    }

    #[test]
    fn test_coordinator_outside_scope_is_ignored() {
        let catalog = catalog(vec![
            agent("Lead", AgentRole::Coordinator, "app::main"),
            agent("Other", AgentRole::Coordinator, "elsewhere"),
        ]);
        let registry = CapabilityRegistry::build(&catalog, Some("app")).unwrap();
        assert_eq!(registry.agents().len(), 1);
    }

    #[test]
    fn test_blank_scope_is_missing() {
        let catalog = catalog(vec![agent("Lead", AgentRole::Coordinator, "app")]);
        let err = CapabilityRegistry::build(&catalog, Some("  ")).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_SEARCH_SCOPE");
    }

    #[test]
    fn test_same_member_name_is_unique_per_agent() {
        let catalog = catalog(vec![
            agent("Lead", AgentRole::Coordinator, "app"),
            agent("Helper", AgentRole::Member, "app"),
        ]);
        let registry = CapabilityRegistry::build(&catalog, Some("app")).unwrap();
        let lead = registry.coordinator();
        let helper = registry.agent("Helper").unwrap();

        assert!(registry.capability("0_Lead_lookup", lead).is_some());
        assert!(registry.capability("1_Helper_lookup", helper).is_some());
        assert!(registry.capability("1_Helper_lookup", lead).is_none());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_scope_merge() {
        let catalog = catalog(vec![
            agent("Lead", AgentRole::Coordinator, "app"),
            agent("Helper", AgentRole::Member, "app"),
        ]);
        let registry = CapabilityRegistry::build(&catalog, Some("app")).unwrap();
        let helper = registry.agent("Helper").unwrap();

        let names: Vec<&str> = registry
            .capabilities_for(helper)
            .iter()
            .map(|c| c.name().as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "0_Lead_transfer_to_agent",
                "1_Helper_lookup",
                "1_Helper_transfer_to_agent",
            ]
        );
        let mut globals: Vec<&str> = registry.global_names().map(|n| n.as_str()).collect();
        globals.sort_unstable();
        assert_eq!(
            globals,
            vec!["0_Lead_transfer_to_agent", "1_Helper_transfer_to_agent"]
        );
    }

    #[test]
    fn test_handoff_capability_uses_agent_description() {
        let catalog = catalog(vec![agent("Lead", AgentRole::Coordinator, "app")]);
        let registry = CapabilityRegistry::build(&catalog, Some("app")).unwrap();
        let lead = registry.coordinator();
        let handoff = registry.capability("0_Lead_transfer_to_agent", lead).unwrap();
        assert!(handoff.is_handoff());
        assert_eq!(handoff.description(), "Lead handles things");
        assert_eq!(handoff.parameters()["properties"], json!({}));
    }

    #[test]
    fn test_global_and_static_members() {
        let declaration = AgentDeclaration::coordinator::<Unit>("Lead", "app")
            .construct_with(|| Ok(Unit))
            .capability(Member::new("shout", "Shout").global(), |_, _frame| {
                Ok("HEY".into())
            })
            .static_capability(Member::new("now", "Time"), |_frame: CallFrame<'_>| {
                Ok(json!(0).into())
            })
            .build();
        let registry = CapabilityRegistry::build(&catalog(vec![declaration]), Some("app")).unwrap();

        let shout = registry.capability("0_Lead_shout", registry.coordinator()).unwrap();
        assert!(shout.is_global());
        assert_eq!(shout.owner(), Some(registry.coordinator()));
        let now = registry.capability("0_Lead_now", registry.coordinator()).unwrap();
        assert_eq!(now.scope(), CapabilityScope::Static);
        assert!(now.owner().is_none());
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let declaration = AgentDeclaration::coordinator::<Unit>("Lead", "app")
            .construct_with(|| Ok(Unit))
            .capability(Member::new("lookup", "a"), |_, _frame| Ok("a".into()))
            .capability(Member::new("lookup", "b"), |_, _frame| Ok("b".into()))
            .build();
        let err = CapabilityRegistry::build(&catalog(vec![declaration]), Some("app")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Capability already registered: 0_Lead_lookup"
        );
    }

    #[test]
    fn test_member_clashing_with_handoff_name_rejected() {
        let declaration = AgentDeclaration::coordinator::<Unit>("Lead", "app")
            .construct_with(|| Ok(Unit))
            .capability(
                Member::new(HANDOFF_MEMBER, "clash").global(),
                |_, _frame| Ok("x".into()),
            )
            .build();
        let err = CapabilityRegistry::build(&catalog(vec![declaration]), Some("app")).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_CAPABILITY");
    }

    #[test]
    fn test_instance_and_global_member_with_same_name_rejected() {
        let declaration = AgentDeclaration::coordinator::<Unit>("Lead", "app")
            .construct_with(|| Ok(Unit))
            .capability(Member::new("lookup", "Instance"), |_, _frame| Ok("a".into()))
            .capability(Member::new("lookup", "Global").global(), |_, _frame| {
                Ok("b".into())
            })
            .build();
        let err = CapabilityRegistry::build(&catalog(vec![declaration]), Some("app")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Capability already registered: 0_Lead_lookup"
        );
    }

    #[test]
    fn test_instance_member_clashing_with_handoff_name_rejected() {
        let declaration = AgentDeclaration::coordinator::<Unit>("Lead", "app")
            .construct_with(|| Ok(Unit))
            .capability(Member::new(HANDOFF_MEMBER, "clash"), |_, _frame| {
                Ok("x".into())
            })
            .build();
        let err = CapabilityRegistry::build(&catalog(vec![declaration]), Some("app")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Capability already registered: 0_Lead_transfer_to_agent"
        );
    }

    #[test]
    fn test_advertised_names_are_distinct() {
        let catalog = catalog(vec![
            agent("Lead", AgentRole::Coordinator, "app"),
            agent("Helper", AgentRole::Member, "app"),
        ]);
        let registry = CapabilityRegistry::build(&catalog, Some("app")).unwrap();
        for agent in registry.agents() {
            let names: Vec<&str> = registry
                .capabilities_for(agent)
                .iter()
                .map(|c| c.name().as_str())
                .collect();
            let mut unique = names.clone();
            unique.dedup();
            assert_eq!(names, unique);
        }
    }

    #[test]
    fn test_context_must_be_first() {
        let declaration = AgentDeclaration::coordinator::<Unit>("Lead", "app")
            .construct_with(|| Ok(Unit))
            .capability(
                Member::new("late", "Context second")
                    .param(Param::value(ParamType::String))
                    .param(Param::context()),
                |_, _frame| Ok("x".into()),
            )
            .build();
        let err = CapabilityRegistry::build(&catalog(vec![declaration]), Some("app")).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Registration(RegistrationError::ContextParameterOrder { ref capability })
                if capability == "0_Lead_late"
        ));
    }

    #[test]
    fn test_repeated_context_rejected() {
        let declaration = AgentDeclaration::coordinator::<Unit>("Lead", "app")
            .construct_with(|| Ok(Unit))
            .capability(
                Member::new("twice", "Two contexts")
                    .param(Param::context())
                    .param(Param::context()),
                |_, _frame| Ok("x".into()),
            )
            .build();
        let err = CapabilityRegistry::build(&catalog(vec![declaration]), Some("app")).unwrap_err();
        assert_eq!(err.error_code(), "CONTEXT_PARAMETER_ORDER");
    }

    #[test]
    fn test_invalid_member_name_rejected() {
        let declaration = AgentDeclaration::coordinator::<Unit>("Lead", "app")
            .construct_with(|| Ok(Unit))
            .capability(Member::new("get weather", "bad"), |_, _frame| Ok("x".into()))
            .build();
        let err = CapabilityRegistry::build(&catalog(vec![declaration]), Some("app")).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_NAME");
    }

    #[test]
    fn test_construction_failure_is_fatal() {
        let broken = AgentDeclaration::agent::<Unit>("Broken", "app")
            .construct_with(|| Err("boom".into()))
            .build();
        let catalog = catalog(vec![agent("Lead", AgentRole::Coordinator, "app"), broken]);
        let err = CapabilityRegistry::build(&catalog, Some("app")).unwrap_err();
        assert_eq!(err.error_code(), "AGENT_CONSTRUCTION_FAILED");
    }
}
