pub mod optimus;
pub mod stocks;
pub mod weather;

pub use optimus::{EXIT_KEY, LevelSwitch};

use handoff_core::error::ConfigError;
use handoff_tools::AgentCatalog;

/// Search scope containing every demo agent.
pub const SCOPE: &str = module_path!();

/// The demo agents: Optimus coordinates WeatherMan and StockBroker.
pub fn catalog(levels: LevelSwitch) -> Result<AgentCatalog, ConfigError> {
    AgentCatalog::new()
        .with(optimus::declaration(levels))?
        .with(weather::declaration())?
        .with(stocks::declaration())
}
