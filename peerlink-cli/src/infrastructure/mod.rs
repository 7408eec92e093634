pub mod config;
pub mod error;
pub mod observability;
pub mod simulated_accessory;

pub use config::load_session_config;
pub use error::{CliError, Result};
pub use observability::LogConfig;
pub use simulated_accessory::{AccessoryConfig, SimulatedAccessory};
