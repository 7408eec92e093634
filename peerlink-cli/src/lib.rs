pub mod application;
pub mod infrastructure;

pub use application::{ChatCommand, ConsoleObserver, SessionTally};
pub use infrastructure::{
    AccessoryConfig, CliError, LogConfig, Result, SimulatedAccessory, load_session_config,
};
