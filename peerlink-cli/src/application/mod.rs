pub mod chat;
pub mod console;

pub use chat::ChatCommand;
pub use console::{ConsoleObserver, SessionTally};
