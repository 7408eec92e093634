mod config;
mod controller;
mod events;
mod observer;
pub mod runtime;
mod selection;

pub use config::SessionConfig;
pub use controller::SessionController;
pub use events::{Anomaly, AnomalySource, SessionEvent, TransportEvent};
#[cfg(feature = "native")]
pub use observer::ChannelObserver;
pub use observer::{Observer, RecordingObserver, TracingObserver};
pub use selection::{PeerSelector, SelectionPolicy};
