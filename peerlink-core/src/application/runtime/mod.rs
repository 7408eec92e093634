mod event_queue;
mod session_loop;
#[cfg(feature = "native")]
mod session_runtime;

pub use event_queue::{EventQueue, QueueError};
pub use session_loop::SessionLoop;
#[cfg(feature = "native")]
pub use session_runtime::{SessionHandle, SessionRuntime, SessionSnapshot};
