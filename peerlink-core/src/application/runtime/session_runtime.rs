use crate::application::runtime::SessionLoop;
use crate::application::{Observer, TransportEvent};
use crate::domain::{MessageId, Peer, PeerId, SessionState};
use crate::error::{Result, SessionError};
use crate::infrastructure::Transport;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum Command {
    FindPeers,
    Send {
        payload: Vec<u8>,
        reply: oneshot::Sender<Result<MessageId>>,
    },
    Bind {
        peer: PeerId,
        reply: oneshot::Sender<Result<Peer>>,
    },
    Unbind {
        reply: oneshot::Sender<Option<Peer>>,
    },
    Deliver {
        event: TransportEvent,
        reply: oneshot::Sender<Result<()>>,
    },
    Status {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Shutdown,
}

/// Point-in-time view of a running session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub bound_peer: Option<Peer>,
    pub pending: usize,
}

/// Runs a [`SessionLoop`] on its own tokio task
///
/// The task is the only owner of the controller, so requests from any number
/// of [`SessionHandle`]s and transport callbacks are applied one at a time.
/// The transport is polled on a fixed interval and after every request.
pub struct SessionRuntime<T, O> {
    handle: SessionHandle,
    task: JoinHandle<SessionLoop<T, O>>,
}

impl<T, O> SessionRuntime<T, O>
where
    T: Transport + Send + 'static,
    O: Observer + Send + 'static,
{
    pub fn spawn(session_loop: SessionLoop<T, O>, poll_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(session_loop, rx, poll_interval));

        tracing::debug!("🚀 Session runtime started ({:?} poll interval)", poll_interval);
        Self {
            handle: SessionHandle { tx },
            task,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Stop the task and get the loop back
    pub async fn shutdown(self) -> Result<SessionLoop<T, O>> {
        // A closed channel means the task already stopped
        let _ = self.handle.tx.send(Command::Shutdown);
        self.task.await.map_err(|e| {
            tracing::error!("Session task failed: {}", e);
            SessionError::RuntimeClosed
        })
    }
}

async fn run<T, O>(
    mut session_loop: SessionLoop<T, O>,
    mut rx: mpsc::UnboundedReceiver<Command>,
    poll_interval: Duration,
) -> SessionLoop<T, O>
where
    T: Transport,
    O: Observer,
{
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            command = rx.recv() => {
                match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => apply(&mut session_loop, command),
                }
                session_loop.poll();
            }
            _ = ticker.tick() => {
                session_loop.poll();
            }
        }
    }

    session_loop.run_until_idle();
    tracing::debug!("🛑 Session runtime stopped");
    session_loop
}

fn apply<T: Transport, O: Observer>(session_loop: &mut SessionLoop<T, O>, command: Command) {
    // Replies are dropped when the caller stopped waiting
    match command {
        Command::FindPeers => session_loop.controller_mut().find_peers(),
        Command::Send { payload, reply } => {
            let _ = reply.send(session_loop.controller_mut().send(payload));
        }
        Command::Bind { peer, reply } => {
            let _ = reply.send(session_loop.controller_mut().bind(&peer));
        }
        Command::Unbind { reply } => {
            let _ = reply.send(session_loop.controller_mut().unbind());
        }
        Command::Deliver { event, reply } => {
            let _ = reply.send(session_loop.submit(event).map_err(SessionError::from));
        }
        Command::Status { reply } => {
            let controller = session_loop.controller();
            let _ = reply.send(SessionSnapshot {
                state: controller.state(),
                bound_peer: controller.current_peer().cloned(),
                pending: controller.pending_count(),
            });
        }
        Command::Shutdown => {}
    }
}

/// Cloneable sender side of a [`SessionRuntime`]
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    pub fn find_peers(&self) -> Result<()> {
        self.dispatch(Command::FindPeers)
    }

    pub async fn send(&self, payload: impl Into<Vec<u8>>) -> Result<MessageId> {
        let (reply, rx) = oneshot::channel();
        self.dispatch(Command::Send {
            payload: payload.into(),
            reply,
        })?;
        rx.await.map_err(|_| SessionError::RuntimeClosed)?
    }

    pub async fn bind(&self, peer: impl Into<PeerId>) -> Result<Peer> {
        let (reply, rx) = oneshot::channel();
        self.dispatch(Command::Bind {
            peer: peer.into(),
            reply,
        })?;
        rx.await.map_err(|_| SessionError::RuntimeClosed)?
    }

    pub async fn unbind(&self) -> Result<Option<Peer>> {
        let (reply, rx) = oneshot::channel();
        self.dispatch(Command::Unbind { reply })?;
        rx.await.map_err(|_| SessionError::RuntimeClosed)
    }

    /// Hand a transport callback to the session task
    pub async fn deliver(&self, event: TransportEvent) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.dispatch(Command::Deliver { event, reply })?;
        rx.await.map_err(|_| SessionError::RuntimeClosed)?
    }

    pub async fn status(&self) -> Result<SessionSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.dispatch(Command::Status { reply })?;
        rx.await.map_err(|_| SessionError::RuntimeClosed)
    }

    pub async fn state(&self) -> Result<SessionState> {
        Ok(self.status().await?.state)
    }

    fn dispatch(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| SessionError::RuntimeClosed)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Command::FindPeers => "FindPeers",
            Command::Send { .. } => "Send",
            Command::Bind { .. } => "Bind",
            Command::Unbind { .. } => "Unbind",
            Command::Deliver { .. } => "Deliver",
            Command::Status { .. } => "Status",
            Command::Shutdown => "Shutdown",
        };
        f.write_str(name)
    }
}
