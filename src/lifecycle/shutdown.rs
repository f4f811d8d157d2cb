//! Shutdown coordination.
//!
//! One `Shutdown` owns the stop decision. It fires on Ctrl-C, on SIGTERM
//! (Unix), or on an explicit `trigger`, and the first cause is the one
//! recorded. The state is level-triggered: a listener created after the fact
//! still resolves immediately.

use tokio::sync::watch;

/// Why the server is stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCause {
    Interrupt,
    Terminate,
    Requested,
}

impl ShutdownCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownCause::Interrupt => "ctrl-c",
            ShutdownCause::Terminate => "sigterm",
            ShutdownCause::Requested => "requested",
        }
    }
}

/// Owner of the shutdown state.
pub struct Shutdown {
    state: watch::Sender<Option<ShutdownCause>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    /// Handle for the server or a background task to wait on.
    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener(self.state.subscribe())
    }

    /// Stop without an OS signal.
    pub fn trigger(&self) {
        self.fire(ShutdownCause::Requested);
    }

    /// The recorded cause, once shutdown has begun.
    pub fn cause(&self) -> Option<ShutdownCause> {
        *self.state.borrow()
    }

    /// Wait for an OS signal or an explicit trigger, whichever comes first.
    pub async fn listen_for_signals(&self) -> ShutdownCause {
        let triggered = self.listener().wait();
        tokio::select! {
            cause = os_signal() => {
                self.fire(cause);
                cause
            }
            cause = triggered => cause,
        }
    }

    fn fire(&self, cause: ShutdownCause) {
        let first = self.state.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(cause);
            true
        });
        if first {
            tracing::info!(cause = cause.as_str(), "Shutdown triggered");
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves once shutdown has begun.
pub struct ShutdownListener(watch::Receiver<Option<ShutdownCause>>);

impl ShutdownListener {
    /// A dropped `Shutdown` counts as a requested stop.
    pub async fn wait(mut self) -> ShutdownCause {
        match self.0.wait_for(Option::is_some).await {
            Ok(cause) => cause.unwrap_or(ShutdownCause::Requested),
            Err(_) => ShutdownCause::Requested,
        }
    }
}

async fn os_signal() -> ShutdownCause {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => ShutdownCause::Interrupt,
        _ = terminate => ShutdownCause::Terminate,
    }
}
