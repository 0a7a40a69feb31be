//! OS shutdown signals for the console host

use tokio::sync::mpsc;
use tracing::debug;

/// Which signal asked us to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl Shutdown {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        }
    }
}

/// Shutdown signal handler
///
/// Listens for SIGINT and SIGTERM and reports them on a channel, so the
/// host can turn them into a session quit.
pub struct ShutdownSignal {
    receiver: mpsc::Receiver<Shutdown>,
}

impl ShutdownSignal {
    /// Start listening. Must be called inside a tokio runtime.
    #[cfg(unix)]
    pub fn new() -> Result<Self, std::io::Error> {
        use tokio::signal::unix::{signal, SignalKind};

        let (tx, rx) = mpsc::channel(4);

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            while sigint.recv().await.is_some() {
                if tx_int.send(Shutdown::Interrupt).await.is_err() {
                    break;
                }
            }
        });

        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            while sigterm.recv().await.is_some() {
                if tx.send(Shutdown::Terminate).await.is_err() {
                    break;
                }
            }
        });

        Ok(Self { receiver: rx })
    }

    /// Start listening. Must be called inside a tokio runtime.
    #[cfg(not(unix))]
    pub fn new() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel(4);

        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if tx.send(Shutdown::Interrupt).await.is_err() {
                    break;
                }
            }
        });

        Ok(Self { receiver: rx })
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<Shutdown> {
        let signal = self.receiver.recv().await;
        if let Some(signal) = signal {
            debug!(signal = signal.name(), "Shutdown signal received");
        }
        signal
    }
}
