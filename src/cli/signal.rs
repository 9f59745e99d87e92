use std::{future::Future, io, pin::Pin};

/// Wraps a one-shot interrupt signal such as `tokio::signal::ctrl_c()` so it
/// can be raced in several `tokio::select!` calls in a row.
///
/// The signal future is polled in place, never recreated, so a press between
/// two races is not lost.
pub struct SignalWatch<S> {
    signal: Pin<Box<S>>,
    listening: bool,
    fired: bool,
}

impl<S> SignalWatch<S>
where
    S: Future<Output = io::Result<()>>,
{
    pub fn new(signal: S) -> Self {
        Self {
            signal: Box::pin(signal),
            listening: true,
            fired: false,
        }
    }

    /// Resolves once when the signal arrives.
    ///
    /// Pends forever after it has fired, or when the listener failed.
    pub async fn fired(&mut self) {
        if self.listening {
            match self.signal.as_mut().await {
                Ok(()) => {
                    self.listening = false;
                    self.fired = true;
                    return;
                }
                Err(e) => {
                    tracing::warn!("cannot listen for interrupts: {}", e);
                    self.listening = false;
                }
            }
        }

        std::future::pending::<()>().await
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
