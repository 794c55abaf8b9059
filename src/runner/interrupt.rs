//! Cooperative interruption
//!
//! The controller never gets killed mid-record. It races each fetch and each
//! delay against an [`Interrupt`] and stops cleanly when the interrupt fires.

use std::sync::Arc;
use tokio::sync::watch;

/// Receiving side of an interrupt flag
#[derive(Debug, Clone)]
pub struct Interrupt {
    rx: watch::Receiver<bool>,
}

/// Triggering side of an interrupt flag
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl InterruptHandle {
    /// Fires the interrupt; later calls are no-ops
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl Interrupt {
    /// Creates a manually triggered interrupt
    pub fn channel() -> (InterruptHandle, Interrupt) {
        let (tx, rx) = watch::channel(false);
        (InterruptHandle { tx: Arc::new(tx) }, Interrupt { rx })
    }

    /// An interrupt that never fires
    pub fn never() -> Self {
        Self::channel().1
    }

    /// An interrupt fired by Ctrl-C
    ///
    /// The signal handler is installed before this returns, so a Ctrl-C at any
    /// later point reaches the interrupt instead of killing the process. Must
    /// be called inside a tokio runtime.
    pub async fn ctrl_c() -> Self {
        let (handle, interrupt) = Self::channel();
        let mut signal = Box::pin(tokio::signal::ctrl_c());

        // The first poll installs the handler
        let early = tokio::select! {
            biased;
            result = &mut signal => Some(result),
            _ = std::future::ready(()) => None,
        };

        match early {
            Some(result) => on_ctrl_c(result, &handle),
            None => {
                tokio::spawn(async move { on_ctrl_c(signal.await, &handle) });
            }
        }
        interrupt
    }

    /// Returns true once the interrupt has fired
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes when the interrupt fires
    ///
    /// Pends forever if every handle is dropped without firing. Cancel safe.
    pub async fn triggered(&mut self) {
        if self.rx.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn on_ctrl_c(result: std::io::Result<()>, handle: &InterruptHandle) {
    match result {
        Ok(()) => {
            tracing::warn!("Interrupt received, stopping after the current step");
            handle.trigger();
        }
        Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
    }
}
