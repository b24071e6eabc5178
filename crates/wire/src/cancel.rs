use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancel flag checked between chunks of a send/receive loop.
/// Cloning shares the same underlying flag; this is how a session's local
/// "cancel this transfer" request reaches a blocking network loop running
/// on the writer thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Resets the flag so the token can be reused for a subsequent transfer.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
