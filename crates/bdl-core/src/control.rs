//! Batch control for cancellation: a shared abort token.
//!
//! The CLI sets the token on Ctrl-C; every transfer checks it before issuing
//! its request and from the transport's progress callback, then stops and
//! reports itself as cancelled with its partial file left on disk.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable abort flag shared by every task of a batch.
#[derive(Debug, Clone, Default)]
pub struct AbortToken(Arc<AtomicBool>);

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask all holders of this token to stop.
    pub fn request_abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
