//! Cooperative cancellation.
//!
//! A [`Cancellation`] is polled by the chain engine inside every large loop:
//! each chain-edge expansion, each ALS subset step and before each scoring
//! simulation. The engine only mutates the live board after the last poll, so
//! stopping early never leaves a partial deduction behind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Returned when a [`Cancellation`] fired before the engine finished.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("logical solve was cancelled")]
pub struct Cancelled;

pub trait Cancellation {
    /// Returns `true` once the caller wants the engine to stop.
    fn is_cancelled(&self) -> bool;

    /// `Err(Cancelled)` when cancelled, for use with `?`.
    fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

/// A [`Cancellation`] which never fires.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A shared flag another thread can raise.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

impl Cancellation for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl<T: Cancellation> Cancellation for Option<T> {
    fn is_cancelled(&self) -> bool {
        match self {
            Some(c) => c.is_cancelled(),
            None => false,
        }
    }
}

impl<T: Cancellation + ?Sized> Cancellation for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}
