//! Liveness checkpoints for long-running loops.
//!
//! On the device a hardware watchdog must be fed while a search runs; on a
//! host the same hook lets a caller cancel. Loops call [`Checkpoint::feed`]
//! once per iteration and stop on the first error.

use crate::error::CryptoError;

/// Periodic liveness hook.
pub trait Checkpoint {
    /// Called once per loop iteration.
    ///
    /// # Errors
    ///
    /// Return `CryptoError::Cancelled` to abort the running operation.
    fn feed(&mut self) -> Result<(), CryptoError>;
}

/// Checkpoint that never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCheckpoint;

impl Checkpoint for NoopCheckpoint {
    fn feed(&mut self) -> Result<(), CryptoError> {
        Ok(())
    }
}

/// Adapts a closure returning `true` to keep going.
pub struct FnCheckpoint<F>(pub F);

impl<F: FnMut() -> bool> Checkpoint for FnCheckpoint<F> {
    fn feed(&mut self) -> Result<(), CryptoError> {
        if (self.0)() {
            Ok(())
        } else {
            Err(CryptoError::Cancelled)
        }
    }
}
