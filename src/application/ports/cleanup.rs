//! Cleanup port interface

use async_trait::async_trait;

use crate::domain::BoxError;

/// Targets with an async teardown hook (required by `cleansup`)
#[async_trait]
pub trait Cleanup: Send {
    /// Release whatever the target acquired while running.
    ///
    /// Called exactly once by `cleansup` after the wrapped operation,
    /// whether it succeeded or failed.
    async fn cleanup(&mut self) -> Result<(), BoxError>;
}
