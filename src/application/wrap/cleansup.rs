//! Cleanup-guarantee wrapper

use async_trait::async_trait;

use crate::application::ports::Cleanup;
use crate::domain::BoxError;

use super::operation::{Operation, WrapMetadata};

/// Operation wrapped by [`cleansup`]
pub struct Cleansup<O> {
    inner: O,
}

/// Run `target.cleanup()` once after the operation, on every exit path.
///
/// The operation's own error wins over a cleanup error.
pub fn cleansup<O>(operation: O) -> Cleansup<O> {
    Cleansup { inner: operation }
}

impl<O> Cleansup<O> {
    /// The wrapped operation
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<R, A, O> Operation<R, A> for Cleansup<O>
where
    R: Cleanup + Send + ?Sized,
    A: Send + 'static,
    O: Operation<R, A>,
{
    type Output = O::Output;

    async fn call(&self, target: &mut R, args: A) -> Result<O::Output, BoxError> {
        let result = self.inner.call(target, args).await;
        let cleaned = target.cleanup().await;
        match result {
            Err(err) => Err(err),
            Ok(output) => cleaned.map(|()| output),
        }
    }

    fn metadata(&self) -> WrapMetadata {
        WrapMetadata {
            wrapped: true,
            cleansup: true,
            ..self.inner.metadata()
        }
    }
}
