//! Async operations bound to a target, and their wrap metadata

use std::any::type_name;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use async_trait::async_trait;

use crate::domain::BoxError;

use super::catches::ErrorKinds;

/// Boxed future returned by plain operation functions
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a wrapped operation declares about itself.
///
/// Produced at wrap time and read without invoking the operation. Layers
/// merge: an outer wrapper keeps the guarantees recorded by inner ones, so
/// `catches` over `cleansup` still reports `cleansup == true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapMetadata {
    /// At least one wrapper was applied
    pub wrapped: bool,
    /// Error kinds intercepted by `catches`
    pub catches: Option<ErrorKinds>,
    /// `cleansup` guarantees a cleanup call
    pub cleansup: bool,
    /// Name of the innermost, undecorated operation
    pub original: &'static str,
}

impl WrapMetadata {
    /// Metadata of an undecorated operation
    pub fn bare(original: &'static str) -> Self {
        Self {
            original,
            ..Self::default()
        }
    }

    /// True when the operation is wrapped with a cleanup guarantee
    pub fn guarantees_cleanup(&self) -> bool {
        self.wrapped && self.cleansup
    }
}

/// An async operation run against a target (usually a `Runner`)
#[async_trait]
pub trait Operation<R, A = ()>: Send + Sync
where
    R: Send + ?Sized,
    A: Send + 'static,
{
    type Output: Send;

    /// Run the operation
    async fn call(&self, target: &mut R, args: A) -> Result<Self::Output, BoxError>;

    /// Describe the wrappers applied to this operation
    fn metadata(&self) -> WrapMetadata;
}

/// Boxed operations keep their metadata
#[async_trait]
impl<R, A, T> Operation<R, A> for Box<dyn Operation<R, A, Output = T>>
where
    R: Send + ?Sized,
    A: Send + 'static,
    T: Send,
{
    type Output = T;

    async fn call(&self, target: &mut R, args: A) -> Result<T, BoxError> {
        self.as_ref().call(target, args).await
    }

    fn metadata(&self) -> WrapMetadata {
        self.as_ref().metadata()
    }
}

/// Operation backed by a plain function returning a boxed future
pub struct FnOperation<F, T> {
    f: F,
    _output: PhantomData<fn() -> T>,
}

/// Turn a function into an [`Operation`].
///
/// ```ignore
/// fn run(runner: &mut Runner<MyTool>, _: ()) -> BoxFuture<'_, Result<u8, BoxError>> {
///     Box::pin(async move { Ok(0) })
/// }
/// let op = operation(run);
/// ```
pub fn operation<F, T>(f: F) -> FnOperation<F, T> {
    FnOperation {
        f,
        _output: PhantomData,
    }
}

#[async_trait]
impl<R, A, T, F> Operation<R, A> for FnOperation<F, T>
where
    R: Send + ?Sized,
    A: Send + 'static,
    T: Send,
    F: for<'a> Fn(&'a mut R, A) -> BoxFuture<'a, Result<T, BoxError>> + Send + Sync,
{
    type Output = T;

    async fn call(&self, target: &mut R, args: A) -> Result<T, BoxError> {
        (self.f)(target, args).await
    }

    fn metadata(&self) -> WrapMetadata {
        WrapMetadata::bare(type_name::<F>())
    }
}
