//! Error-classification wrapper
//!
//! `catches(kinds).wrap(op)` turns errors of the configured kinds into a
//! single `log.error(..)` call and the failure sentinel. Everything else
//! passes through untouched.

use std::any::{type_name, TypeId};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::HasLog;
use crate::domain::{BoxError, Sentinel};

use super::operation::{Operation, WrapMetadata};

/// One concrete error type that `catches` can intercept
#[derive(Clone, Copy)]
pub struct ErrorKind {
    type_id: TypeId,
    name: &'static str,
    matches: fn(&(dyn StdError + 'static)) -> bool,
}

fn is_kind<E: StdError + 'static>(err: &(dyn StdError + 'static)) -> bool {
    err.is::<E>()
}

impl ErrorKind {
    pub fn of<E: StdError + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            name: type_name::<E>(),
            matches: is_kind::<E>,
        }
    }

    /// Full type name of the error kind
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check whether `err` is an instance of this kind
    pub fn matches(&self, err: &(dyn StdError + 'static)) -> bool {
        (self.matches)(err)
    }
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ErrorKind {}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Fixed set of error kinds.
///
/// Immutable once built; `or` returns a new set.
#[derive(Clone, PartialEq, Eq)]
pub struct ErrorKinds {
    kinds: Arc<[ErrorKind]>,
}

impl ErrorKinds {
    /// Set with a single kind
    pub fn of<E: StdError + 'static>() -> Self {
        ErrorKind::of::<E>().into()
    }

    /// New set with `E` added
    pub fn or<E: StdError + 'static>(&self) -> Self {
        let kind = ErrorKind::of::<E>();
        if self.kinds.contains(&kind) {
            return self.clone();
        }
        self.kinds.iter().copied().chain(Some(kind)).collect()
    }

    /// Check whether `err` belongs to any kind in the set
    pub fn contains(&self, err: &(dyn StdError + 'static)) -> bool {
        self.kinds.iter().any(|kind| kind.matches(err))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorKind> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl From<ErrorKind> for ErrorKinds {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kinds: Arc::from(vec![kind]),
        }
    }
}

impl FromIterator<ErrorKind> for ErrorKinds {
    fn from_iter<I: IntoIterator<Item = ErrorKind>>(iter: I) -> Self {
        let mut kinds: Vec<ErrorKind> = Vec::new();
        for kind in iter {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Self {
            kinds: kinds.into(),
        }
    }
}

impl fmt::Debug for ErrorKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds.iter()).finish()
    }
}

/// Message logged for an intercepted error: `Display`, or `Debug` when
/// `Display` is empty
pub fn describe(err: &(dyn StdError + 'static)) -> String {
    let message = err.to_string();
    if message.is_empty() {
        format!("{:?}", err)
    } else {
        message
    }
}

/// Wrapper producer returned by [`catches`]
#[derive(Debug, Clone)]
pub struct Catcher {
    kinds: ErrorKinds,
}

/// Intercept the given error kinds.
///
/// ```ignore
/// let run = catches(ErrorKinds::of::<ConfigError>().or::<io::Error>()).wrap(operation(run));
/// ```
pub fn catches(kinds: impl Into<ErrorKinds>) -> Catcher {
    Catcher {
        kinds: kinds.into(),
    }
}

impl Catcher {
    pub fn kinds(&self) -> &ErrorKinds {
        &self.kinds
    }

    /// Apply to an operation
    pub fn wrap<O>(&self, operation: O) -> Catches<O> {
        Catches {
            kinds: self.kinds.clone(),
            inner: operation,
        }
    }
}

/// Operation wrapped by [`catches`]
pub struct Catches<O> {
    kinds: ErrorKinds,
    inner: O,
}

impl<O> Catches<O> {
    /// Configured error kinds
    pub fn kinds(&self) -> &ErrorKinds {
        &self.kinds
    }

    /// The wrapped operation
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<R, A, O> Operation<R, A> for Catches<O>
where
    R: HasLog + Send + ?Sized,
    A: Send + 'static,
    O: Operation<R, A>,
    O::Output: Sentinel,
{
    type Output = O::Output;

    async fn call(&self, target: &mut R, args: A) -> Result<O::Output, BoxError> {
        match self.inner.call(target, args).await {
            Err(err) if self.kinds.contains(&*err) => {
                target.log().error(&describe(&*err));
                Ok(O::Output::failure())
            }
            result => result,
        }
    }

    fn metadata(&self) -> WrapMetadata {
        WrapMetadata {
            wrapped: true,
            catches: Some(self.kinds.clone()),
            ..self.inner.metadata()
        }
    }
}
