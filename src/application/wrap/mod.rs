//! Composable wrappers around async operations
//!
//! - [`catches`]: converts declared error kinds into a logged failure sentinel
//! - [`cleansup`]: guarantees the target's cleanup hook runs afterwards
//!
//! Both record what they did in [`WrapMetadata`], readable without running
//! the operation.

pub mod catches;
pub mod cleansup;
pub mod operation;

pub use catches::{catches, describe, Catcher, Catches, ErrorKind, ErrorKinds};
pub use cleansup::{cleansup, Cleansup};
pub use operation::{operation, BoxFuture, FnOperation, Operation, WrapMetadata};
