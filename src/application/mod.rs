//! Application layer - Operation wrappers and port interfaces
//!
//! Contains the `catches`/`cleansup` wrappers around a tool's `run`
//! operation and the traits they rely on.

pub mod ports;
pub mod wrap;

// Re-export wrappers
pub use wrap::{
    catches, cleansup, operation, Catches, Cleansup, ErrorKind, ErrorKinds, Operation,
    WrapMetadata,
};
