//! Exit codes and the failure sentinel

use std::process::ExitCode;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Output types that can carry the failure sentinel (`1`)
pub trait Sentinel: Sized {
    fn failure() -> Self;
}

impl Sentinel for u8 {
    fn failure() -> Self {
        EXIT_ERROR
    }
}

impl Sentinel for i32 {
    fn failure() -> Self {
        EXIT_ERROR.into()
    }
}

impl Sentinel for i64 {
    fn failure() -> Self {
        EXIT_ERROR.into()
    }
}

impl Sentinel for u32 {
    fn failure() -> Self {
        EXIT_ERROR.into()
    }
}

impl Sentinel for ExitCode {
    fn failure() -> Self {
        ExitCode::from(EXIT_ERROR)
    }
}
