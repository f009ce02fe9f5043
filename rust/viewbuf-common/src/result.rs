//! The shared `Result` alias and early-return checks for decoder preconditions.

use crate::error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns an `InvalidArgument` error for the argument `$name` from the
/// enclosing function unless `$cond` holds.
#[macro_export]
macro_rules! check_arg {
    ($name:ident, $cond:expr) => {
        if !$cond {
            return Err($crate::result::failed_check(
                $crate::result::CheckKind::Argument,
                stringify!($name),
                stringify!($cond),
            ));
        }
    };
}

/// Returns a `CorruptBuffer` error for the buffer field `$name` from the
/// enclosing function unless `$cond` holds.
#[macro_export]
macro_rules! check_data {
    ($name:ident, $cond:expr) => {
        if !$cond {
            return Err($crate::result::failed_check(
                $crate::result::CheckKind::Data,
                stringify!($name),
                stringify!($cond),
            ));
        }
    };
}

#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Argument,
    Data,
}

#[doc(hidden)]
#[cold]
#[inline(never)]
pub fn failed_check(kind: CheckKind, name: &str, condition: &str) -> Error {
    let message = format!("expected `{condition}`");
    match kind {
        CheckKind::Argument => Error::invalid_arg(name, message),
        CheckKind::Data => Error::corrupt_buffer(name, message),
    }
}
