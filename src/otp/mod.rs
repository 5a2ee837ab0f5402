//! OTP crate: sub-modules.

pub mod base32;
pub mod engine;
pub mod hmac;
pub mod sha1;
pub mod types;

// Re-export top-level items for convenience.
pub use engine::{
    counter_bytes, time_step_at, truncate, TotpEngine, DEFAULT_DIGITS, DEFAULT_STEP,
};
pub use types::{OtpError, OtpErrorKind};
