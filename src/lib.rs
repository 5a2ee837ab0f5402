//! # minotp – self-contained TOTP generator
//!
//! Time-based one-time password crate with no runtime crypto dependencies:
//!
//! - **RFC 6238 / 4226** – time-based code generation via HMAC-SHA1 and
//!   dynamic truncation
//! - **RFC 4648** – block-wise Base32 secret decoding, case-insensitive,
//!   `=` padding tolerated
//! - **In-crate primitives** – SHA-1 compression core and RFC 2104 HMAC
//!   implemented locally; the ecosystem crates appear only as test oracles
//! - **Deterministic** – every entry point has an explicit-timestamp or
//!   explicit-counter variant, so codes are reproducible in tests
//!
//! ```
//! use minotp::otp::TotpEngine;
//!
//! let engine = TotpEngine::new();
//! let code = engine.generate(1, "JBSWY3DPEHPK3PXP", true).unwrap();
//! assert_eq!(code, "996554");
//! ```

pub mod otp;
