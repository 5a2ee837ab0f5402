//! RFC 6238 TOTP engine — time-step derivation, counter encoding, dynamic
//! truncation and decimal code formatting.

use crate::otp::base32;
use crate::otp::hmac;
use crate::otp::sha1::DIGEST_LEN;
use crate::otp::types::OtpError;

/// Default code length.
pub const DEFAULT_DIGITS: u8 = 6;
/// Default time-step in seconds.
pub const DEFAULT_STEP: u64 = 30;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Counter encoding (RFC 4226 §5.1)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Encode an HOTP counter as its fixed-width big-endian byte string.
///
/// The width never shrinks: counter zero still yields eight zero bytes,
/// smaller counters are left-zero-padded.
pub fn counter_bytes(mut counter: u64) -> [u8; 8] {
    let mut buf = [0u8; 8];
    for slot in buf.iter_mut().rev() {
        *slot = (counter & 0xff) as u8;
        counter >>= 8;
    }
    buf
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Time-step helpers (RFC 6238 §4)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute the time-step counter for a given unix timestamp.
pub fn time_step_at(unix_seconds: u64, step: u64) -> u64 {
    unix_seconds / step
}

/// Current unix timestamp in seconds.
fn current_unix_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Dynamic truncation (RFC 4226 §5.3)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Select 4 bytes of the digest at the offset named by its low nibble and
/// combine them into a 31-bit value.
///
/// The sign bit of the first selected byte is masked off, so the result is
/// non-negative regardless of integer signedness. The offset is always
/// `0..=15` into a 20-byte digest; out-of-bounds access is impossible.
pub fn truncate(mac: &[u8; DIGEST_LEN]) -> u32 {
    let offset = (mac[DIGEST_LEN - 1] & 0x0f) as usize;
    u32::from_be_bytes([
        mac[offset] & 0x7f,
        mac[offset + 1],
        mac[offset + 2],
        mac[offset + 3],
    ])
}

/// Reduce a truncated value modulo `10^digits` and format it as decimal.
///
/// With `padded` the result is left-zero-padded to exactly `digits`
/// characters. Without it, leading zeros are suppressed and the string may
/// be shorter than `digits`; that behavior is long-standing and preserved.
fn format_code(value: u32, digits: u8, padded: bool) -> String {
    let code = value % 10u32.pow(u32::from(digits));
    if padded {
        format!("{:0>width$}", code, width = digits as usize)
    } else {
        code.to_string()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Engine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// RFC 6238 TOTP generator.
///
/// Stateless and reentrant: every code is a pure function of the secret,
/// the counter (or timestamp) and the engine configuration, so a single
/// engine may be shared freely across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpEngine {
    step: u64,
    digits: u8,
}

impl Default for TotpEngine {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            digits: DEFAULT_DIGITS,
        }
    }
}

impl TotpEngine {
    /// Create an engine with the defaults: 30-second step, 6 digits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the time-step length in seconds. Zero is raised to one
    /// so the counter derivation never divides by zero.
    pub fn with_step(mut self, step: u64) -> Self {
        self.step = step.max(1);
        self
    }

    /// Builder: set the code length, clamped to `1..=9` so `10^digits`
    /// stays inside `u32`.
    pub fn with_digits(mut self, digits: u8) -> Self {
        self.digits = digits.clamp(1, 9);
        self
    }

    /// Configured time-step length in seconds.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Configured code length.
    pub fn digits(&self) -> u8 {
        self.digits
    }

    /// Generate the code for the current wall-clock time.
    pub fn now(&self, secret: &str, padded: bool) -> Result<String, OtpError> {
        self.now_at(secret, padded, current_unix_time())
    }

    /// Generate the code for an explicit unix timestamp.
    ///
    /// This is the deterministic entry point: supplying a fixed timestamp
    /// reproduces exactly what `now` would return at that instant.
    pub fn now_at(&self, secret: &str, padded: bool, unix_seconds: u64) -> Result<String, OtpError> {
        self.generate(time_step_at(unix_seconds, self.step), secret, padded)
    }

    /// Generate the code for an explicit counter value.
    ///
    /// Useful for deterministic tests and for callers that verify a code
    /// against the current step and its neighbours; the width of that
    /// tolerance window is the caller's policy, not this engine's.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` when the secret is not valid Base32.
    pub fn generate(&self, counter: u64, secret: &str, padded: bool) -> Result<String, OtpError> {
        let key = base32::decode(&secret.to_ascii_lowercase())?;
        if key.len() < 10 {
            // RFC 4226 §4 R6: shared secrets must be at least 128 bits.
            log::warn!(
                "decoded secret is only {} bytes; RFC 4226 requires at least 16",
                key.len()
            );
        }
        let mac = hmac::hmac_sha1(&key, &counter_bytes(counter));
        Ok(format_code(truncate(&mac), self.digits, padded))
    }

    /// Seconds until the current code rolls over.
    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining_at(current_unix_time())
    }

    /// Seconds remaining for a specific timestamp.
    pub fn seconds_remaining_at(&self, unix_seconds: u64) -> u64 {
        self.step - (unix_seconds % self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otp::types::OtpErrorKind;

    // ── RFC 4226 test vectors (Appendix D) ───────────────────────
    // Secret: "12345678901234567890" (ASCII) → base32: GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ

    const RFC4226_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    #[test]
    fn rfc4226_hotp_vectors() {
        let engine = TotpEngine::new();
        let expected = [
            "755224", "287082", "359152", "969429", "338314",
            "254676", "287922", "162583", "399871", "520489",
        ];
        for (counter, exp) in expected.iter().enumerate() {
            let code = engine.generate(counter as u64, RFC4226_SECRET, true).unwrap();
            assert_eq!(&code, exp, "mismatch at counter {}", counter);
        }
    }

    // ── RFC 6238 test vectors (Appendix B, SHA-1 rows) ───────────

    #[test]
    fn rfc6238_totp_at_59() {
        let engine = TotpEngine::new().with_digits(8);
        assert_eq!(engine.now_at(RFC4226_SECRET, true, 59).unwrap(), "94287082");
    }

    #[test]
    fn rfc6238_totp_at_1111111109() {
        let engine = TotpEngine::new().with_digits(8);
        assert_eq!(
            engine.now_at(RFC4226_SECRET, true, 1111111109).unwrap(),
            "07081804"
        );
    }

    #[test]
    fn rfc6238_totp_at_20000000000() {
        let engine = TotpEngine::new().with_digits(8);
        assert_eq!(
            engine.now_at(RFC4226_SECRET, true, 20000000000).unwrap(),
            "65353130"
        );
    }

    // ── Frozen-clock known-answer test ───────────────────────────

    #[test]
    fn frozen_clock_at_59_uses_counter_1() {
        let engine = TotpEngine::new();
        assert_eq!(time_step_at(59, engine.step()), 1);
        let via_time = engine.now_at("JBSWY3DPEHPK3PXP", true, 59).unwrap();
        let via_counter = engine.generate(1, "JBSWY3DPEHPK3PXP", true).unwrap();
        assert_eq!(via_time, "996554");
        assert_eq!(via_time, via_counter);
    }

    #[test]
    fn secret_case_is_normalised() {
        let engine = TotpEngine::new();
        let upper = engine.generate(1, "JBSWY3DPEHPK3PXP", true).unwrap();
        let lower = engine.generate(1, "jbswy3dpehpk3pxp", true).unwrap();
        assert_eq!(upper, lower);
    }

    // ── Padded / unpadded formatting ─────────────────────────────

    #[test]
    fn unpadded_drops_leading_zeros() {
        // Counter 29 under this secret truncates to a 5-digit value.
        let engine = TotpEngine::new();
        let padded = engine.generate(29, "JBSWY3DPEHPK3PXP", true).unwrap();
        let unpadded = engine.generate(29, "JBSWY3DPEHPK3PXP", false).unwrap();
        assert_eq!(padded, "067820");
        assert_eq!(unpadded, "67820");
        assert_eq!(padded.parse::<u32>().unwrap(), unpadded.parse::<u32>().unwrap());
    }

    #[test]
    fn padded_codes_are_always_full_width_ascii_digits() {
        let engine = TotpEngine::new();
        for counter in 0..60 {
            let code = engine.generate(counter, "JBSWY3DPEHPK3PXP", true).unwrap();
            assert_eq!(code.len(), 6, "counter {}", counter);
            assert!(code.chars().all(|c| c.is_ascii_digit()), "counter {}", counter);
        }
    }

    #[test]
    fn generate_is_deterministic() {
        let engine = TotpEngine::new();
        let a = engine.generate(42, "JBSWY3DPEHPK3PXP", true).unwrap();
        let b = engine.generate(42, "JBSWY3DPEHPK3PXP", true).unwrap();
        assert_eq!(a, b);
    }

    // ── Configuration ────────────────────────────────────────────

    #[test]
    fn defaults() {
        let engine = TotpEngine::new();
        assert_eq!(engine.step(), 30);
        assert_eq!(engine.digits(), 6);
    }

    #[test]
    fn digits_are_clamped_to_u32_safe_range() {
        assert_eq!(TotpEngine::new().with_digits(0).digits(), 1);
        assert_eq!(TotpEngine::new().with_digits(9).digits(), 9);
        assert_eq!(TotpEngine::new().with_digits(12).digits(), 9);
    }

    #[test]
    fn zero_step_is_raised_to_one() {
        assert_eq!(TotpEngine::new().with_step(0).step(), 1);
        assert_eq!(TotpEngine::new().with_step(60).step(), 60);
    }

    #[test]
    fn custom_step_changes_counter_derivation() {
        let engine = TotpEngine::new().with_step(60);
        let at_59 = engine.now_at(RFC4226_SECRET, true, 59).unwrap();
        let counter_0 = engine.generate(0, RFC4226_SECRET, true).unwrap();
        assert_eq!(at_59, counter_0);
    }

    // ── Degenerate and invalid secrets ───────────────────────────

    #[test]
    fn empty_secret_generates_without_crashing() {
        let engine = TotpEngine::new();
        let code = engine.generate(1, "", true).unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn invalid_secret_is_rejected() {
        let engine = TotpEngine::new();
        for bad in ["ABC1", "ABC0", "not a secret!"] {
            let err = engine.generate(0, bad, true).unwrap_err();
            assert_eq!(err.kind, OtpErrorKind::InvalidEncoding, "secret {:?}", bad);
        }
    }

    #[test]
    fn now_at_propagates_decode_errors() {
        let engine = TotpEngine::new();
        assert!(engine.now_at("1111", true, 59).is_err());
    }

    // ── Counter encoding ─────────────────────────────────────────

    #[test]
    fn counter_zero_is_eight_zero_bytes() {
        assert_eq!(counter_bytes(0), [0u8; 8]);
    }

    #[test]
    fn counter_one_is_left_padded() {
        assert_eq!(counter_bytes(1), [0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn counter_encoding_is_big_endian() {
        assert_eq!(
            counter_bytes(0x0123_4567_89ab_cdef),
            [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]
        );
        // Step counter for unix time 1111111109 at a 30-second step.
        assert_eq!(
            counter_bytes(time_step_at(1111111109, 30)),
            [0, 0, 0, 0, 0x02, 0x35, 0x23, 0xec]
        );
    }

    // ── Time-step helpers ────────────────────────────────────────

    #[test]
    fn time_step_calculation() {
        assert_eq!(time_step_at(0, 30), 0);
        assert_eq!(time_step_at(29, 30), 0);
        assert_eq!(time_step_at(30, 30), 1);
        assert_eq!(time_step_at(59, 30), 1);
        assert_eq!(time_step_at(60, 30), 2);
    }

    #[test]
    fn seconds_remaining_calculation() {
        let engine = TotpEngine::new();
        assert_eq!(engine.seconds_remaining_at(0), 30);
        assert_eq!(engine.seconds_remaining_at(1), 29);
        assert_eq!(engine.seconds_remaining_at(29), 1);
        assert_eq!(engine.seconds_remaining_at(30), 30);
    }

    // ── Truncation ───────────────────────────────────────────────

    #[test]
    fn truncation_masks_the_sign_bit() {
        // Digest ending in 0x00 selects offset 0; a 0xff lead byte must
        // come out as 0x7f after masking.
        let mut mac = [0xffu8; DIGEST_LEN];
        mac[DIGEST_LEN - 1] = 0x00;
        assert_eq!(truncate(&mac), 0x7fff_ffff);
    }

    #[test]
    fn truncation_uses_low_nibble_offset() {
        let mut mac = [0u8; DIGEST_LEN];
        mac[DIGEST_LEN - 1] = 0x0f; // offset 15 selects bytes 15..=18
        mac[15] = 0x12;
        mac[16] = 0x34;
        mac[17] = 0x56;
        mac[18] = 0x78;
        assert_eq!(truncate(&mac), 0x1234_5678);
    }
}
