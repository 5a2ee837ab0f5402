//! RFC 4648 Base32 decoding for shared secrets.
//!
//! Block-wise decoder: after trailing `=` padding is stripped, the input is
//! consumed in 8-character groups. Each character maps to a 5-bit value and
//! the groups are repacked into bytes with shifts and masks. Case-insensitive.
//! Multi-line or whitespace-containing input is not supported.

use crate::otp::types::{OtpError, OtpErrorKind};

/// RFC 4648 Base32 alphabet, lower-case form.
const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Bytes produced by a block of `n` significant characters.
///
/// `None` marks counts that cannot result from encoding whole bytes
/// (1, 3 and 6); such input is malformed and must fail rather than be
/// silently truncated.
fn block_output_len(significant: usize) -> Option<usize> {
    match significant {
        2 => Some(1),
        4 => Some(2),
        5 => Some(3),
        7 => Some(4),
        8 => Some(5),
        _ => None,
    }
}

/// Map one Base32 character to its 5-bit value.
fn quint(c: u8) -> Result<u64, OtpError> {
    let lower = c.to_ascii_lowercase();
    match ALPHABET.iter().position(|&a| a == lower) {
        Some(v) => Ok(v as u64),
        None => Err(OtpError::new(
            OtpErrorKind::InvalidEncoding,
            "secret is not valid base-32",
        )
        .with_detail(format!("character {:?}", c as char))),
    }
}

/// Decode a Base32 secret into raw key bytes.
///
/// Empty input decodes to an empty key. All `=` characters are ignored.
pub fn decode(secret: &str) -> Result<Vec<u8>, OtpError> {
    let cleaned: Vec<u8> = secret.bytes().filter(|&c| c != b'=').collect();

    let mut out = Vec::with_capacity(cleaned.len() * 5 / 8);
    for block in cleaned.chunks(8) {
        // chunks() only ever shortens the final block
        let produced = block_output_len(block.len()).ok_or_else(|| {
            OtpError::new(OtpErrorKind::InvalidEncoding, "secret is not valid base-32")
                .with_detail(format!(
                    "final block has {} significant characters",
                    block.len()
                ))
        })?;

        let mut acc: u64 = 0;
        for &c in block {
            acc = (acc << 5) | quint(c)?;
        }

        let bits = block.len() * 5;
        for i in 0..produced {
            out.push((acc >> (bits - 8 * (i + 1))) as u8);
        }
    }
    Ok(out)
}
