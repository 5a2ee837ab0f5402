//! HMAC-SHA1 (RFC 2104) over the in-crate SHA-1 core.

use crate::otp::sha1::{self, BLOCK_LEN, DIGEST_LEN};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Compute `HMAC-SHA1(key, message)`.
///
/// A key longer than the SHA-1 block size (64 bytes) is first replaced by
/// its own digest. Shorter keys, including the empty key, are zero-padded
/// to the block size before the `ipad`/`opad` XOR.
pub fn hmac_sha1(key: &[u8], message: &[u8]) -> [u8; DIGEST_LEN] {
    let mut padded_key = [0u8; BLOCK_LEN];
    if key.len() > BLOCK_LEN {
        padded_key[..DIGEST_LEN].copy_from_slice(&sha1::digest(key));
    } else {
        padded_key[..key.len()].copy_from_slice(key);
    }

    let mut inner = Vec::with_capacity(BLOCK_LEN + message.len());
    inner.extend(padded_key.iter().map(|b| b ^ IPAD));
    inner.extend_from_slice(message);
    let inner_digest = sha1::digest(&inner);

    let mut outer = Vec::with_capacity(BLOCK_LEN + DIGEST_LEN);
    outer.extend(padded_key.iter().map(|b| b ^ OPAD));
    outer.extend_from_slice(&inner_digest);
    sha1::digest(&outer)
}
