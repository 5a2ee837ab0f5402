//! FIPS 180-1 SHA-1, implemented in-crate.
//!
//! Single-shot digest: Merkle–Damgård padding, then 80 rounds of the
//! compression function per 512-bit block. All word arithmetic wraps
//! modulo 2^32 (`wrapping_add`); widening any of it silently breaks the
//! digest. Multi-block messages are routine here because the HMAC layer
//! always prepends a 64-byte padded key block to its data.

/// Digest length in bytes.
pub const DIGEST_LEN: usize = 20;
/// Internal block length in bytes.
pub const BLOCK_LEN: usize = 64;

/// Initial register state (FIPS 180-1 §7).
const H0: [u32; 5] = [
    0x6745_2301,
    0xEFCD_AB89,
    0x98BA_DCFE,
    0x1032_5476,
    0xC3D2_E1F0,
];

/// Compute the SHA-1 digest of `message`.
pub fn digest(message: &[u8]) -> [u8; DIGEST_LEN] {
    // Append the `1` bit, zero-fill to 56 mod 64, append the 64-bit
    // big-endian bit length of the original message.
    let mut padded = Vec::with_capacity(message.len() + BLOCK_LEN + 9);
    padded.extend_from_slice(message);
    padded.push(0x80);
    while padded.len() % BLOCK_LEN != BLOCK_LEN - 8 {
        padded.push(0);
    }
    padded.extend_from_slice(&((message.len() as u64) << 3).to_be_bytes());

    let mut h = H0;
    for block in padded.chunks_exact(BLOCK_LEN) {
        compress(&mut h, block);
    }

    let mut out = [0u8; DIGEST_LEN];
    for (chunk, word) in out.chunks_exact_mut(4).zip(h.iter()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    out
}

/// One 512-bit block of the compression function.
fn compress(h: &mut [u32; 5], block: &[u8]) {
    let mut w = [0u32; 80];
    for (i, word) in block.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
    }
    for i in 16..80 {
        w[i] = (w[i - 3] ^ w[i - 8] ^ w[i - 14] ^ w[i - 16]).rotate_left(1);
    }

    let [mut a, mut b, mut c, mut d, mut e] = *h;
    for (i, &wi) in w.iter().enumerate() {
        let (f, k) = match i {
            0..=19 => ((b & c) | (!b & d), 0x5A82_7999),
            20..=39 => (b ^ c ^ d, 0x6ED9_EBA1),
            40..=59 => ((b & c) | (b & d) | (c & d), 0x8F1B_BCDC),
            _ => (b ^ c ^ d, 0xCA62_C1D6),
        };
        let t = a
            .rotate_left(5)
            .wrapping_add(f)
            .wrapping_add(e)
            .wrapping_add(k)
            .wrapping_add(wi);
        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = t;
    }

    h[0] = h[0].wrapping_add(a);
    h[1] = h[1].wrapping_add(b);
    h[2] = h[2].wrapping_add(c);
    h[3] = h[3].wrapping_add(d);
    h[4] = h[4].wrapping_add(e);
}
