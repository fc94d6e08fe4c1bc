//! Nix-compatible base-32 digest encoding.
//!
//! Nix stores hashes in a non-standard base-32: the digest bytes are read as
//! one little-endian unsigned integer and emitted most-significant digit
//! first over a 32-symbol alphabet that drops the ambiguous letters
//! `e`, `o`, `t`, `u`. Offline-build tooling verifies artifacts against this
//! representation, so the encoding must be bit-exact.

/// The 32-symbol alphabet used by Nix base-32 hashes.
pub const ALPHABET: &[u8; 32] = b"0123456789abcdfghijklmnpqrsvwxyz";

/// Encodes a raw digest into its Nix base-32 string.
///
/// The output is always `ceil(bits / 5)` characters (52 for a SHA-256
/// digest), left-padded with `'0'`; an all-zero digest therefore encodes to a
/// full-length run of `'0'`, never an empty string. The function is pure and
/// deterministic.
///
/// Rather than long division on a big integer, each output digit is read
/// directly as a 5-bit window over the little-endian byte string; the two
/// are equivalent.
pub fn encode(digest: &[u8]) -> String {
    let len = (digest.len() * 8).div_ceil(5);
    let mut out = String::with_capacity(len);
    for digit in (0..len).rev() {
        let bit = digit * 5;
        let i = bit / 8;
        let j = bit % 8;
        let mut window = (digest[i] as usize) >> j;
        if i + 1 < digest.len() {
            window |= (digest[i + 1] as usize) << (8 - j);
        }
        out.push(ALPHABET[window & 0x1f] as char);
    }
    out
}
