//! Fixed-key XOR obfuscation of database bytes.
//!
//! This is not encryption. Every byte is XORed with the same key, so the
//! transform is its own inverse: the same call hides plaintext and reveals
//! obscured bytes.

pub const ASCII_MAX: u8 = 128;
pub const CIPHER_KEY: u8 = ASCII_MAX.wrapping_add(42);

pub fn transform(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        *byte ^= CIPHER_KEY;
    }
}

pub fn transformed(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    transform(&mut out);
    out
}
