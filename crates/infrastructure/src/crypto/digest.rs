use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `content`. This is the value stored as a
/// document's integrity anchor.
pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Normalises a caller-supplied hex digest for comparison against
/// [`sha256_hex`] output.
pub fn normalize_hex(digest: &str) -> String {
    digest.trim().to_ascii_lowercase()
}
