//! Document integrity: the content hash recorded at upload is the anchor
//! every later signature is checked against.

use infrastructure::crypto::digest::{normalize_hex, sha256_hex};

use crate::{AppError, AppResult};

/// Hex SHA-256 of the uploaded bytes.
pub fn record(content: &[u8]) -> String {
    sha256_hex(content)
}

/// Loose comparison for hashes declared next to an upload. Hex case and
/// surrounding whitespace are not significant.
pub fn matches(recorded: &str, claimed: &str) -> bool {
    normalize_hex(recorded) == normalize_hex(claimed)
}

/// Checks a `document_hash` supplied alongside an upload against the hash
/// computed from the bytes.
pub fn verify_declared(computed: &str, declared: Option<&str>) -> AppResult<()> {
    match declared {
        Some(declared) if !matches(computed, declared) => Err(AppError::field(
            "document_hash",
            format!(
                "Provided hash does not match the uploaded file. Computed {}.",
                computed
            ),
        )),
        _ => Ok(()),
    }
}

/// Signature gate: the hash the signer claims to have signed must be exactly
/// the document's recorded hash.
pub fn verify_signed_hash(recorded: &str, claimed: &str) -> AppResult<()> {
    if recorded == claimed {
        Ok(())
    } else {
        Err(AppError::field(
            "document_hash_at_signing",
            format!("Hash mismatch. Expected {} for the document.", recorded),
        ))
    }
}
