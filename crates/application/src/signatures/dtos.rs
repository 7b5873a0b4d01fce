use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use terra_core::entities::digital_signatures;
use uuid::Uuid;
use validator::Validate;

use crate::auth::dtos::UserDetails;

/// The signer is always the authenticated caller; a `signer` key in the
/// payload is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSignatureRequest {
    pub document: Uuid,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub signature_value: String,
    #[validate(length(min = 1, max = 255, message = "Public key must be between 1-255 characters"))]
    pub signer_public_key: String,
    #[validate(length(min = 1, max = 255, message = "Hash must be between 1-255 characters"))]
    pub document_hash_at_signing: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Signature hash must be at most 255 characters"))]
    pub blockchain_signature_hash: Option<String>,
}

/// Fields a privileged caller may touch. Anything else lands in `other` and
/// fails the allow-list check.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSignatureRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub blockchain_signature_hash: Option<String>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SignatureQuery {
    pub document_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignatureResponse {
    pub id: Uuid,
    pub document: Uuid,
    pub signer: Uuid,
    pub signer_details: Option<UserDetails>,
    pub signature_value: String,
    pub signer_public_key: String,
    pub signed_at: DateTime<FixedOffset>,
    pub document_hash_at_signing: String,
    pub blockchain_signature_hash: Option<String>,
}

impl SignatureResponse {
    pub fn new(sig: digital_signatures::Model, signer_details: Option<UserDetails>) -> Self {
        Self {
            id: sig.id,
            document: sig.document_id,
            signer: sig.signer_id,
            signer_details,
            signature_value: sig.signature_value,
            signer_public_key: sig.signer_public_key,
            signed_at: sig.signed_at,
            document_hash_at_signing: sig.document_hash_at_signing,
            blockchain_signature_hash: sig.blockchain_signature_hash,
        }
    }
}
