use crate::access::{ensure_staff, Actor};
use crate::auth::use_cases::user_details;
use crate::integrity;
use crate::signatures::dtos::*;
use crate::{AppError, AppResult};
use tracing::{info, instrument, warn};
use validator::Validate;

#[cfg(test)]
#[path = "use_cases_test.rs"]
mod tests;

use chrono::Utc;
use infrastructure::repositories::{Repositories, SignatureFilter};
use terra_core::entities::digital_signatures;
use uuid::Uuid;

const SIGNATURE_NOT_FOUND: &str = "Digital Signature not found.";

async fn respond(
    repos: &Repositories,
    sig: digital_signatures::Model,
) -> AppResult<SignatureResponse> {
    let signer = user_details(repos, sig.signer_id).await?;
    Ok(SignatureResponse::new(sig, signer))
}

async fn load(repos: &Repositories, id: Uuid) -> AppResult<digital_signatures::Model> {
    repos
        .signatures
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(SIGNATURE_NOT_FOUND.to_string()))
}

// ============ Submit Signature Use Case ============

pub struct CreateSignatureUseCase;

impl CreateSignatureUseCase {
    /// Signature verification gate. Nothing is written unless the claimed
    /// hash equals the document's recorded hash; the (document, signer,
    /// value) uniqueness is decided by the store in the same write.
    #[instrument(skip_all, fields(actor = %actor.user_id, document_id = %req.document))]
    pub async fn execute(
        repos: &Repositories,
        actor: &Actor,
        req: CreateSignatureRequest,
    ) -> AppResult<SignatureResponse> {
        req.validate()?;

        let document = repos
            .documents
            .find(req.document)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found.".to_string()))?;

        if let Err(e) = integrity::verify_signed_hash(&document.document_hash, &req.document_hash_at_signing) {
            warn!(document_id = %document.id, "Signature rejected on hash mismatch");
            return Err(e);
        }

        let sig = digital_signatures::Model {
            id: Uuid::new_v4(),
            document_id: document.id,
            signer_id: actor.user_id,
            signature_value: req.signature_value,
            signer_public_key: req.signer_public_key,
            signed_at: Utc::now().into(),
            document_hash_at_signing: document.document_hash,
            blockchain_signature_hash: req.blockchain_signature_hash,
        };

        let sig = repos.signatures.insert(sig).await?;
        info!(signature_id = %sig.id, "Signature recorded");
        respond(repos, sig).await
    }
}

// ============ List / Get Signature Use Cases ============

pub struct ListSignaturesUseCase;

impl ListSignaturesUseCase {
    #[instrument(skip(repos))]
    pub async fn execute(
        repos: &Repositories,
        query: SignatureQuery,
    ) -> AppResult<Vec<SignatureResponse>> {
        let sigs = repos
            .signatures
            .list(SignatureFilter {
                document_id: query.document_id,
            })
            .await?;
        let mut out = Vec::with_capacity(sigs.len());
        for sig in sigs {
            out.push(respond(repos, sig).await?);
        }
        Ok(out)
    }
}

pub struct GetSignatureUseCase;

impl GetSignatureUseCase {
    #[instrument(skip(repos))]
    pub async fn execute(repos: &Repositories, id: Uuid) -> AppResult<SignatureResponse> {
        let sig = load(repos, id).await?;
        respond(repos, sig).await
    }
}

// ============ Update Signature Use Case ============

pub struct UpdateSignatureUseCase;

impl UpdateSignatureUseCase {
    /// Takes the raw request body: a non-staff caller is refused before the
    /// payload is even parsed.
    #[instrument(skip(repos, actor, body), fields(actor = %actor.user_id))]
    pub async fn execute(
        repos: &Repositories,
        actor: &Actor,
        id: Uuid,
        body: &[u8],
    ) -> AppResult<SignatureResponse> {
        let mut sig = load(repos, id).await?;
        ensure_staff(actor, "You do not have permission to update signatures.")?;

        let req: UpdateSignatureRequest = serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Json deserialize error: {}", e)))?;

        let foreign_id = matches!(req.id, Some(other) if other != id);
        if foreign_id || !req.other.is_empty() {
            return Err(AppError::Validation(
                "Only specific fields like blockchain_signature_hash can be updated on a signature."
                    .to_string(),
            ));
        }
        if let Some(hash) = req.blockchain_signature_hash {
            if hash.len() > 255 {
                return Err(AppError::field(
                    "blockchain_signature_hash",
                    "Signature hash must be at most 255 characters",
                ));
            }
            sig.blockchain_signature_hash = Some(hash);
        }

        let sig = repos.signatures.update(sig).await?;
        info!(signature_id = %sig.id, "Signature updated");
        respond(repos, sig).await
    }
}

// ============ Delete Signature Use Case ============

pub struct DeleteSignatureUseCase;

impl DeleteSignatureUseCase {
    #[instrument(skip(repos, actor), fields(actor = %actor.user_id))]
    pub async fn execute(repos: &Repositories, actor: &Actor, id: Uuid) -> AppResult<()> {
        load(repos, id).await?;
        ensure_staff(actor, "You do not have permission to delete this signature.")?;

        repos.signatures.delete(id).await?;
        info!(signature_id = %id, "Signature deleted");
        Ok(())
    }
}
