use crate::access::Actor;
use crate::auth::use_cases::user_details;
use crate::documents::dtos::*;
use crate::integrity;
use crate::pinning::{record_cid, PinStep};
use crate::uploads::FileUpload;
use crate::{AppError, AppResult};
use tracing::{info, instrument, warn};

#[cfg(test)]
#[path = "use_cases_test.rs"]
mod tests;

use chrono::Utc;
use infrastructure::repositories::{DocumentFilter, Repositories};
use infrastructure::storage::{LocalFileStorage, LEGAL_DOCUMENTS_DIR};
use terra_core::entities::documents;
use uuid::Uuid;

const DOCUMENT_NOT_FOUND: &str = "Document not found.";

async fn respond(repos: &Repositories, document: documents::Model) -> AppResult<DocumentResponse> {
    let uploader = match document.uploaded_by {
        Some(id) => user_details(repos, id).await?,
        None => None,
    };
    Ok(DocumentResponse::new(document, uploader))
}

async fn ensure_property_exists(repos: &Repositories, property_id: Uuid) -> AppResult<()> {
    if repos.properties.find(property_id).await?.is_none() {
        return Err(AppError::field(
            "property",
            format!("Invalid pk \"{}\" - object does not exist.", property_id),
        ));
    }
    Ok(())
}

fn ensure_uploader_or_staff(actor: &Actor, document: &documents::Model, message: &str) -> AppResult<()> {
    if actor.can_modify_optional(document.uploaded_by) {
        Ok(())
    } else {
        warn!(user_id = %actor.user_id, document_id = %document.id, "{}", message);
        Err(AppError::Authorization(message.to_string()))
    }
}

// ============ Create Document Use Case ============

pub struct CreateDocumentUseCase;

impl CreateDocumentUseCase {
    /// Records the content hash, stores the file, then pins it best-effort.
    #[instrument(skip_all, fields(actor = %actor.user_id, property_id = %req.property))]
    pub async fn execute(
        repos: &Repositories,
        storage: &LocalFileStorage,
        pin: &PinStep,
        actor: &Actor,
        req: CreateDocumentRequest,
        file: Option<FileUpload>,
    ) -> AppResult<DocumentResponse> {
        let file = file.ok_or_else(|| AppError::field("document_file", "No file was submitted."))?;
        if file.content.is_empty() {
            return Err(AppError::field("document_file", "The submitted file is empty."));
        }
        ensure_property_exists(repos, req.property).await?;

        let document_hash = integrity::record(&file.content);
        integrity::verify_declared(&document_hash, req.document_hash.as_deref())?;

        let path = storage
            .save(LEGAL_DOCUMENTS_DIR, &file.file_name, &file.content)
            .await?;
        let document = documents::Model {
            id: Uuid::new_v4(),
            property_id: req.property,
            document_type: req.document_type,
            document_file: path.clone(),
            document_hash,
            content_identifier: None,
            uploaded_by: Some(actor.user_id),
            upload_date: Utc::now().into(),
        };

        let document = match repos.documents.insert(document).await {
            Ok(document) => document,
            Err(e) => {
                storage.discard(&path).await;
                return Err(e.into());
            }
        };
        info!(document_id = %document.id, hash = %document.document_hash, "Document recorded");

        let document = match pin.pin_stored(storage, &document.document_file).await {
            Some(cid) => {
                let id = document.id;
                record_cid(document, repos.documents.set_content_identifier(id, &cid)).await
            }
            None => document,
        };
        respond(repos, document).await
    }
}

// ============ List / Get Document Use Cases ============

pub struct ListDocumentsUseCase;

impl ListDocumentsUseCase {
    #[instrument(skip(repos))]
    pub async fn execute(repos: &Repositories, query: DocumentQuery) -> AppResult<Vec<DocumentResponse>> {
        let documents = repos
            .documents
            .list(DocumentFilter {
                property_id: query.property_id,
            })
            .await?;
        let mut out = Vec::with_capacity(documents.len());
        for document in documents {
            out.push(respond(repos, document).await?);
        }
        Ok(out)
    }
}

pub struct GetDocumentUseCase;

impl GetDocumentUseCase {
    #[instrument(skip(repos))]
    pub async fn execute(repos: &Repositories, id: Uuid) -> AppResult<DocumentResponse> {
        let document = repos
            .documents
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(DOCUMENT_NOT_FOUND.to_string()))?;
        respond(repos, document).await
    }
}

// ============ Update Document Use Case ============

pub struct UpdateDocumentUseCase;

impl UpdateDocumentUseCase {
    /// Only the type and the owning property may change. The file and its
    /// hash are fixed at upload.
    #[instrument(skip(repos, actor, req, file), fields(actor = %actor.user_id))]
    pub async fn execute(
        repos: &Repositories,
        actor: &Actor,
        id: Uuid,
        req: UpdateDocumentRequest,
        file: Option<FileUpload>,
    ) -> AppResult<DocumentResponse> {
        let mut document = repos
            .documents
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(DOCUMENT_NOT_FOUND.to_string()))?;

        ensure_uploader_or_staff(actor, &document, "You do not have permission to modify this document.")?;

        if file.is_some() || req.document_file.is_some() {
            return Err(AppError::field(
                "document_file",
                "The document file cannot be replaced; upload a new document instead.",
            ));
        }
        if req.document_hash.is_some() {
            return Err(AppError::field(
                "document_hash",
                "The document hash is immutable once recorded.",
            ));
        }

        if let Some(property_id) = req.property {
            ensure_property_exists(repos, property_id).await?;
            document.property_id = property_id;
        }
        if let Some(document_type) = req.document_type {
            document.document_type = document_type;
        }
        match req.uploaded_by {
            Some(uploader) if actor.is_staff => {
                if repos.users.find_by_id(uploader).await?.is_none() {
                    return Err(AppError::field(
                        "uploaded_by",
                        format!("Invalid pk \"{}\" - object does not exist.", uploader),
                    ));
                }
                document.uploaded_by = Some(uploader);
            }
            Some(_) => {
                info!(document_id = %document.id, "Ignoring uploader change from non-staff caller");
            }
            None => {}
        }

        let document = repos.documents.update(document).await?;
        info!(document_id = %document.id, "Document updated");
        respond(repos, document).await
    }
}

// ============ Delete Document Use Case ============

pub struct DeleteDocumentUseCase;

impl DeleteDocumentUseCase {
    /// Signatures on the document go with it.
    #[instrument(skip(repos, actor), fields(actor = %actor.user_id))]
    pub async fn execute(repos: &Repositories, actor: &Actor, id: Uuid) -> AppResult<()> {
        let document = repos
            .documents
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(DOCUMENT_NOT_FOUND.to_string()))?;

        ensure_uploader_or_staff(actor, &document, "You do not have permission to delete this document.")?;

        repos.documents.delete(id).await?;
        info!(document_id = %id, "Document deleted");
        Ok(())
    }
}
