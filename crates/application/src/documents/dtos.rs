use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use terra_core::entities::documents;
use terra_core::entities::sea_orm_active_enums::DocumentType;
use uuid::Uuid;

use crate::auth::dtos::UserDetails;

/// Form fields accompanying a document upload. `uploaded_by` is never read
/// from the client.
#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub property: Uuid,
    pub document_type: DocumentType,
    /// Optional client-computed digest, checked against the server's.
    #[serde(default)]
    pub document_hash: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDocumentRequest {
    #[serde(default)]
    pub property: Option<Uuid>,
    #[serde(default)]
    pub document_type: Option<DocumentType>,
    /// Honoured for staff only.
    #[serde(default)]
    pub uploaded_by: Option<Uuid>,
    /// Always rejected: the recorded hash is immutable.
    #[serde(default)]
    pub document_hash: Option<String>,
    /// A `document_file` sent as a plain form value; rejected like an upload.
    #[serde(default)]
    pub document_file: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DocumentQuery {
    pub property_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub property: Uuid,
    pub document_type: DocumentType,
    pub document_file: String,
    pub document_hash: String,
    pub content_identifier: Option<String>,
    pub uploaded_by: Option<Uuid>,
    pub uploaded_by_details: Option<UserDetails>,
    pub upload_date: DateTime<FixedOffset>,
}

impl DocumentResponse {
    pub fn new(document: documents::Model, uploaded_by_details: Option<UserDetails>) -> Self {
        Self {
            id: document.id,
            property: document.property_id,
            document_type: document.document_type,
            document_file: document.document_file,
            document_hash: document.document_hash,
            content_identifier: document.content_identifier,
            uploaded_by: document.uploaded_by,
            uploaded_by_details,
            upload_date: document.upload_date,
        }
    }
}
