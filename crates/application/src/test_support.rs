//! Fixtures shared by the use case tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use infrastructure::ipfs::{ContentPinner, PinError};
use infrastructure::repositories::Repositories;
use infrastructure::storage::LocalFileStorage;
use terra_core::entities::sea_orm_active_enums::{DocumentType, PropertyType};
use terra_core::entities::{documents, properties, users};
use uuid::Uuid;

use crate::access::Actor;
use crate::pinning::PinStep;

pub struct Fixture {
    pub repos: Repositories,
    pub storage: LocalFileStorage,
    _media: tempfile::TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let media = tempfile::tempdir().unwrap();
        Self {
            repos: Repositories::in_memory(),
            storage: LocalFileStorage::new(media.path()),
            _media: media,
        }
    }

    pub async fn user(&self, username: &str) -> Actor {
        self.user_with_role(username, false).await
    }

    pub async fn staff(&self, username: &str) -> Actor {
        self.user_with_role(username, true).await
    }

    pub async fn property(&self, owner: &Actor, upi: &str) -> properties::Model {
        let now = Utc::now().into();
        self.repos
            .properties
            .insert(properties::Model {
                id: Uuid::new_v4(),
                full_address: "3 Broad Street, Lagos Island".to_string(),
                property_type: PropertyType::Commercial,
                unique_property_identifier: upi.to_string(),
                description: None,
                current_owner_id: owner.user_id,
                proof_of_ownership_document: None,
                ownership_document_cid: None,
                gps_latitude: None,
                gps_longitude: None,
                survey_plan_hash: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }

    pub async fn document(&self, property: &properties::Model, hash: &str) -> documents::Model {
        self.repos
            .documents
            .insert(documents::Model {
                id: Uuid::new_v4(),
                property_id: property.id,
                document_type: DocumentType::DeedOfAssignment,
                document_file: "legal_documents/deed.pdf".to_string(),
                document_hash: hash.to_string(),
                content_identifier: None,
                uploaded_by: Some(property.current_owner_id),
                upload_date: Utc::now().into(),
            })
            .await
            .unwrap()
    }

    async fn user_with_role(&self, username: &str, is_staff: bool) -> Actor {
        let user = self
            .repos
            .users
            .insert(users::Model {
                id: Uuid::new_v4(),
                username: username.to_string(),
                email: None,
                first_name: None,
                last_name: None,
                password_hash: "unused".to_string(),
                is_staff,
                is_active: true,
                date_joined: Utc::now().into(),
            })
            .await
            .unwrap();
        Actor::new(user.id, is_staff)
    }
}

/// Always answers with the same CID and counts calls.
pub struct FixedPinner {
    pub cid: String,
    pub calls: AtomicUsize,
}

impl FixedPinner {
    pub fn step(cid: &str) -> (PinStep, Arc<FixedPinner>) {
        let pinner = Arc::new(FixedPinner {
            cid: cid.to_string(),
            calls: AtomicUsize::new(0),
        });
        (PinStep::new(pinner.clone()), pinner)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentPinner for FixedPinner {
    async fn pin(&self, path: &Path) -> Result<String, PinError> {
        assert!(path.exists(), "pinned file must exist on disk");
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.cid.clone())
    }
}

/// Simulates an unreachable daemon.
pub struct UnavailablePinner;

impl UnavailablePinner {
    pub fn step() -> PinStep {
        PinStep::new(Arc::new(UnavailablePinner))
    }
}

#[async_trait]
impl ContentPinner for UnavailablePinner {
    async fn pin(&self, _path: &Path) -> Result<String, PinError> {
        Err(PinError::Status {
            status: 503,
            body: "daemon offline".to_string(),
        })
    }
}

/// Pins successfully but removes every property (and with them their
/// documents) first, so the follow-up CID write finds nothing.
pub struct VanishingPinner {
    repos: Repositories,
}

impl VanishingPinner {
    pub fn step(repos: &Repositories) -> PinStep {
        PinStep::new(Arc::new(VanishingPinner {
            repos: repos.clone(),
        }))
    }
}

#[async_trait]
impl ContentPinner for VanishingPinner {
    async fn pin(&self, _path: &Path) -> Result<String, PinError> {
        for property in self.repos.properties.list().await.unwrap_or_default() {
            let _ = self.repos.properties.delete(property.id).await;
        }
        Ok("QmGone".to_string())
    }
}
