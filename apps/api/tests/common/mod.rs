//! Shared setup for the HTTP tests: in-memory repositories, a temporary
//! media root and tokens signed with the test secret.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use actix_web::body::{to_bytes, MessageBody};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::web;
use api::config::Config;
use application::auth::use_cases::{hash_password, issue_token};
use application::PinStep;
use async_trait::async_trait;
use chrono::Utc;
use infrastructure::ipfs::{ContentPinner, PinError};
use infrastructure::repositories::Repositories;
use infrastructure::storage::LocalFileStorage;
use serde_json::Value;
use terra_core::entities::sea_orm_active_enums::{DocumentType, PropertyType};
use terra_core::entities::{documents, properties, users};
use uuid::Uuid;

pub const PASSWORD: &str = "correct horse battery";
const BOUNDARY: &str = "terra-test-boundary";

pub struct TestContext {
    pub repos: web::Data<Repositories>,
    pub storage: web::Data<LocalFileStorage>,
    pub pin: web::Data<PinStep>,
    pub config: web::Data<Config>,
    _media: tempfile::TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_pin(PinStep::disabled())
    }

    pub fn with_pin(pin: PinStep) -> Self {
        let media = tempfile::tempdir().unwrap();
        let config = Config {
            database_url: "postgres://unused".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiration: 3600,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            media_root: media.path().to_string_lossy().into_owned(),
            max_upload_bytes: 1024 * 1024,
            ipfs_api_url: None,
            ipfs_timeout_secs: 1,
            ipfs_max_attempts: 1,
            rate_limit_per_minute: 1000,
            run_migrations: false,
        };
        Self {
            repos: web::Data::new(Repositories::in_memory()),
            storage: web::Data::new(LocalFileStorage::new(media.path())),
            pin: web::Data::new(pin),
            config: web::Data::new(config),
            _media: media,
        }
    }

    pub async fn user(&self, username: &str) -> users::Model {
        self.insert_user(username, false, "unused".to_string()).await
    }

    pub async fn staff(&self, username: &str) -> users::Model {
        self.insert_user(username, true, "unused".to_string()).await
    }

    /// A user whose password is `PASSWORD`, for the login flow.
    pub async fn user_with_password(&self, username: &str) -> users::Model {
        self.insert_user(username, false, hash_password(PASSWORD).unwrap()).await
    }

    async fn insert_user(&self, username: &str, is_staff: bool, password_hash: String) -> users::Model {
        self.repos
            .users
            .insert(users::Model {
                id: Uuid::new_v4(),
                username: username.to_string(),
                email: Some(format!("{}@example.com", username)),
                first_name: None,
                last_name: None,
                password_hash,
                is_staff,
                is_active: true,
                date_joined: Utc::now().into(),
            })
            .await
            .unwrap()
    }

    pub fn token(&self, user: &users::Model) -> String {
        issue_token(&self.config.auth_config(), user.id, user.is_staff).unwrap()
    }

    pub fn bearer(&self, user: &users::Model) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token(user)))
    }

    pub async fn property(&self, owner: &users::Model, upi: &str) -> properties::Model {
        let now = Utc::now().into();
        self.repos
            .properties
            .insert(properties::Model {
                id: Uuid::new_v4(),
                full_address: "14 Admiralty Way, Lekki".to_string(),
                property_type: PropertyType::Residential,
                unique_property_identifier: upi.to_string(),
                description: None,
                current_owner_id: owner.id,
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
                document_type: DocumentType::SaleAgreement,
                document_file: "legal_documents/sale.pdf".to_string(),
                document_hash: hash.to_string(),
                content_identifier: None,
                uploaded_by: Some(property.current_owner_id),
                upload_date: Utc::now().into(),
            })
            .await
            .unwrap()
    }
}

/// Builds the app the way `main` does, minus CORS, tracing and rate limiting.
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(api::middleware::auth::AuthMiddleware)
                .wrap(actix_web::middleware::NormalizePath::trim())
                .app_data($ctx.repos.clone())
                .app_data($ctx.storage.clone())
                .app_data($ctx.pin.clone())
                .app_data($ctx.config.clone())
                .configure(api::configure),
        )
        .await
    };
}

/// Calls the service and returns the status with the JSON body (`Null` when
/// empty). Errors raised by middleware are rendered like handler errors.
macro_rules! send {
    ($app:expr, $req:expr) => {
        common::into_json(actix_web::dev::Service::call(&$app, $req).await).await
    };
}

pub async fn into_json<B: MessageBody>(
    result: Result<ServiceResponse<B>, actix_web::Error>,
) -> (StatusCode, Value) {
    let (status, bytes) = match result {
        Ok(resp) => {
            let status = resp.status();
            (status, actix_web::test::read_body(resp).await)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            (status, to_bytes(resp.into_body()).await.unwrap())
        }
    };
    if bytes.is_empty() {
        (status, Value::Null)
    } else {
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

/// Encodes text fields and file parts as `multipart/form-data`. Returns the
/// content type header value and the body.
pub fn multipart(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for (name, file_name, content) in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// Always answers with the same CID.
pub struct FixedPinner(pub &'static str);

impl FixedPinner {
    pub fn step(cid: &'static str) -> PinStep {
        PinStep::new(Arc::new(FixedPinner(cid)))
    }
}

#[async_trait]
impl ContentPinner for FixedPinner {
    async fn pin(&self, _path: &Path) -> Result<String, PinError> {
        Ok(self.0.to_string())
    }
}

/// Simulates an IPFS daemon that is down.
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
