// Repository pattern for database abstraction.
// Use cases depend on the traits only; `Repositories` bundles one backend.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod traits;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use error::{RepoResult, RepositoryError, NON_FIELD_ERRORS};
pub use memory::InMemoryStore;
pub use traits::*;

#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub properties: Arc<dyn PropertyRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub signatures: Arc<dyn SignatureRepository>,
}

impl Repositories {
    pub fn postgres(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(postgres::PostgresUserRepository::new(db.clone())),
            profiles: Arc::new(postgres::PostgresProfileRepository::new(db.clone())),
            properties: Arc::new(postgres::PostgresPropertyRepository::new(db.clone())),
            documents: Arc::new(postgres::PostgresDocumentRepository::new(db.clone())),
            transactions: Arc::new(postgres::PostgresTransactionRepository::new(db.clone())),
            signatures: Arc::new(postgres::PostgresSignatureRepository::new(db)),
        }
    }

    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            profiles: Arc::new(store.clone()),
            properties: Arc::new(store.clone()),
            documents: Arc::new(store.clone()),
            transactions: Arc::new(store.clone()),
            signatures: Arc::new(store),
        }
    }
}
