// One trait per aggregate. Use cases only ever talk to these, so the
// PostgreSQL and in-memory backends are interchangeable.

use async_trait::async_trait;
use terra_core::entities::{
    digital_signatures, documents, properties, transactions, user_profiles, users,
};
use uuid::Uuid;

use super::error::RepoResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFilter {
    pub property_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// Matches transactions where this user is seller or buyer.
    pub involved_user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureFilter {
    pub document_id: Option<Uuid>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<users::Model>>;
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<users::Model>>;
    async fn insert(&self, user: users::Model) -> RepoResult<users::Model>;
    /// Inserts identity and profile atomically.
    async fn register(
        &self,
        user: users::Model,
        profile: user_profiles::Model,
    ) -> RepoResult<(users::Model, user_profiles::Model)>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, user_id: Uuid) -> RepoResult<Option<user_profiles::Model>>;
    async fn list(&self) -> RepoResult<Vec<user_profiles::Model>>;
    async fn update(&self, profile: user_profiles::Model) -> RepoResult<user_profiles::Model>;
    async fn delete(&self, user_id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> RepoResult<Option<properties::Model>>;
    async fn list(&self) -> RepoResult<Vec<properties::Model>>;
    async fn insert(&self, property: properties::Model) -> RepoResult<properties::Model>;
    async fn update(&self, property: properties::Model) -> RepoResult<properties::Model>;
    /// Writes only the CID column; never triggers pinning.
    async fn set_ownership_document_cid(&self, id: Uuid, cid: &str) -> RepoResult<properties::Model>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> RepoResult<Option<documents::Model>>;
    async fn list(&self, filter: DocumentFilter) -> RepoResult<Vec<documents::Model>>;
    async fn insert(&self, document: documents::Model) -> RepoResult<documents::Model>;
    async fn update(&self, document: documents::Model) -> RepoResult<documents::Model>;
    /// Writes only the CID column; never triggers pinning.
    async fn set_content_identifier(&self, id: Uuid, cid: &str) -> RepoResult<documents::Model>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> RepoResult<Option<transactions::Model>>;
    async fn list(&self, filter: TransactionFilter) -> RepoResult<Vec<transactions::Model>>;
    async fn exists_for_property(&self, property_id: Uuid) -> RepoResult<bool>;
    async fn insert(&self, transaction: transactions::Model) -> RepoResult<transactions::Model>;
    async fn update(&self, transaction: transactions::Model) -> RepoResult<transactions::Model>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait SignatureRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> RepoResult<Option<digital_signatures::Model>>;
    async fn list(&self, filter: SignatureFilter) -> RepoResult<Vec<digital_signatures::Model>>;
    /// The (document, signer, value) unique constraint is enforced here, in
    /// the same step as the write.
    async fn insert(
        &self,
        signature: digital_signatures::Model,
    ) -> RepoResult<digital_signatures::Model>;
    async fn update(
        &self,
        signature: digital_signatures::Model,
    ) -> RepoResult<digital_signatures::Model>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}
