//! In-memory backend for tests and local runs without PostgreSQL.
//!
//! All tables live behind one lock, so each write checks its unique and
//! foreign-key constraints and applies cascades in a single critical section,
//! the same way the database does inside one statement.

use std::collections::HashMap;
use std::sync::Arc;

use terra_core::entities::{
    digital_signatures, documents, properties, transactions, user_profiles, users,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{RepoResult, RepositoryError, NON_FIELD_ERRORS};
use super::traits::{
    DocumentFilter, DocumentRepository, ProfileRepository, PropertyRepository,
    SignatureFilter, SignatureRepository, TransactionFilter, TransactionRepository,
    UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, users::Model>,
    profiles: HashMap<Uuid, user_profiles::Model>,
    properties: HashMap<Uuid, properties::Model>,
    documents: HashMap<Uuid, documents::Model>,
    transactions: HashMap<Uuid, transactions::Model>,
    signatures: HashMap<Uuid, digital_signatures::Model>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn both_set(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}

fn unique(field: &str) -> RepositoryError {
    RepositoryError::UniqueViolation(field.to_string())
}

fn missing(field: &str) -> RepositoryError {
    RepositoryError::MissingReference(field.to_string())
}

fn sorted<T: Clone, K: Ord>(rows: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(|r| key(r));
    rows
}

impl Tables {
    fn check_user(&self, user: &users::Model) -> RepoResult<()> {
        if self
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(unique("username"));
        }
        Ok(())
    }

    fn check_profile(&self, profile: &user_profiles::Model) -> RepoResult<()> {
        if !self.users.contains_key(&profile.user_id) {
            return Err(missing("user"));
        }
        for other in self.profiles.values().filter(|p| p.user_id != profile.user_id) {
            if other.phone_number == profile.phone_number {
                return Err(unique("phone_number"));
            }
            if other.id_number == profile.id_number {
                return Err(unique("id_number"));
            }
            if both_set(&other.tax_identification_number, &profile.tax_identification_number) {
                return Err(unique("tax_identification_number"));
            }
            if both_set(&other.biometric_hash, &profile.biometric_hash) {
                return Err(unique("biometric_hash"));
            }
            if both_set(&other.blockchain_wallet_address, &profile.blockchain_wallet_address) {
                return Err(unique("blockchain_wallet_address"));
            }
        }
        Ok(())
    }

    fn check_property(&self, property: &properties::Model) -> RepoResult<()> {
        if !self.users.contains_key(&property.current_owner_id) {
            return Err(missing("current_owner"));
        }
        if self.properties.values().any(|p| {
            p.id != property.id && p.unique_property_identifier == property.unique_property_identifier
        }) {
            return Err(unique("unique_property_identifier"));
        }
        Ok(())
    }

    fn check_document(&self, document: &documents::Model) -> RepoResult<()> {
        if !self.properties.contains_key(&document.property_id) {
            return Err(missing("property"));
        }
        if let Some(uploader) = document.uploaded_by {
            if !self.users.contains_key(&uploader) {
                return Err(missing("uploaded_by"));
            }
        }
        if self
            .documents
            .values()
            .any(|d| d.id != document.id && d.document_hash == document.document_hash)
        {
            return Err(unique("document_hash"));
        }
        Ok(())
    }

    fn check_transaction(&self, tx: &transactions::Model) -> RepoResult<()> {
        if !self.properties.contains_key(&tx.property_id) {
            return Err(missing("property"));
        }
        if !self.users.contains_key(&tx.seller_id) {
            return Err(missing("seller"));
        }
        if !self.users.contains_key(&tx.buyer_id) {
            return Err(missing("buyer"));
        }
        if self.transactions.values().any(|t| {
            t.id != tx.id && both_set(&t.blockchain_transaction_hash, &tx.blockchain_transaction_hash)
        }) {
            return Err(unique("blockchain_transaction_hash"));
        }
        Ok(())
    }

    fn check_signature(&self, sig: &digital_signatures::Model) -> RepoResult<()> {
        if !self.documents.contains_key(&sig.document_id) {
            return Err(missing("document"));
        }
        if !self.users.contains_key(&sig.signer_id) {
            return Err(missing("signer"));
        }
        for other in self.signatures.values().filter(|s| s.id != sig.id) {
            if other.document_id == sig.document_id
                && other.signer_id == sig.signer_id
                && other.signature_value == sig.signature_value
            {
                return Err(unique(NON_FIELD_ERRORS));
            }
            if both_set(&other.blockchain_signature_hash, &sig.blockchain_signature_hash) {
                return Err(unique("blockchain_signature_hash"));
            }
        }
        Ok(())
    }

    fn remove_document(&mut self, id: Uuid) -> RepoResult<()> {
        self.documents.remove(&id).ok_or(RepositoryError::NotFound)?;
        self.signatures.retain(|_, s| s.document_id != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<users::Model>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<users::Model>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, user: users::Model) -> RepoResult<users::Model> {
        let mut tables = self.tables.write().await;
        tables.check_user(&user)?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn register(
        &self,
        user: users::Model,
        profile: user_profiles::Model,
    ) -> RepoResult<(users::Model, user_profiles::Model)> {
        let mut tables = self.tables.write().await;
        tables.check_user(&user)?;
        tables.users.insert(user.id, user.clone());
        if let Err(e) = tables.check_profile(&profile) {
            tables.users.remove(&user.id);
            return Err(e);
        }
        tables.profiles.insert(profile.user_id, profile.clone());
        Ok((user, profile))
    }
}

#[async_trait::async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find(&self, user_id: Uuid) -> RepoResult<Option<user_profiles::Model>> {
        Ok(self.tables.read().await.profiles.get(&user_id).cloned())
    }

    async fn list(&self) -> RepoResult<Vec<user_profiles::Model>> {
        let tables = self.tables.read().await;
        Ok(sorted(tables.profiles.values().cloned(), |p| p.user_id))
    }

    async fn update(&self, profile: user_profiles::Model) -> RepoResult<user_profiles::Model> {
        let mut tables = self.tables.write().await;
        if !tables.profiles.contains_key(&profile.user_id) {
            return Err(RepositoryError::NotFound);
        }
        tables.check_profile(&profile)?;
        tables.profiles.insert(profile.user_id, profile.clone());
        Ok(profile)
    }

    async fn delete(&self, user_id: Uuid) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .profiles
            .remove(&user_id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait::async_trait]
impl PropertyRepository for InMemoryStore {
    async fn find(&self, id: Uuid) -> RepoResult<Option<properties::Model>> {
        Ok(self.tables.read().await.properties.get(&id).cloned())
    }

    async fn list(&self) -> RepoResult<Vec<properties::Model>> {
        let tables = self.tables.read().await;
        Ok(sorted(tables.properties.values().cloned(), |p| p.created_at))
    }

    async fn insert(&self, property: properties::Model) -> RepoResult<properties::Model> {
        let mut tables = self.tables.write().await;
        tables.check_property(&property)?;
        tables.properties.insert(property.id, property.clone());
        Ok(property)
    }

    async fn update(&self, property: properties::Model) -> RepoResult<properties::Model> {
        let mut tables = self.tables.write().await;
        if !tables.properties.contains_key(&property.id) {
            return Err(RepositoryError::NotFound);
        }
        tables.check_property(&property)?;
        tables.properties.insert(property.id, property.clone());
        Ok(property)
    }

    async fn set_ownership_document_cid(&self, id: Uuid, cid: &str) -> RepoResult<properties::Model> {
        let mut tables = self.tables.write().await;
        let property = tables.properties.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        property.ownership_document_cid = Some(cid.to_string());
        Ok(property.clone())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.properties.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if tables.transactions.values().any(|t| t.property_id == id) {
            return Err(RepositoryError::ReferencedBy("transactions".to_string()));
        }
        let document_ids: Vec<Uuid> = tables
            .documents
            .values()
            .filter(|d| d.property_id == id)
            .map(|d| d.id)
            .collect();
        for document_id in document_ids {
            tables.remove_document(document_id)?;
        }
        tables.properties.remove(&id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentRepository for InMemoryStore {
    async fn find(&self, id: Uuid) -> RepoResult<Option<documents::Model>> {
        Ok(self.tables.read().await.documents.get(&id).cloned())
    }

    async fn list(&self, filter: DocumentFilter) -> RepoResult<Vec<documents::Model>> {
        let tables = self.tables.read().await;
        let rows = tables
            .documents
            .values()
            .filter(|d| filter.property_id.map_or(true, |p| d.property_id == p))
            .cloned();
        Ok(sorted(rows, |d| d.upload_date))
    }

    async fn insert(&self, document: documents::Model) -> RepoResult<documents::Model> {
        let mut tables = self.tables.write().await;
        tables.check_document(&document)?;
        tables.documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn update(&self, document: documents::Model) -> RepoResult<documents::Model> {
        let mut tables = self.tables.write().await;
        if !tables.documents.contains_key(&document.id) {
            return Err(RepositoryError::NotFound);
        }
        tables.check_document(&document)?;
        tables.documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn set_content_identifier(&self, id: Uuid, cid: &str) -> RepoResult<documents::Model> {
        let mut tables = self.tables.write().await;
        let document = tables.documents.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        document.content_identifier = Some(cid.to_string());
        Ok(document.clone())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.tables.write().await.remove_document(id)
    }
}

#[async_trait::async_trait]
impl TransactionRepository for InMemoryStore {
    async fn find(&self, id: Uuid) -> RepoResult<Option<transactions::Model>> {
        Ok(self.tables.read().await.transactions.get(&id).cloned())
    }

    async fn list(&self, filter: TransactionFilter) -> RepoResult<Vec<transactions::Model>> {
        let tables = self.tables.read().await;
        let rows = tables
            .transactions
            .values()
            .filter(|t| {
                filter
                    .involved_user_id
                    .map_or(true, |u| t.seller_id == u || t.buyer_id == u)
            })
            .cloned();
        Ok(sorted(rows, |t| t.created_at))
    }

    async fn exists_for_property(&self, property_id: Uuid) -> RepoResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.transactions.values().any(|t| t.property_id == property_id))
    }

    async fn insert(&self, transaction: transactions::Model) -> RepoResult<transactions::Model> {
        let mut tables = self.tables.write().await;
        tables.check_transaction(&transaction)?;
        tables.transactions.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn update(&self, transaction: transactions::Model) -> RepoResult<transactions::Model> {
        let mut tables = self.tables.write().await;
        if !tables.transactions.contains_key(&transaction.id) {
            return Err(RepositoryError::NotFound);
        }
        tables.check_transaction(&transaction)?;
        tables.transactions.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .transactions
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait::async_trait]
impl SignatureRepository for InMemoryStore {
    async fn find(&self, id: Uuid) -> RepoResult<Option<digital_signatures::Model>> {
        Ok(self.tables.read().await.signatures.get(&id).cloned())
    }

    async fn list(&self, filter: SignatureFilter) -> RepoResult<Vec<digital_signatures::Model>> {
        let tables = self.tables.read().await;
        let rows = tables
            .signatures
            .values()
            .filter(|s| filter.document_id.map_or(true, |d| s.document_id == d))
            .cloned();
        Ok(sorted(rows, |s| s.signed_at))
    }

    async fn insert(
        &self,
        signature: digital_signatures::Model,
    ) -> RepoResult<digital_signatures::Model> {
        let mut tables = self.tables.write().await;
        tables.check_signature(&signature)?;
        tables.signatures.insert(signature.id, signature.clone());
        Ok(signature)
    }

    async fn update(
        &self,
        signature: digital_signatures::Model,
    ) -> RepoResult<digital_signatures::Model> {
        let mut tables = self.tables.write().await;
        if !tables.signatures.contains_key(&signature.id) {
            return Err(RepositoryError::NotFound);
        }
        tables.check_signature(&signature)?;
        tables.signatures.insert(signature.id, signature.clone());
        Ok(signature)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .signatures
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
