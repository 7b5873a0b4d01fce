// PostgreSQL implementation of repositories, via Sea-ORM.
// Constraint violations surface as RepositoryError through From<DbErr>.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use terra_core::entities::{
    digital_signatures, documents, properties, transactions, user_profiles, users,
};
use uuid::Uuid;

use super::error::{RepoResult, RepositoryError};
use super::traits::{
    DocumentFilter, DocumentRepository, ProfileRepository, PropertyRepository,
    SignatureFilter, SignatureRepository, TransactionFilter, TransactionRepository,
    UserRepository,
};

fn ensure_deleted(rows_affected: u64) -> RepoResult<()> {
    if rows_affected == 0 {
        Err(RepositoryError::NotFound)
    } else {
        Ok(())
    }
}

pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<users::Model>> {
        Ok(users::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    async fn insert(&self, user: users::Model) -> RepoResult<users::Model> {
        Ok(user.into_active_model().reset_all().insert(&self.db).await?)
    }

    async fn register(
        &self,
        user: users::Model,
        profile: user_profiles::Model,
    ) -> RepoResult<(users::Model, user_profiles::Model)> {
        let txn = self.db.begin().await?;
        let user = user.into_active_model().reset_all().insert(&txn).await?;
        let profile = profile.into_active_model().reset_all().insert(&txn).await?;
        txn.commit().await?;
        Ok((user, profile))
    }
}

pub struct PostgresProfileRepository {
    db: DatabaseConnection,
}

impl PostgresProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find(&self, user_id: Uuid) -> RepoResult<Option<user_profiles::Model>> {
        Ok(user_profiles::Entity::find_by_id(user_id).one(&self.db).await?)
    }

    async fn list(&self) -> RepoResult<Vec<user_profiles::Model>> {
        Ok(user_profiles::Entity::find()
            .order_by_asc(user_profiles::Column::UserId)
            .all(&self.db)
            .await?)
    }

    async fn update(&self, profile: user_profiles::Model) -> RepoResult<user_profiles::Model> {
        Ok(profile.into_active_model().reset_all().update(&self.db).await?)
    }

    async fn delete(&self, user_id: Uuid) -> RepoResult<()> {
        let result = user_profiles::Entity::delete_by_id(user_id).exec(&self.db).await?;
        ensure_deleted(result.rows_affected)
    }
}

pub struct PostgresPropertyRepository {
    db: DatabaseConnection,
}

impl PostgresPropertyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl PropertyRepository for PostgresPropertyRepository {
    async fn find(&self, id: Uuid) -> RepoResult<Option<properties::Model>> {
        Ok(properties::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list(&self) -> RepoResult<Vec<properties::Model>> {
        Ok(properties::Entity::find()
            .order_by_asc(properties::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    async fn insert(&self, property: properties::Model) -> RepoResult<properties::Model> {
        Ok(property.into_active_model().reset_all().insert(&self.db).await?)
    }

    async fn update(&self, property: properties::Model) -> RepoResult<properties::Model> {
        Ok(property.into_active_model().reset_all().update(&self.db).await?)
    }

    async fn set_ownership_document_cid(&self, id: Uuid, cid: &str) -> RepoResult<properties::Model> {
        let active = properties::ActiveModel {
            id: ActiveValue::Unchanged(id),
            ownership_document_cid: ActiveValue::Set(Some(cid.to_string())),
            ..Default::default()
        };
        Ok(active.update(&self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = properties::Entity::delete_by_id(id).exec(&self.db).await?;
        ensure_deleted(result.rows_affected)
    }
}

pub struct PostgresDocumentRepository {
    db: DatabaseConnection,
}

impl PostgresDocumentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn find(&self, id: Uuid) -> RepoResult<Option<documents::Model>> {
        Ok(documents::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list(&self, filter: DocumentFilter) -> RepoResult<Vec<documents::Model>> {
        let mut query = documents::Entity::find();
        if let Some(property_id) = filter.property_id {
            query = query.filter(documents::Column::PropertyId.eq(property_id));
        }
        Ok(query
            .order_by_asc(documents::Column::UploadDate)
            .all(&self.db)
            .await?)
    }

    async fn insert(&self, document: documents::Model) -> RepoResult<documents::Model> {
        Ok(document.into_active_model().reset_all().insert(&self.db).await?)
    }

    async fn update(&self, document: documents::Model) -> RepoResult<documents::Model> {
        Ok(document.into_active_model().reset_all().update(&self.db).await?)
    }

    async fn set_content_identifier(&self, id: Uuid, cid: &str) -> RepoResult<documents::Model> {
        let active = documents::ActiveModel {
            id: ActiveValue::Unchanged(id),
            content_identifier: ActiveValue::Set(Some(cid.to_string())),
            ..Default::default()
        };
        Ok(active.update(&self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = documents::Entity::delete_by_id(id).exec(&self.db).await?;
        ensure_deleted(result.rows_affected)
    }
}

pub struct PostgresTransactionRepository {
    db: DatabaseConnection,
}

impl PostgresTransactionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn find(&self, id: Uuid) -> RepoResult<Option<transactions::Model>> {
        Ok(transactions::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list(&self, filter: TransactionFilter) -> RepoResult<Vec<transactions::Model>> {
        let mut query = transactions::Entity::find();
        if let Some(user_id) = filter.involved_user_id {
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::SellerId.eq(user_id))
                    .add(transactions::Column::BuyerId.eq(user_id)),
            );
        }
        Ok(query
            .order_by_asc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    async fn exists_for_property(&self, property_id: Uuid) -> RepoResult<bool> {
        let count = transactions::Entity::find()
            .filter(transactions::Column::PropertyId.eq(property_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn insert(&self, transaction: transactions::Model) -> RepoResult<transactions::Model> {
        Ok(transaction.into_active_model().reset_all().insert(&self.db).await?)
    }

    async fn update(&self, transaction: transactions::Model) -> RepoResult<transactions::Model> {
        Ok(transaction.into_active_model().reset_all().update(&self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = transactions::Entity::delete_by_id(id).exec(&self.db).await?;
        ensure_deleted(result.rows_affected)
    }
}

pub struct PostgresSignatureRepository {
    db: DatabaseConnection,
}

impl PostgresSignatureRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl SignatureRepository for PostgresSignatureRepository {
    async fn find(&self, id: Uuid) -> RepoResult<Option<digital_signatures::Model>> {
        Ok(digital_signatures::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list(&self, filter: SignatureFilter) -> RepoResult<Vec<digital_signatures::Model>> {
        let mut query = digital_signatures::Entity::find();
        if let Some(document_id) = filter.document_id {
            query = query.filter(digital_signatures::Column::DocumentId.eq(document_id));
        }
        Ok(query
            .order_by_asc(digital_signatures::Column::SignedAt)
            .all(&self.db)
            .await?)
    }

    async fn insert(
        &self,
        signature: digital_signatures::Model,
    ) -> RepoResult<digital_signatures::Model> {
        Ok(signature.into_active_model().reset_all().insert(&self.db).await?)
    }

    async fn update(
        &self,
        signature: digital_signatures::Model,
    ) -> RepoResult<digital_signatures::Model> {
        Ok(signature.into_active_model().reset_all().update(&self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = digital_signatures::Entity::delete_by_id(id).exec(&self.db).await?;
        ensure_deleted(result.rows_affected)
    }
}
