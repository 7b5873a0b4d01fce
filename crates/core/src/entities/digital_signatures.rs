use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One signing event. (document_id, signer_id, signature_value) is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "digital_signatures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub document_id: Uuid,
    pub signer_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub signature_value: String,
    pub signer_public_key: String,
    pub signed_at: DateTimeWithTimeZone,
    pub document_hash_at_signing: String,
    #[sea_orm(unique)]
    pub blockchain_signature_hash: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::documents::Entity",
        from = "Column::DocumentId",
        to = "super::documents::Column::Id",
        on_delete = "Cascade"
    )]
    Documents,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SignerId",
        to = "super::users::Column::Id",
        on_delete = "Restrict"
    )]
    Users,
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
