use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::IdType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub date_of_birth: Option<Date>,
    pub nationality: String,
    #[sea_orm(column_type = "Text")]
    pub residential_address: String,
    #[sea_orm(unique)]
    pub phone_number: String,
    #[sea_orm(unique)]
    pub tax_identification_number: Option<String>,
    pub id_type: IdType,
    #[sea_orm(unique)]
    pub id_number: String,
    pub id_issuing_authority: String,
    pub id_issue_date: Date,
    pub id_expiry_date: Option<Date>,
    pub scanned_id_front: Option<String>,
    pub scanned_id_back: Option<String>,
    #[sea_orm(unique)]
    pub biometric_hash: Option<String>,
    #[sea_orm(unique)]
    pub blockchain_wallet_address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
