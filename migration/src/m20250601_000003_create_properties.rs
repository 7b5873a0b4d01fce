use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Properties::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Properties::FullAddress).text().not_null())
                    .col(ColumnDef::new(Properties::PropertyType).string_len(50).not_null())
                    .col(ColumnDef::new(Properties::UniquePropertyIdentifier).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(Properties::Description).text())
                    .col(ColumnDef::new(Properties::CurrentOwnerId).uuid().not_null())
                    .col(ColumnDef::new(Properties::ProofOfOwnershipDocument).string_len(255))
                    .col(ColumnDef::new(Properties::OwnershipDocumentCid).string_len(255))
                    .col(ColumnDef::new(Properties::GpsLatitude).decimal_len(9, 6))
                    .col(ColumnDef::new(Properties::GpsLongitude).decimal_len(9, 6))
                    .col(ColumnDef::new(Properties::SurveyPlanHash).string_len(255))
                    .col(ColumnDef::new(Properties::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                    .col(ColumnDef::new(Properties::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_properties_current_owner_id")
                            .from(Properties::Table, Properties::CurrentOwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_current_owner_id")
                    .table(Properties::Table)
                    .col(Properties::CurrentOwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    FullAddress,
    PropertyType,
    UniquePropertyIdentifier,
    Description,
    CurrentOwnerId,
    ProofOfOwnershipDocument,
    OwnershipDocumentCid,
    GpsLatitude,
    GpsLongitude,
    SurveyPlanHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
