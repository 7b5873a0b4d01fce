use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Documents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Documents::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Documents::DocumentType).string_len(100).not_null())
                    .col(ColumnDef::new(Documents::DocumentFile).string_len(255).not_null())
                    .col(ColumnDef::new(Documents::DocumentHash).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(Documents::ContentIdentifier).string_len(255))
                    .col(ColumnDef::new(Documents::UploadedBy).uuid())
                    .col(ColumnDef::new(Documents::UploadDate).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_property_id")
                            .from(Documents::Table, Documents::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_uploaded_by")
                            .from(Documents::Table, Documents::UploadedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_documents_property_id")
                    .table(Documents::Table)
                    .col(Documents::PropertyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Id,
    PropertyId,
    DocumentType,
    DocumentFile,
    DocumentHash,
    ContentIdentifier,
    UploadedBy,
    UploadDate,
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
