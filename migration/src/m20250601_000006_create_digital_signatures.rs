use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DigitalSignatures::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DigitalSignatures::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(DigitalSignatures::DocumentId).uuid().not_null())
                    .col(ColumnDef::new(DigitalSignatures::SignerId).uuid().not_null())
                    .col(ColumnDef::new(DigitalSignatures::SignatureValue).text().not_null())
                    .col(ColumnDef::new(DigitalSignatures::SignerPublicKey).string_len(255).not_null())
                    .col(ColumnDef::new(DigitalSignatures::SignedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                    .col(ColumnDef::new(DigitalSignatures::DocumentHashAtSigning).string_len(255).not_null())
                    .col(ColumnDef::new(DigitalSignatures::BlockchainSignatureHash).string_len(255).unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_digital_signatures_document_id")
                            .from(DigitalSignatures::Table, DigitalSignatures::DocumentId)
                            .to(Documents::Table, Documents::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_digital_signatures_signer_id")
                            .from(DigitalSignatures::Table, DigitalSignatures::SignerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                    )
                    .to_owned(),
            )
            .await?;

        // Authoritative guard against concurrent duplicate submissions.
        manager
            .create_index(
                Index::create()
                    .name("uq_digital_signatures_document_signer_value")
                    .table(DigitalSignatures::Table)
                    .col(DigitalSignatures::DocumentId)
                    .col(DigitalSignatures::SignerId)
                    .col(DigitalSignatures::SignatureValue)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DigitalSignatures::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DigitalSignatures {
    Table,
    Id,
    DocumentId,
    SignerId,
    SignatureValue,
    SignerPublicKey,
    SignedAt,
    DocumentHashAtSigning,
    BlockchainSignatureHash,
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
