use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserProfiles::UserId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UserProfiles::DateOfBirth).date())
                    .col(ColumnDef::new(UserProfiles::Nationality).string_len(100).not_null())
                    .col(ColumnDef::new(UserProfiles::ResidentialAddress).text().not_null())
                    .col(ColumnDef::new(UserProfiles::PhoneNumber).string_len(20).not_null().unique_key())
                    .col(ColumnDef::new(UserProfiles::TaxIdentificationNumber).string_len(50).unique_key())
                    .col(ColumnDef::new(UserProfiles::IdType).string_len(50).not_null())
                    .col(ColumnDef::new(UserProfiles::IdNumber).string_len(100).not_null().unique_key())
                    .col(ColumnDef::new(UserProfiles::IdIssuingAuthority).string_len(200).not_null())
                    .col(ColumnDef::new(UserProfiles::IdIssueDate).date().not_null())
                    .col(ColumnDef::new(UserProfiles::IdExpiryDate).date())
                    .col(ColumnDef::new(UserProfiles::ScannedIdFront).string_len(255))
                    .col(ColumnDef::new(UserProfiles::ScannedIdBack).string_len(255))
                    .col(ColumnDef::new(UserProfiles::BiometricHash).string_len(255).unique_key())
                    .col(ColumnDef::new(UserProfiles::BlockchainWalletAddress).string_len(255).unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profiles_user_id")
                            .from(UserProfiles::Table, UserProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    UserId,
    DateOfBirth,
    Nationality,
    ResidentialAddress,
    PhoneNumber,
    TaxIdentificationNumber,
    IdType,
    IdNumber,
    IdIssuingAuthority,
    IdIssueDate,
    IdExpiryDate,
    ScannedIdFront,
    ScannedIdBack,
    BiometricHash,
    BlockchainWalletAddress,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
