use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Transactions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Transactions::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Transactions::SellerId).uuid().not_null())
                    .col(ColumnDef::new(Transactions::BuyerId).uuid().not_null())
                    .col(ColumnDef::new(Transactions::TransactionPrice).decimal_len(15, 2).not_null())
                    .col(ColumnDef::new(Transactions::TransactionDate).date().not_null())
                    .col(ColumnDef::new(Transactions::Status).string_len(50).not_null().default("pending"))
                    .col(ColumnDef::new(Transactions::BlockchainTransactionHash).string_len(255).unique_key())
                    .col(ColumnDef::new(Transactions::BlockchainBlockNumber).big_integer())
                    .col(ColumnDef::new(Transactions::BlockchainTimestamp).timestamp_with_time_zone())
                    .col(ColumnDef::new(Transactions::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                    .col(ColumnDef::new(Transactions::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_property_id")
                            .from(Transactions::Table, Transactions::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_seller_id")
                            .from(Transactions::Table, Transactions::SellerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_buyer_id")
                            .from(Transactions::Table, Transactions::BuyerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_property_id")
                    .table(Transactions::Table)
                    .col(Transactions::PropertyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    PropertyId,
    SellerId,
    BuyerId,
    TransactionPrice,
    TransactionDate,
    Status,
    BlockchainTransactionHash,
    BlockchainBlockNumber,
    BlockchainTimestamp,
    CreatedAt,
    UpdatedAt,
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
