use crate::access::{ensure_can_modify, Actor};
use crate::auth::use_cases::user_details;
use crate::ownership;
use crate::transactions::dtos::*;
use crate::{AppError, AppResult};
use tracing::{info, instrument};
use validator::Validate;

#[cfg(test)]
#[path = "use_cases_test.rs"]
mod tests;

use chrono::Utc;
use infrastructure::repositories::{Repositories, TransactionFilter};
use terra_core::entities::{properties, transactions, users};
use uuid::Uuid;

const TRANSACTION_NOT_FOUND: &str = "Transaction not found.";

fn invalid_pk(field: &str, id: Uuid) -> AppError {
    AppError::field(field, format!("Invalid pk \"{}\" - object does not exist.", id))
}

async fn load_property(repos: &Repositories, id: Uuid) -> AppResult<properties::Model> {
    repos
        .properties
        .find(id)
        .await?
        .ok_or_else(|| invalid_pk("property", id))
}

async fn load_user(repos: &Repositories, field: &str, id: Uuid) -> AppResult<users::Model> {
    repos
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| invalid_pk(field, id))
}

async fn respond(repos: &Repositories, tx: transactions::Model) -> AppResult<TransactionResponse> {
    let seller = user_details(repos, tx.seller_id).await?;
    let buyer = user_details(repos, tx.buyer_id).await?;
    Ok(TransactionResponse::new(tx, seller, buyer))
}

// ============ Create Transaction Use Case ============

pub struct CreateTransactionUseCase;

impl CreateTransactionUseCase {
    #[instrument(skip_all, fields(actor = %actor.user_id, property_id = %req.property))]
    pub async fn execute(
        repos: &Repositories,
        actor: &Actor,
        req: CreateTransactionRequest,
    ) -> AppResult<TransactionResponse> {
        req.validate()?;
        validate_price(req.transaction_price)?;

        let property = load_property(repos, req.property).await?;
        let seller = load_user(repos, "seller", req.seller).await?;
        load_user(repos, "buyer", req.buyer).await?;

        ownership::validate(repos, &property, &seller).await?;

        let now = Utc::now();
        let tx = transactions::Model {
            id: Uuid::new_v4(),
            property_id: property.id,
            seller_id: seller.id,
            buyer_id: req.buyer,
            transaction_price: req.transaction_price,
            transaction_date: req.transaction_date.unwrap_or_else(|| now.date_naive()),
            status: req.status.unwrap_or_default(),
            blockchain_transaction_hash: req.blockchain_transaction_hash,
            blockchain_block_number: req.blockchain_block_number,
            blockchain_timestamp: req.blockchain_timestamp,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let tx = repos.transactions.insert(tx).await?;
        info!(transaction_id = %tx.id, "Transaction created");
        respond(repos, tx).await
    }
}

// ============ List / Get Transaction Use Cases ============

pub struct ListTransactionsUseCase;

impl ListTransactionsUseCase {
    #[instrument(skip(repos))]
    pub async fn execute(
        repos: &Repositories,
        query: TransactionQuery,
    ) -> AppResult<Vec<TransactionResponse>> {
        let txs = repos
            .transactions
            .list(TransactionFilter {
                involved_user_id: query.involved_user_id,
            })
            .await?;
        let mut out = Vec::with_capacity(txs.len());
        for tx in txs {
            out.push(respond(repos, tx).await?);
        }
        Ok(out)
    }
}

pub struct GetTransactionUseCase;

impl GetTransactionUseCase {
    #[instrument(skip(repos))]
    pub async fn execute(repos: &Repositories, id: Uuid) -> AppResult<TransactionResponse> {
        let tx = repos
            .transactions
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(TRANSACTION_NOT_FOUND.to_string()))?;
        respond(repos, tx).await
    }
}

// ============ Update Transaction Use Case ============

pub struct UpdateTransactionUseCase;

impl UpdateTransactionUseCase {
    /// Status moves are caller-driven; the only rule enforced is that the
    /// merged seller still owns the merged property.
    #[instrument(skip(repos, actor, req), fields(actor = %actor.user_id))]
    pub async fn execute(
        repos: &Repositories,
        actor: &Actor,
        id: Uuid,
        req: UpdateTransactionRequest,
    ) -> AppResult<TransactionResponse> {
        let mut tx = repos
            .transactions
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(TRANSACTION_NOT_FOUND.to_string()))?;

        ensure_can_modify(
            actor,
            &[tx.seller_id, tx.buyer_id],
            "You do not have permission to modify this transaction.",
        )?;

        req.validate()?;
        if let Some(price) = req.transaction_price {
            validate_price(price)?;
            tx.transaction_price = price;
        }

        let property = load_property(repos, req.property.unwrap_or(tx.property_id)).await?;
        let seller = load_user(repos, "seller", req.seller.unwrap_or(tx.seller_id)).await?;
        if let Some(buyer) = req.buyer {
            load_user(repos, "buyer", buyer).await?;
            tx.buyer_id = buyer;
        }
        ownership::validate(repos, &property, &seller).await?;
        tx.property_id = property.id;
        tx.seller_id = seller.id;

        if let Some(v) = req.transaction_date {
            tx.transaction_date = v;
        }
        if let Some(v) = req.status {
            tx.status = v;
        }
        if let Some(v) = req.blockchain_transaction_hash {
            tx.blockchain_transaction_hash = Some(v);
        }
        if let Some(v) = req.blockchain_block_number {
            tx.blockchain_block_number = Some(v);
        }
        if let Some(v) = req.blockchain_timestamp {
            tx.blockchain_timestamp = Some(v);
        }
        tx.updated_at = Utc::now().into();

        let tx = repos.transactions.update(tx).await?;
        info!(transaction_id = %tx.id, status = ?tx.status, "Transaction updated");
        respond(repos, tx).await
    }
}

// ============ Delete Transaction Use Case ============

pub struct DeleteTransactionUseCase;

impl DeleteTransactionUseCase {
    #[instrument(skip(repos, actor), fields(actor = %actor.user_id))]
    pub async fn execute(repos: &Repositories, actor: &Actor, id: Uuid) -> AppResult<()> {
        let tx = repos
            .transactions
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(TRANSACTION_NOT_FOUND.to_string()))?;

        ensure_can_modify(
            actor,
            &[tx.seller_id, tx.buyer_id],
            "You do not have permission to delete this transaction.",
        )?;

        repos.transactions.delete(id).await?;
        info!(transaction_id = %id, "Transaction deleted");
        Ok(())
    }
}
