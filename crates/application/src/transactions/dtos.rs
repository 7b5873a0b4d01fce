use chrono::{DateTime, FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use terra_core::entities::sea_orm_active_enums::TransactionStatus;
use terra_core::entities::transactions;
use uuid::Uuid;
use validator::Validate;

use crate::auth::dtos::UserDetails;
use crate::{AppError, AppResult};

const PRICE_SCALE: u32 = 2;
const PRICE_INTEGER_DIGITS: u32 = 13;

static PRICE_LIMIT: Lazy<Decimal> = Lazy::new(|| Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)));

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    pub property: Uuid,
    pub seller: Uuid,
    pub buyer: Uuid,
    pub transaction_price: Decimal,
    /// Defaults to today (UTC).
    #[serde(default)]
    pub transaction_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Transaction hash must be at most 255 characters"))]
    pub blockchain_transaction_hash: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Block number must be non-negative"))]
    pub blockchain_block_number: Option<i64>,
    #[serde(default)]
    pub blockchain_timestamp: Option<DateTime<FixedOffset>>,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTransactionRequest {
    #[serde(default)]
    pub property: Option<Uuid>,
    #[serde(default)]
    pub seller: Option<Uuid>,
    #[serde(default)]
    pub buyer: Option<Uuid>,
    #[serde(default)]
    pub transaction_price: Option<Decimal>,
    #[serde(default)]
    pub transaction_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Transaction hash must be at most 255 characters"))]
    pub blockchain_transaction_hash: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Block number must be non-negative"))]
    pub blockchain_block_number: Option<i64>,
    #[serde(default)]
    pub blockchain_timestamp: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TransactionQuery {
    pub involved_user_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub property: Uuid,
    pub seller: Uuid,
    pub seller_details: Option<UserDetails>,
    pub buyer: Uuid,
    pub buyer_details: Option<UserDetails>,
    pub transaction_price: Decimal,
    pub transaction_date: NaiveDate,
    pub status: TransactionStatus,
    pub blockchain_transaction_hash: Option<String>,
    pub blockchain_block_number: Option<i64>,
    pub blockchain_timestamp: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl TransactionResponse {
    pub fn new(
        tx: transactions::Model,
        seller_details: Option<UserDetails>,
        buyer_details: Option<UserDetails>,
    ) -> Self {
        Self {
            id: tx.id,
            property: tx.property_id,
            seller: tx.seller_id,
            seller_details,
            buyer: tx.buyer_id,
            buyer_details,
            transaction_price: tx.transaction_price,
            transaction_date: tx.transaction_date,
            status: tx.status,
            blockchain_transaction_hash: tx.blockchain_transaction_hash,
            blockchain_block_number: tx.blockchain_block_number,
            blockchain_timestamp: tx.blockchain_timestamp,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}

/// Prices fit a NUMERIC(15, 2) column and are never negative.
pub fn validate_price(price: Decimal) -> AppResult<()> {
    let message = if price.is_sign_negative() && !price.is_zero() {
        "Ensure this value is greater than or equal to 0.".to_string()
    } else if price.normalize().scale() > PRICE_SCALE {
        format!("Ensure that there are no more than {} decimal places.", PRICE_SCALE)
    } else if price.trunc() >= *PRICE_LIMIT {
        format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            PRICE_INTEGER_DIGITS
        )
    } else {
        return Ok(());
    };
    Err(AppError::field("transaction_price", message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn price(s: &str) -> AppResult<()> {
        validate_price(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_valid_prices() {
        assert!(price("0").is_ok());
        assert!(price("25000000.00").is_ok());
        assert!(price("9999999999999.99").is_ok());
        assert!(price("12.50").is_ok());
        assert!(price("12.500").is_ok());
    }

    #[test]
    fn test_invalid_prices() {
        assert!(price("-1").is_err());
        assert!(price("10.005").is_err());
        assert!(price("10000000000000").is_err());
    }
}
