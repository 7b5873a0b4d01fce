use infrastructure::repositories::Repositories;
use terra_core::entities::{properties, users};

use crate::{AppError, AppResult};

/// A property may only be sold by its current owner.
pub fn seller_owns(property: &properties::Model, seller: &users::Model) -> bool {
    property.current_owner_id == seller.id
}

/// Runs before any transaction write. Never mutates state.
pub async fn validate(
    repos: &Repositories,
    property: &properties::Model,
    seller: &users::Model,
) -> AppResult<()> {
    if seller_owns(property, seller) {
        return Ok(());
    }

    let owner = repos
        .users
        .find_by_id(property.current_owner_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_else(|| property.current_owner_id.to_string());

    tracing::debug!(
        property_id = %property.id,
        seller_id = %seller.id,
        owner = %owner,
        "Ownership check failed"
    );
    Err(AppError::field(
        "seller",
        format!(
            "Seller ({}) does not own the property ({}). Current owner is {}.",
            seller.username, property.unique_property_identifier, owner
        ),
    ))
}
