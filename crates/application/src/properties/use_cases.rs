use crate::access::{ensure_can_modify, Actor};
use crate::auth::use_cases::user_details;
use crate::pinning::{record_cid, PinStep};
use crate::profiles::use_cases::store_upload;
use crate::properties::dtos::*;
use crate::uploads::FileUpload;
use crate::{AppError, AppResult};
use tracing::{info, instrument};
use validator::Validate;

#[cfg(test)]
#[path = "use_cases_test.rs"]
mod tests;

use chrono::Utc;
use infrastructure::repositories::Repositories;
use infrastructure::storage::{LocalFileStorage, PROOF_OF_OWNERSHIP_DIR};
use terra_core::entities::properties;
use uuid::Uuid;

const PROPERTY_NOT_FOUND: &str = "Property not found.";

async fn ensure_user_exists(repos: &Repositories, field: &str, user_id: Uuid) -> AppResult<()> {
    if repos.users.find_by_id(user_id).await?.is_none() {
        return Err(AppError::field(
            field,
            format!("Invalid pk \"{}\" - object does not exist.", user_id),
        ));
    }
    Ok(())
}

/// Pins the stored proof-of-ownership file and records its CID with a
/// narrow write that does not pin again.
async fn pin_proof(
    repos: &Repositories,
    storage: &LocalFileStorage,
    pin: &PinStep,
    property: properties::Model,
) -> properties::Model {
    let Some(relative) = property.proof_of_ownership_document.as_deref() else {
        return property;
    };
    match pin.pin_stored(storage, relative).await {
        Some(cid) => {
            let id = property.id;
            record_cid(property, repos.properties.set_ownership_document_cid(id, &cid)).await
        }
        None => property,
    }
}

async fn respond(repos: &Repositories, property: properties::Model) -> AppResult<PropertyResponse> {
    let owner = user_details(repos, property.current_owner_id).await?;
    Ok(PropertyResponse::new(property, owner))
}

// ============ Create Property Use Case ============

pub struct CreatePropertyUseCase;

impl CreatePropertyUseCase {
    #[instrument(skip_all, fields(actor = %actor.user_id, upi = %req.unique_property_identifier))]
    pub async fn execute(
        repos: &Repositories,
        storage: &LocalFileStorage,
        pin: &PinStep,
        actor: &Actor,
        req: CreatePropertyRequest,
        proof: Option<FileUpload>,
    ) -> AppResult<PropertyResponse> {
        req.validate()?;
        validate_coordinates(req.gps_latitude, req.gps_longitude)?;
        ensure_user_exists(repos, "current_owner", req.current_owner).await?;

        let proof_path = store_upload(storage, PROOF_OF_OWNERSHIP_DIR, proof.as_ref()).await?;
        let now = Utc::now().into();
        let property = properties::Model {
            id: Uuid::new_v4(),
            full_address: req.full_address,
            property_type: req.property_type,
            unique_property_identifier: req.unique_property_identifier,
            description: req.description,
            current_owner_id: req.current_owner,
            proof_of_ownership_document: proof_path.clone(),
            ownership_document_cid: None,
            gps_latitude: req.gps_latitude,
            gps_longitude: req.gps_longitude,
            survey_plan_hash: req.survey_plan_hash,
            created_at: now,
            updated_at: now,
        };

        let property = match repos.properties.insert(property).await {
            Ok(property) => property,
            Err(e) => {
                if let Some(path) = proof_path {
                    storage.discard(&path).await;
                }
                return Err(e.into());
            }
        };
        info!(property_id = %property.id, "Property created");

        let property = pin_proof(repos, storage, pin, property).await;
        respond(repos, property).await
    }
}

// ============ List / Get Property Use Cases ============

pub struct ListPropertiesUseCase;

impl ListPropertiesUseCase {
    #[instrument(skip(repos))]
    pub async fn execute(repos: &Repositories) -> AppResult<Vec<PropertyResponse>> {
        let properties = repos.properties.list().await?;
        let mut out = Vec::with_capacity(properties.len());
        for property in properties {
            out.push(respond(repos, property).await?);
        }
        Ok(out)
    }
}

pub struct GetPropertyUseCase;

impl GetPropertyUseCase {
    #[instrument(skip(repos))]
    pub async fn execute(repos: &Repositories, id: Uuid) -> AppResult<PropertyResponse> {
        let property = repos
            .properties
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(PROPERTY_NOT_FOUND.to_string()))?;
        respond(repos, property).await
    }
}

// ============ Update Property Use Case ============

pub struct UpdatePropertyUseCase;

impl UpdatePropertyUseCase {
    #[instrument(skip(repos, storage, pin, actor, req, proof), fields(actor = %actor.user_id))]
    pub async fn execute(
        repos: &Repositories,
        storage: &LocalFileStorage,
        pin: &PinStep,
        actor: &Actor,
        id: Uuid,
        req: UpdatePropertyRequest,
        proof: Option<FileUpload>,
    ) -> AppResult<PropertyResponse> {
        let mut property = repos
            .properties
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(PROPERTY_NOT_FOUND.to_string()))?;

        ensure_can_modify(
            actor,
            &[property.current_owner_id],
            "You do not have permission to modify this property.",
        )?;

        req.validate()?;
        validate_coordinates(req.gps_latitude, req.gps_longitude)?;
        if let Some(owner) = req.current_owner {
            ensure_user_exists(repos, "current_owner", owner).await?;
            property.current_owner_id = owner;
        }

        if let Some(v) = req.full_address {
            property.full_address = v;
        }
        if let Some(v) = req.property_type {
            property.property_type = v;
        }
        if let Some(v) = req.unique_property_identifier {
            property.unique_property_identifier = v;
        }
        if let Some(v) = req.description {
            property.description = Some(v);
        }
        if let Some(v) = req.gps_latitude {
            property.gps_latitude = Some(v);
        }
        if let Some(v) = req.gps_longitude {
            property.gps_longitude = Some(v);
        }
        if let Some(v) = req.survey_plan_hash {
            property.survey_plan_hash = Some(v);
        }

        let new_proof = store_upload(storage, PROOF_OF_OWNERSHIP_DIR, proof.as_ref()).await?;
        let replaced = match new_proof.clone() {
            Some(path) => {
                // The old CID described the old file.
                property.ownership_document_cid = None;
                property.proof_of_ownership_document.replace(path)
            }
            None => None,
        };
        property.updated_at = Utc::now().into();

        let property = match repos.properties.update(property).await {
            Ok(property) => property,
            Err(e) => {
                if let Some(path) = new_proof {
                    storage.discard(&path).await;
                }
                return Err(e.into());
            }
        };
        if let Some(old) = replaced {
            storage.discard(&old).await;
        }
        info!(property_id = %property.id, "Property updated");

        let property = if new_proof.is_some() {
            pin_proof(repos, storage, pin, property).await
        } else {
            property
        };
        respond(repos, property).await
    }
}

// ============ Delete Property Use Case ============

pub struct DeletePropertyUseCase;

impl DeletePropertyUseCase {
    /// Documents and their signatures cascade; transactions block the delete.
    #[instrument(skip(repos, actor), fields(actor = %actor.user_id))]
    pub async fn execute(repos: &Repositories, actor: &Actor, id: Uuid) -> AppResult<()> {
        let property = repos
            .properties
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(PROPERTY_NOT_FOUND.to_string()))?;

        ensure_can_modify(
            actor,
            &[property.current_owner_id],
            "You do not have permission to delete this property.",
        )?;

        if repos.transactions.exists_for_property(id).await? {
            return Err(AppError::Conflict(
                "Cannot delete property: it is referenced by other objects (e.g., Transactions)."
                    .to_string(),
            ));
        }

        repos.properties.delete(id).await?;
        info!(property_id = %id, "Property deleted");
        Ok(())
    }
}
