use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use terra_core::entities::properties;
use terra_core::entities::sea_orm_active_enums::PropertyType;
use uuid::Uuid;
use validator::Validate;

use crate::auth::dtos::UserDetails;
use crate::{AppError, AppResult};

const COORDINATE_SCALE: u32 = 6;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub full_address: String,
    pub property_type: PropertyType,
    #[validate(length(min = 1, max = 100, message = "Identifier must be between 1-100 characters"))]
    pub unique_property_identifier: String,
    #[serde(default)]
    pub description: Option<String>,
    pub current_owner: Uuid,
    #[serde(default)]
    pub gps_latitude: Option<Decimal>,
    #[serde(default)]
    pub gps_longitude: Option<Decimal>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Survey plan hash must be at most 255 characters"))]
    pub survey_plan_hash: Option<String>,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePropertyRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub full_address: Option<String>,
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Identifier must be between 1-100 characters"))]
    pub unique_property_identifier: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub current_owner: Option<Uuid>,
    #[serde(default)]
    pub gps_latitude: Option<Decimal>,
    #[serde(default)]
    pub gps_longitude: Option<Decimal>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Survey plan hash must be at most 255 characters"))]
    pub survey_plan_hash: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PropertyResponse {
    pub id: Uuid,
    pub full_address: String,
    pub property_type: PropertyType,
    pub unique_property_identifier: String,
    pub description: Option<String>,
    pub current_owner: Uuid,
    pub current_owner_details: Option<UserDetails>,
    pub proof_of_ownership_document: Option<String>,
    pub ownership_document_cid: Option<String>,
    pub gps_latitude: Option<Decimal>,
    pub gps_longitude: Option<Decimal>,
    pub survey_plan_hash: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl PropertyResponse {
    pub fn new(property: properties::Model, current_owner_details: Option<UserDetails>) -> Self {
        Self {
            id: property.id,
            full_address: property.full_address,
            property_type: property.property_type,
            unique_property_identifier: property.unique_property_identifier,
            description: property.description,
            current_owner: property.current_owner_id,
            current_owner_details,
            proof_of_ownership_document: property.proof_of_ownership_document,
            ownership_document_cid: property.ownership_document_cid,
            gps_latitude: property.gps_latitude,
            gps_longitude: property.gps_longitude,
            survey_plan_hash: property.survey_plan_hash,
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}

fn check_coordinate(field: &str, value: Option<Decimal>, bound: i64) -> AppResult<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let bound = Decimal::from(bound);
    if value < -bound || value > bound {
        return Err(AppError::field(
            field,
            format!("Ensure this value is between -{} and {}.", bound, bound),
        ));
    }
    if value.normalize().scale() > COORDINATE_SCALE {
        return Err(AppError::field(
            field,
            format!(
                "Ensure that there are no more than {} decimal places.",
                COORDINATE_SCALE
            ),
        ));
    }
    Ok(())
}

/// Latitude must lie in [-90, 90] and longitude in [-180, 180], each with at
/// most six decimal places.
pub fn validate_coordinates(latitude: Option<Decimal>, longitude: Option<Decimal>) -> AppResult<()> {
    check_coordinate("gps_latitude", latitude, 90)?;
    check_coordinate("gps_longitude", longitude, 180)
}
