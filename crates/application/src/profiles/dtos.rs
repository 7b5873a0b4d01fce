use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use terra_core::entities::sea_orm_active_enums::IdType;
use terra_core::entities::user_profiles;
use uuid::Uuid;
use validator::Validate;

use crate::auth::dtos::UserDetails;

// ============ Registration ============

/// Identity and profile fields submitted together when signing up.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(custom(function = "crate::auth::validate_username"))]
    pub username: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8-128 characters"))]
    pub password: String,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150, message = "First name must be at most 150 characters"))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150, message = "Last name must be at most 150 characters"))]
    pub last_name: Option<String>,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(min = 1, max = 100, message = "Nationality must be between 1-100 characters"))]
    pub nationality: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub residential_address: String,
    #[validate(custom(function = "crate::auth::validate_phone_number"))]
    pub phone_number: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "Tax identification number must be at most 50 characters"))]
    pub tax_identification_number: Option<String>,
    pub id_type: IdType,
    #[validate(length(min = 1, max = 100, message = "ID number must be between 1-100 characters"))]
    pub id_number: String,
    #[validate(length(min = 1, max = 200, message = "Issuing authority must be between 1-200 characters"))]
    pub id_issuing_authority: String,
    pub id_issue_date: NaiveDate,
    #[serde(default)]
    pub id_expiry_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Biometric hash must be at most 255 characters"))]
    pub biometric_hash: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Wallet address must be at most 255 characters"))]
    pub blockchain_wallet_address: Option<String>,
}

// ============ Update ============

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// Present only to be rejected when it names a different user.
    #[serde(default)]
    pub user: Option<Uuid>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Nationality must be between 1-100 characters"))]
    pub nationality: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub residential_address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50, message = "Tax identification number must be at most 50 characters"))]
    pub tax_identification_number: Option<String>,
    #[serde(default)]
    pub id_type: Option<IdType>,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "ID number must be between 1-100 characters"))]
    pub id_number: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Issuing authority must be between 1-200 characters"))]
    pub id_issuing_authority: Option<String>,
    #[serde(default)]
    pub id_issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub id_expiry_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Biometric hash must be at most 255 characters"))]
    pub biometric_hash: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Wallet address must be at most 255 characters"))]
    pub blockchain_wallet_address: Option<String>,
}

// ============ Response ============

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: Uuid,
    pub user_details: Option<UserDetails>,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: String,
    pub residential_address: String,
    pub phone_number: String,
    pub tax_identification_number: Option<String>,
    pub id_type: IdType,
    pub id_number: String,
    pub id_issuing_authority: String,
    pub id_issue_date: NaiveDate,
    pub id_expiry_date: Option<NaiveDate>,
    pub scanned_id_front: Option<String>,
    pub scanned_id_back: Option<String>,
    pub biometric_hash: Option<String>,
    pub blockchain_wallet_address: Option<String>,
}

impl ProfileResponse {
    pub fn new(profile: user_profiles::Model, user_details: Option<UserDetails>) -> Self {
        Self {
            user: profile.user_id,
            user_details,
            date_of_birth: profile.date_of_birth,
            nationality: profile.nationality,
            residential_address: profile.residential_address,
            phone_number: profile.phone_number,
            tax_identification_number: profile.tax_identification_number,
            id_type: profile.id_type,
            id_number: profile.id_number,
            id_issuing_authority: profile.id_issuing_authority,
            id_issue_date: profile.id_issue_date,
            id_expiry_date: profile.id_expiry_date,
            scanned_id_front: profile.scanned_id_front,
            scanned_id_back: profile.scanned_id_back,
            biometric_hash: profile.biometric_hash,
            blockchain_wallet_address: profile.blockchain_wallet_address,
        }
    }
}

/// Scanned identity documents attached to a profile form.
#[derive(Debug, Default)]
pub struct ScannedIds {
    pub front: Option<crate::uploads::FileUpload>,
    pub back: Option<crate::uploads::FileUpload>,
}
