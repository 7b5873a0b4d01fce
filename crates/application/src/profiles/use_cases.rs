use crate::access::{ensure_can_modify, Actor};
use crate::auth::dtos::UserDetails;
use crate::auth::use_cases::{hash_password, user_details};
use crate::auth::validate_phone_number;
use crate::profiles::dtos::*;
use crate::uploads::FileUpload;
use crate::{AppError, AppResult};
use tracing::{info, instrument};
use validator::Validate;

#[cfg(test)]
#[path = "use_cases_test.rs"]
mod tests;

use chrono::Utc;
use infrastructure::repositories::Repositories;
use infrastructure::storage::{LocalFileStorage, SCANNED_ID_BACK_DIR, SCANNED_ID_FRONT_DIR};
use terra_core::entities::{user_profiles, users};
use uuid::Uuid;

const PROFILE_NOT_FOUND: &str = "User profile not found.";

/// Writes an optional upload and returns its relative path.
pub(crate) async fn store_upload(
    storage: &LocalFileStorage,
    dir: &str,
    upload: Option<&FileUpload>,
) -> AppResult<Option<String>> {
    match upload {
        Some(file) => Ok(Some(storage.save(dir, &file.file_name, &file.content).await?)),
        None => Ok(None),
    }
}

async fn discard_all(storage: &LocalFileStorage, paths: &[Option<String>]) {
    for path in paths.iter().flatten() {
        storage.discard(path).await;
    }
}

// ============ Register User Use Case ============

pub struct RegisterUserUseCase;

impl RegisterUserUseCase {
    /// Creates the identity and its profile in one atomic write.
    #[instrument(skip(repos, storage, req, scans), fields(username = %req.username))]
    pub async fn execute(
        repos: &Repositories,
        storage: &LocalFileStorage,
        req: RegisterUserRequest,
        scans: ScannedIds,
    ) -> AppResult<ProfileResponse> {
        req.validate()?;

        if repos.users.find_by_username(&req.username).await?.is_some() {
            return Err(AppError::field(
                "username",
                "A user with that username already exists.",
            ));
        }

        let password_hash = hash_password(&req.password)?;
        let user = users::Model {
            id: Uuid::new_v4(),
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            password_hash,
            is_staff: false,
            is_active: true,
            date_joined: Utc::now().into(),
        };

        let front = store_upload(storage, SCANNED_ID_FRONT_DIR, scans.front.as_ref()).await?;
        let back = store_upload(storage, SCANNED_ID_BACK_DIR, scans.back.as_ref()).await?;

        let profile = user_profiles::Model {
            user_id: user.id,
            date_of_birth: req.date_of_birth,
            nationality: req.nationality,
            residential_address: req.residential_address,
            phone_number: req.phone_number,
            tax_identification_number: req.tax_identification_number,
            id_type: req.id_type,
            id_number: req.id_number,
            id_issuing_authority: req.id_issuing_authority,
            id_issue_date: req.id_issue_date,
            id_expiry_date: req.id_expiry_date,
            scanned_id_front: front.clone(),
            scanned_id_back: back.clone(),
            biometric_hash: req.biometric_hash,
            blockchain_wallet_address: req.blockchain_wallet_address,
        };

        let (user, profile) = match repos.users.register(user, profile).await {
            Ok(created) => created,
            Err(e) => {
                discard_all(storage, &[front, back]).await;
                return Err(e.into());
            }
        };

        info!(user_id = %user.id, "User registered");
        Ok(ProfileResponse::new(profile, Some(UserDetails::from(user))))
    }
}

// ============ List / Get Profile Use Cases ============

pub struct ListProfilesUseCase;

impl ListProfilesUseCase {
    #[instrument(skip(repos))]
    pub async fn execute(repos: &Repositories) -> AppResult<Vec<ProfileResponse>> {
        let profiles = repos.profiles.list().await?;
        let mut out = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let details = user_details(repos, profile.user_id).await?;
            out.push(ProfileResponse::new(profile, details));
        }
        Ok(out)
    }
}

pub struct GetProfileUseCase;

impl GetProfileUseCase {
    #[instrument(skip(repos))]
    pub async fn execute(repos: &Repositories, user_id: Uuid) -> AppResult<ProfileResponse> {
        let profile = repos
            .profiles
            .find(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(PROFILE_NOT_FOUND.to_string()))?;
        let details = user_details(repos, user_id).await?;
        Ok(ProfileResponse::new(profile, details))
    }
}

// ============ Update Profile Use Case ============

pub struct UpdateProfileUseCase;

impl UpdateProfileUseCase {
    #[instrument(skip(repos, storage, actor, req, scans), fields(actor = %actor.user_id))]
    pub async fn execute(
        repos: &Repositories,
        storage: &LocalFileStorage,
        actor: &Actor,
        user_id: Uuid,
        req: UpdateProfileRequest,
        scans: ScannedIds,
    ) -> AppResult<ProfileResponse> {
        let mut profile = repos
            .profiles
            .find(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(PROFILE_NOT_FOUND.to_string()))?;

        ensure_can_modify(
            actor,
            &[profile.user_id],
            "You do not have permission to modify this profile.",
        )?;

        if matches!(req.user, Some(u) if u != profile.user_id) {
            return Err(AppError::field(
                "user",
                "Cannot change the user of an existing profile.",
            ));
        }
        req.validate()?;
        if let Some(phone) = req.phone_number.as_deref() {
            validate_phone_number(phone).map_err(|e| {
                AppError::field(
                    "phone_number",
                    e.message.map(|m| m.to_string()).unwrap_or_default(),
                )
            })?;
        }

        if let Some(v) = req.date_of_birth {
            profile.date_of_birth = Some(v);
        }
        if let Some(v) = req.nationality {
            profile.nationality = v;
        }
        if let Some(v) = req.residential_address {
            profile.residential_address = v;
        }
        if let Some(v) = req.phone_number {
            profile.phone_number = v;
        }
        if let Some(v) = req.tax_identification_number {
            profile.tax_identification_number = Some(v);
        }
        if let Some(v) = req.id_type {
            profile.id_type = v;
        }
        if let Some(v) = req.id_number {
            profile.id_number = v;
        }
        if let Some(v) = req.id_issuing_authority {
            profile.id_issuing_authority = v;
        }
        if let Some(v) = req.id_issue_date {
            profile.id_issue_date = v;
        }
        if let Some(v) = req.id_expiry_date {
            profile.id_expiry_date = Some(v);
        }
        if let Some(v) = req.biometric_hash {
            profile.biometric_hash = Some(v);
        }
        if let Some(v) = req.blockchain_wallet_address {
            profile.blockchain_wallet_address = Some(v);
        }

        let front = store_upload(storage, SCANNED_ID_FRONT_DIR, scans.front.as_ref()).await?;
        let back = store_upload(storage, SCANNED_ID_BACK_DIR, scans.back.as_ref()).await?;
        let mut replaced = Vec::new();
        if let Some(path) = front.clone() {
            replaced.push(profile.scanned_id_front.replace(path));
        }
        if let Some(path) = back.clone() {
            replaced.push(profile.scanned_id_back.replace(path));
        }

        let profile = match repos.profiles.update(profile).await {
            Ok(updated) => updated,
            Err(e) => {
                discard_all(storage, &[front, back]).await;
                return Err(e.into());
            }
        };
        discard_all(storage, &replaced).await;

        info!(user_id = %profile.user_id, "Profile updated");
        let details = user_details(repos, profile.user_id).await?;
        Ok(ProfileResponse::new(profile, details))
    }
}

// ============ Delete Profile Use Case ============

pub struct DeleteProfileUseCase;

impl DeleteProfileUseCase {
    /// Removes the profile only. The identity stays, since protected records
    /// may still reference it.
    #[instrument(skip(repos, actor), fields(actor = %actor.user_id))]
    pub async fn execute(repos: &Repositories, actor: &Actor, user_id: Uuid) -> AppResult<()> {
        let profile = repos
            .profiles
            .find(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(PROFILE_NOT_FOUND.to_string()))?;

        ensure_can_modify(
            actor,
            &[profile.user_id],
            "You do not have permission to delete this profile.",
        )?;

        repos.profiles.delete(user_id).await?;
        info!(user_id = %user_id, "Profile deleted");
        Ok(())
    }
}
