use crate::auth::dtos::*;
use crate::{AppError, AppResult};
use tracing::{info, instrument, warn};
use validator::Validate;

#[cfg(test)]
#[path = "use_cases_test.rs"]
mod tests;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use infrastructure::repositories::Repositories;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

// ============ Config ============

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: i64,
}

// ============ Passwords ============

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// ============ Tokens ============

pub fn issue_token(config: &AuthConfig, user_id: Uuid, is_staff: bool) -> AppResult<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        is_staff,
        iat: now,
        exp: now + config.jwt_expiration,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?)
}

pub fn decode_token(secret: &str, token: &str) -> AppResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Resolves the nested `*_details` block for a user reference.
pub async fn user_details(repos: &Repositories, user_id: Uuid) -> AppResult<Option<UserDetails>> {
    Ok(repos.users.find_by_id(user_id).await?.map(UserDetails::from))
}

// ============ Login Use Case ============

pub struct LoginUseCase;

impl LoginUseCase {
    #[instrument(skip(repos, config, req), fields(username = %req.username))]
    pub async fn execute(
        repos: &Repositories,
        config: &AuthConfig,
        req: LoginRequest,
    ) -> AppResult<LoginResponse> {
        if req.username.is_empty() || req.password.is_empty() {
            return Err(AppError::Validation(
                "Please provide both username and password".to_string(),
            ));
        }
        req.validate()?;

        let user = match repos.users.find_by_username(&req.username).await? {
            Some(user) if verify_password(&req.password, &user.password_hash) => user,
            _ => {
                warn!("Invalid login attempt");
                return Err(AppError::Authentication("Invalid credentials".to_string()));
            }
        };

        if !user.is_active {
            warn!(user_id = %user.id, "Login attempt on disabled account");
            return Err(AppError::Authentication(
                "User account is disabled.".to_string(),
            ));
        }

        let token = issue_token(config, user.id, user.is_staff)?;
        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            token,
            user_id: user.id,
            username: user.username,
        })
    }
}
