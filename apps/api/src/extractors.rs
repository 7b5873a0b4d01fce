use actix_web::{FromRequest, HttpMessage};
use application::auth::dtos::Claims;
use application::{Actor, AppError};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::handlers::error_handler::HttpAppError;

/// The authenticated caller. Rejects with 401 when the request carried no
/// valid bearer token.
pub struct AuthUser {
    pub claims: Claims,
    pub actor: Actor,
}

impl FromRequest for AuthUser {
    type Error = HttpAppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let result = claims
            .ok_or_else(|| {
                AppError::Authentication("Authentication credentials were not provided.".to_string())
            })
            .and_then(|claims| {
                let user_id = Uuid::parse_str(&claims.sub)
                    .map_err(|_| AppError::Authentication("Invalid user ID".to_string()))?;
                Ok(AuthUser {
                    actor: Actor::new(user_id, claims.is_staff),
                    claims,
                })
            })
            .map_err(HttpAppError::from);
        ready(result)
    }
}

impl std::ops::Deref for AuthUser {
    type Target = Actor;

    fn deref(&self) -> &Self::Target {
        &self.actor
    }
}
