use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::task::{Context, Poll};

use crate::config::Config;
use crate::handlers::error_handler::HttpAppError;
use application::auth::dtos::Claims;
use application::auth::use_cases::decode_token;
use application::AppError;

/// Decodes an optional bearer token into request extensions. Requests without
/// one pass through untouched; handlers that need a caller reject them via
/// the `AuthUser` extractor.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim().to_string())
}

fn bearer_claims(req: &ServiceRequest) -> Result<Option<Claims>, AppError> {
    let Some(token) = bearer_token(req) else {
        return Ok(None);
    };
    let config = req
        .app_data::<web::Data<Config>>()
        .ok_or_else(|| AppError::Configuration("Config is not registered as app data".to_string()))?;

    decode_token(&config.jwt_secret, &token).map(Some).map_err(|e| {
        tracing::debug!(error = %e, path = %req.path(), "Rejected bearer token");
        AppError::Authentication("Invalid or expired token".to_string())
    })
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match bearer_claims(&req) {
            Ok(Some(claims)) => {
                req.extensions_mut().insert(claims);
            }
            Ok(None) => {}
            Err(e) => return Box::pin(async move { Err(HttpAppError(e).into()) }),
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}
