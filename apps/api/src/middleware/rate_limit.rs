use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use application::auth::dtos::Claims;
use application::AppError;
use futures::future::LocalBoxFuture;
use governor::{clock::DefaultClock, state::keyed::DashMapStateStore, Quota, RateLimiter};
use std::fmt;
use std::future::{ready, Ready};
use std::num::NonZeroU32;
use std::rc::Rc;
use std::task::{Context, Poll};
use tracing::warn;

use crate::handlers::error_handler::HttpAppError;

/// Whose budget a request is charged against. Authenticated callers share
/// one budget across addresses; everyone else is counted per address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallerKey {
    User(String),
    Address(String),
}

impl CallerKey {
    fn of(req: &ServiceRequest) -> Self {
        if let Some(claims) = req.extensions().get::<Claims>() {
            return CallerKey::User(claims.sub.clone());
        }
        let addr = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();
        CallerKey::Address(addr)
    }
}

impl fmt::Display for CallerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallerKey::User(id) => write!(f, "user:{}", id),
            CallerKey::Address(addr) => write!(f, "addr:{}", addr),
        }
    }
}

type CallerLimiter = RateLimiter<CallerKey, DashMapStateStore<CallerKey>, DefaultClock>;

/// Per-caller request budget. Must sit inside `AuthMiddleware` so decoded
/// claims are visible.
pub struct CallerRateLimitMiddleware {
    limiter: Rc<CallerLimiter>,
}

impl CallerRateLimitMiddleware {
    pub fn new(requests_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: Rc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CallerRateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CallerRateLimitService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CallerRateLimitService {
            service,
            limiter: Rc::clone(&self.limiter),
        }))
    }
}

pub struct CallerRateLimitService<S> {
    service: S,
    limiter: Rc<CallerLimiter>,
}

impl<S, B> Service<ServiceRequest> for CallerRateLimitService<S>
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
        let key = CallerKey::of(&req);

        match self.limiter.check_key(&key) {
            Ok(()) => Box::pin(self.service.call(req)),
            Err(_) => {
                warn!(caller = %key, path = %req.path(), "Request budget exhausted");
                let err = AppError::RateLimitExceeded(
                    "Rate limit exceeded. Please try again later.".to_string(),
                );
                Box::pin(ready(Err(HttpAppError(err).into())))
            }
        }
    }
}
