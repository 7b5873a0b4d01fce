use actix_web::{post, web, HttpResponse, Responder};
use application::auth::{dtos::LoginRequest, use_cases::LoginUseCase};
use infrastructure::repositories::Repositories;

use crate::config::Config;
use crate::handlers::error_handler::HttpAppError;

#[post("/auth/login")]
pub async fn login(
    repos: web::Data<Repositories>,
    config: web::Data<Config>,
    req: web::Json<LoginRequest>,
) -> Result<impl Responder, HttpAppError> {
    let response = LoginUseCase::execute(&repos, &config.auth_config(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
