use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use application::properties::{
    dtos::{CreatePropertyRequest, UpdatePropertyRequest},
    use_cases::{
        CreatePropertyUseCase, DeletePropertyUseCase, GetPropertyUseCase, ListPropertiesUseCase,
        UpdatePropertyUseCase,
    },
};
use application::PinStep;
use infrastructure::repositories::Repositories;
use infrastructure::storage::LocalFileStorage;
use uuid::Uuid;

use crate::config::Config;
use crate::extractors::AuthUser;
use crate::forms::MultipartForm;
use crate::handlers::error_handler::HttpAppError;

const PROOF_FIELD: &str = "proof_of_ownership_document";

#[get("/properties")]
pub async fn list_properties(
    _auth: AuthUser,
    repos: web::Data<Repositories>,
) -> Result<impl Responder, HttpAppError> {
    let properties = ListPropertiesUseCase::execute(&repos).await?;
    Ok(HttpResponse::Ok().json(properties))
}

#[post("/properties")]
pub async fn create_property(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    storage: web::Data<LocalFileStorage>,
    pin: web::Data<PinStep>,
    config: web::Data<Config>,
    payload: Multipart,
) -> Result<impl Responder, HttpAppError> {
    let mut form = MultipartForm::collect(payload, config.max_upload_bytes).await?;
    let req: CreatePropertyRequest = form.parse()?;
    let proof = form.take_file(PROOF_FIELD);

    let property = CreatePropertyUseCase::execute(&repos, &storage, &pin, &auth, req, proof).await?;
    Ok(HttpResponse::Created().json(property))
}

#[get("/properties/{id}")]
pub async fn get_property(
    _auth: AuthUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HttpAppError> {
    let property = GetPropertyUseCase::execute(&repos, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(property))
}

#[put("/properties/{id}")]
pub async fn update_property(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    storage: web::Data<LocalFileStorage>,
    pin: web::Data<PinStep>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<impl Responder, HttpAppError> {
    let mut form = MultipartForm::collect(payload, config.max_upload_bytes).await?;
    let req: UpdatePropertyRequest = form.parse()?;
    let proof = form.take_file(PROOF_FIELD);

    let property =
        UpdatePropertyUseCase::execute(&repos, &storage, &pin, &auth, path.into_inner(), req, proof)
            .await?;
    Ok(HttpResponse::Ok().json(property))
}

#[delete("/properties/{id}")]
pub async fn delete_property(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HttpAppError> {
    DeletePropertyUseCase::execute(&repos, &auth, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
