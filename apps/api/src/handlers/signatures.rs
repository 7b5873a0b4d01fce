use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use application::signatures::{
    dtos::{CreateSignatureRequest, SignatureQuery},
    use_cases::{
        CreateSignatureUseCase, DeleteSignatureUseCase, GetSignatureUseCase, ListSignaturesUseCase,
        UpdateSignatureUseCase,
    },
};
use infrastructure::repositories::Repositories;
use uuid::Uuid;

use crate::extractors::AuthUser;
use crate::handlers::error_handler::HttpAppError;

#[get("/digital-signatures")]
pub async fn list_signatures(
    _auth: AuthUser,
    repos: web::Data<Repositories>,
    query: web::Query<SignatureQuery>,
) -> Result<impl Responder, HttpAppError> {
    let signatures = ListSignaturesUseCase::execute(&repos, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(signatures))
}

/// The signer is always the caller; the submitted hash must match the
/// document's recorded hash.
#[post("/digital-signatures")]
pub async fn create_signature(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    req: web::Json<CreateSignatureRequest>,
) -> Result<impl Responder, HttpAppError> {
    let signature = CreateSignatureUseCase::execute(&repos, &auth, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(signature))
}

#[get("/digital-signatures/{id}")]
pub async fn get_signature(
    _auth: AuthUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HttpAppError> {
    let signature = GetSignatureUseCase::execute(&repos, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(signature))
}

/// The body stays raw until the staff check has passed, so a refused caller
/// gets 403 whatever it sent.
#[put("/digital-signatures/{id}")]
pub async fn update_signature(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<impl Responder, HttpAppError> {
    let signature = UpdateSignatureUseCase::execute(&repos, &auth, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(signature))
}

#[delete("/digital-signatures/{id}")]
pub async fn delete_signature(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HttpAppError> {
    DeleteSignatureUseCase::execute(&repos, &auth, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
