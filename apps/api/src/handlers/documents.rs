use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use application::documents::{
    dtos::{CreateDocumentRequest, DocumentQuery, UpdateDocumentRequest},
    use_cases::{
        CreateDocumentUseCase, DeleteDocumentUseCase, GetDocumentUseCase, ListDocumentsUseCase,
        UpdateDocumentUseCase,
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

const FILE_FIELD: &str = "document_file";

#[get("/documents")]
pub async fn list_documents(
    _auth: AuthUser,
    repos: web::Data<Repositories>,
    query: web::Query<DocumentQuery>,
) -> Result<impl Responder, HttpAppError> {
    let documents = ListDocumentsUseCase::execute(&repos, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[post("/documents")]
pub async fn create_document(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    storage: web::Data<LocalFileStorage>,
    pin: web::Data<PinStep>,
    config: web::Data<Config>,
    payload: Multipart,
) -> Result<impl Responder, HttpAppError> {
    let mut form = MultipartForm::collect(payload, config.max_upload_bytes).await?;
    let req: CreateDocumentRequest = form.parse()?;
    let file = form.take_file(FILE_FIELD);

    let document = CreateDocumentUseCase::execute(&repos, &storage, &pin, &auth, req, file).await?;
    Ok(HttpResponse::Created().json(document))
}

#[get("/documents/{id}")]
pub async fn get_document(
    _auth: AuthUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HttpAppError> {
    let document = GetDocumentUseCase::execute(&repos, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(document))
}

#[put("/documents/{id}")]
pub async fn update_document(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<impl Responder, HttpAppError> {
    let mut form = MultipartForm::collect(payload, config.max_upload_bytes).await?;
    let req: UpdateDocumentRequest = form.parse()?;
    let file = form.take_file(FILE_FIELD);

    let document = UpdateDocumentUseCase::execute(&repos, &auth, path.into_inner(), req, file).await?;
    Ok(HttpResponse::Ok().json(document))
}

#[delete("/documents/{id}")]
pub async fn delete_document(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HttpAppError> {
    DeleteDocumentUseCase::execute(&repos, &auth, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
