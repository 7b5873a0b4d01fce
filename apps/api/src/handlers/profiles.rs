use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use application::profiles::{
    dtos::{RegisterUserRequest, ScannedIds, UpdateProfileRequest},
    use_cases::{
        DeleteProfileUseCase, GetProfileUseCase, ListProfilesUseCase, RegisterUserUseCase,
        UpdateProfileUseCase,
    },
};
use infrastructure::repositories::Repositories;
use infrastructure::storage::LocalFileStorage;
use uuid::Uuid;

use crate::config::Config;
use crate::extractors::AuthUser;
use crate::forms::MultipartForm;
use crate::handlers::error_handler::HttpAppError;

fn scanned_ids(form: &mut MultipartForm) -> ScannedIds {
    ScannedIds {
        front: form.take_file("scanned_id_front"),
        back: form.take_file("scanned_id_back"),
    }
}

/// Public sign-up: creates the identity and its profile together.
#[post("/user-profiles")]
pub async fn register(
    repos: web::Data<Repositories>,
    storage: web::Data<LocalFileStorage>,
    config: web::Data<Config>,
    payload: Multipart,
) -> Result<impl Responder, HttpAppError> {
    let mut form = MultipartForm::collect(payload, config.max_upload_bytes).await?;
    let req: RegisterUserRequest = form.parse()?;
    let scans = scanned_ids(&mut form);

    let profile = RegisterUserUseCase::execute(&repos, &storage, req, scans).await?;
    Ok(HttpResponse::Created().json(profile))
}

#[get("/user-profiles")]
pub async fn list_profiles(
    _auth: AuthUser,
    repos: web::Data<Repositories>,
) -> Result<impl Responder, HttpAppError> {
    let profiles = ListProfilesUseCase::execute(&repos).await?;
    Ok(HttpResponse::Ok().json(profiles))
}

#[get("/user-profiles/{user_id}")]
pub async fn get_profile(
    _auth: AuthUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HttpAppError> {
    let profile = GetProfileUseCase::execute(&repos, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/user-profiles/{user_id}")]
pub async fn update_profile(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    storage: web::Data<LocalFileStorage>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<impl Responder, HttpAppError> {
    let mut form = MultipartForm::collect(payload, config.max_upload_bytes).await?;
    let req: UpdateProfileRequest = form.parse()?;
    let scans = scanned_ids(&mut form);

    let profile =
        UpdateProfileUseCase::execute(&repos, &storage, &auth, path.into_inner(), req, scans).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[delete("/user-profiles/{user_id}")]
pub async fn delete_profile(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HttpAppError> {
    DeleteProfileUseCase::execute(&repos, &auth, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
