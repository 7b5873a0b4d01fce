use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use application::transactions::{
    dtos::{CreateTransactionRequest, TransactionQuery, UpdateTransactionRequest},
    use_cases::{
        CreateTransactionUseCase, DeleteTransactionUseCase, GetTransactionUseCase,
        ListTransactionsUseCase, UpdateTransactionUseCase,
    },
};
use infrastructure::repositories::Repositories;
use uuid::Uuid;

use crate::extractors::AuthUser;
use crate::handlers::error_handler::HttpAppError;

#[get("/transactions")]
pub async fn list_transactions(
    _auth: AuthUser,
    repos: web::Data<Repositories>,
    query: web::Query<TransactionQuery>,
) -> Result<impl Responder, HttpAppError> {
    let transactions = ListTransactionsUseCase::execute(&repos, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(transactions))
}

#[post("/transactions")]
pub async fn create_transaction(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    req: web::Json<CreateTransactionRequest>,
) -> Result<impl Responder, HttpAppError> {
    let transaction = CreateTransactionUseCase::execute(&repos, &auth, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(transaction))
}

#[get("/transactions/{id}")]
pub async fn get_transaction(
    _auth: AuthUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HttpAppError> {
    let transaction = GetTransactionUseCase::execute(&repos, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[put("/transactions/{id}")]
pub async fn update_transaction(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateTransactionRequest>,
) -> Result<impl Responder, HttpAppError> {
    let transaction =
        UpdateTransactionUseCase::execute(&repos, &auth, path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[delete("/transactions/{id}")]
pub async fn delete_transaction(
    auth: AuthUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HttpAppError> {
    DeleteTransactionUseCase::execute(&repos, &auth, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
