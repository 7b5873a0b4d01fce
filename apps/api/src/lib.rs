pub mod config;
pub mod extractors;
pub mod forms;
pub mod handlers;
pub mod middleware;

use actix_web::web;
use application::AppError;

use handlers::error_handler::HttpAppError;
use handlers::{auth, documents, health, profiles, properties, signatures, transactions};

/// Registers every route plus the extractor configs that turn malformed
/// JSON, query strings and path ids into the standard error body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| HttpAppError(AppError::Validation(err.to_string())).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| HttpAppError(AppError::Validation(err.to_string())).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| HttpAppError(AppError::NotFound("Not found.".to_string())).into()),
    )
    .service(health::health_check)
    .service(auth::login)
    // User profiles
    .service(profiles::register)
    .service(profiles::list_profiles)
    .service(profiles::get_profile)
    .service(profiles::update_profile)
    .service(profiles::delete_profile)
    // Properties
    .service(properties::list_properties)
    .service(properties::create_property)
    .service(properties::get_property)
    .service(properties::update_property)
    .service(properties::delete_property)
    // Documents
    .service(documents::list_documents)
    .service(documents::create_document)
    .service(documents::get_document)
    .service(documents::update_document)
    .service(documents::delete_document)
    // Transactions
    .service(transactions::list_transactions)
    .service(transactions::create_transaction)
    .service(transactions::get_transaction)
    .service(transactions::update_transaction)
    .service(transactions::delete_transaction)
    // Digital signatures
    .service(signatures::list_signatures)
    .service(signatures::create_signature)
    .service(signatures::get_signature)
    .service(signatures::update_signature)
    .service(signatures::delete_signature);
}
