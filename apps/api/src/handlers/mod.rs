pub mod auth;
pub mod documents;
pub mod error_handler;
pub mod health;
pub mod profiles;
pub mod properties;
pub mod signatures;
pub mod transactions;
