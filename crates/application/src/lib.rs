pub mod access;
pub mod auth;
pub mod documents;
pub mod error;
pub mod integrity;
pub mod ownership;
pub mod pinning;
pub mod profiles;
pub mod properties;
pub mod signatures;
pub mod transactions;
pub mod uploads;

#[cfg(test)]
mod test_support;

pub use access::Actor;
pub use error::{AppError, AppResult, FieldErrors};
pub use pinning::PinStep;
