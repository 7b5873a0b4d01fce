pub mod dtos;
pub mod use_cases;
mod validation;

pub use validation::{validate_phone_number, validate_username, PHONE_REGEX, USERNAME_REGEX};
