use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// Phone number regex: E.164, leading + then up to 15 digits
pub static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").unwrap());

/// Username regex: letters, digits and @.+-_, 1-150 chars
pub static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9@.+_-]{1,150}$").unwrap());

/// Custom validator for phone number
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_phone_number");
        err.message = Some("Phone number must be entered in the format: '+999999999'. Up to 15 digits allowed.".into());
        Err(err)
    }
}

/// Custom validator for username
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_username");
        err.message = Some("Enter a valid username. It may contain letters, digits and @/./+/-/_ only.".into());
        Err(err)
    }
}
