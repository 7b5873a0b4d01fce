use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use application::AppError;
use serde_json::{json, Map, Value};
use std::fmt;

/// Wrapper around AppError to implement ResponseError (which is defined in actix-web)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl fmt::Display for HttpAppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

/// Client-facing message: the variant payload without the Display prefix.
fn detail(err: &AppError) -> String {
    match err {
        AppError::Authentication(m)
        | AppError::Authorization(m)
        | AppError::Validation(m)
        | AppError::NotFound(m)
        | AppError::Conflict(m)
        | AppError::RateLimitExceeded(m) => m.clone(),
        AppError::ExternalService(_) => "An upstream service failed.".to_string(),
        other if other.status_code() == 404 => "Not found.".to_string(),
        _ => "A server error occurred.".to_string(),
    }
}

impl ResponseError for HttpAppError {
    fn status_code(&self) -> StatusCode {
        let code = self.0.status_code();
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_code = self.0.error_code();

        // Log 5xx errors with full details
        if status_code.is_server_error() {
            tracing::error!(error_code = error_code, "Server error: {:?}", self.0);
        } else if status_code == StatusCode::UNAUTHORIZED || status_code == StatusCode::FORBIDDEN {
            tracing::warn!(error_code = error_code, error_message = %self.0, "Auth error");
        }

        let mut body = Map::new();
        match &self.0 {
            AppError::InvalidField(fields) => {
                for (field, messages) in fields {
                    body.insert(field.clone(), json!(messages));
                }
            }
            other => {
                body.insert("detail".to_string(), Value::String(detail(other)));
            }
        }
        body.insert("error_code".to_string(), Value::String(error_code.to_string()));
        if let Some(retry_after) = self.0.retry_after_seconds() {
            body.insert("retry_after_seconds".to_string(), json!(retry_after));
        }

        HttpResponse::build(status_code).json(Value::Object(body))
    }
}
