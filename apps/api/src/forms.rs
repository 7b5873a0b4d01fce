use std::collections::HashMap;

use actix_multipart::Multipart;
use application::uploads::FileUpload;
use application::AppError;
use futures::TryStreamExt;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::handlers::error_handler::HttpAppError;

/// A multipart body split into text fields and file parts.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: Map<String, Value>,
    files: HashMap<String, FileUpload>,
}

impl MultipartForm {
    /// Drains the payload. Every part, file or text, is capped at `max_bytes`.
    pub async fn collect(mut payload: Multipart, max_bytes: usize) -> Result<Self, HttpAppError> {
        let mut form = Self::default();

        while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            let mut data = Vec::new();
            while let Some(chunk) = field.try_next().await.map_err(malformed)? {
                if data.len() + chunk.len() > max_bytes {
                    return Err(AppError::field(
                        name,
                        format!("Ensure this upload is at most {} bytes.", max_bytes),
                    )
                    .into());
                }
                data.extend_from_slice(&chunk);
            }

            match file_name {
                // Browsers send an unnamed empty part for an untouched file input.
                Some(file_name) if file_name.is_empty() && data.is_empty() => {}
                Some(file_name) => {
                    form.files.insert(name, FileUpload::new(file_name, data));
                }
                None => {
                    let value = String::from_utf8(data)
                        .map_err(|_| AppError::field(name.clone(), "Form values must be UTF-8 text."))?;
                    if !value.is_empty() {
                        form.fields.insert(name, Value::String(value));
                    }
                }
            }
        }

        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Option<FileUpload> {
        self.files.remove(name)
    }

    /// Deserializes the text fields into a request DTO. Values arrive as
    /// strings, which every form DTO field type accepts.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| AppError::Validation(format!("Invalid form data: {}", e)))
    }
}

fn malformed(err: actix_multipart::MultipartError) -> HttpAppError {
    AppError::Validation(format!("Malformed multipart body: {}", err)).into()
}
