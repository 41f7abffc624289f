//! `multipart/form-data` bodies used by the upload endpoints.

use std::{collections::HashMap, str::FromStr};

use axum::extract::Multipart;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    media::UploadFile,
};

/// Text fields and files of one multipart body. Keys are normalised to
/// snake_case so `serviceId` and `service_id` are the same field.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadFile>,
}

impl FormData {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(snake_case) else {
                continue;
            };
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    if bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadFile {
                            file_name,
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(snake_case(name), value.into());
        self
    }

    pub fn with_file(mut self, name: &str, file: UploadFile) -> Self {
        self.files.insert(snake_case(name), file);
        self
    }

    /// Trimmed value; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn require(&self, name: &str) -> AppResult<String> {
        self.text(name)
            .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> AppResult<Option<T>> {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| AppError::BadRequest(format!("{name} is malformed")))
            })
            .transpose()
    }

    pub fn uuid(&self, name: &str) -> AppResult<Option<Uuid>> {
        self.parse::<Uuid>(name)
    }

    pub fn require_uuid(&self, name: &str) -> AppResult<Uuid> {
        self.uuid(name)?
            .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
    }

    pub fn price(&self, name: &str) -> AppResult<Option<Decimal>> {
        self.text(name).map(|raw| parse_price(name, &raw)).transpose()
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadFile> {
        self.files.remove(name)
    }
}

pub fn parse_price(name: &str, raw: &str) -> AppResult<Decimal> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|_| AppError::BadRequest(format!("{name} must be a number")))?;
    if value.is_sign_negative() {
        return Err(AppError::BadRequest(format!("{name} must not be negative")));
    }
    Ok(value)
}

/// A JSON array string, or failing that a comma separated list.
pub fn parse_features(raw: &str) -> Vec<String> {
    let list = serde_json::from_str::<Vec<String>>(raw)
        .unwrap_or_else(|_| raw.split(',').map(str::to_string).collect());
    list.into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
