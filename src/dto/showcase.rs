use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dto::form::FormData, error::AppResult, media::UploadFile, models::Showcase};

/// Multipart fields shared by video stories and watch-and-buy entries.
#[derive(Debug)]
pub struct ShowcaseInput {
    pub title: Option<String>,
    pub product_name: Option<String>,
    pub price: Option<Decimal>,
    pub product_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub video: Option<UploadFile>,
    pub product_image: Option<UploadFile>,
}

impl ShowcaseInput {
    pub fn from_form(mut form: FormData) -> AppResult<Self> {
        Ok(Self {
            title: form.text("title"),
            product_name: form.text("product_name"),
            price: form.price("price")?,
            product_id: form.uuid("product_id")?,
            is_active: form.parse::<bool>("is_active")?,
            video: form.take_file("video"),
            product_image: form.take_file("product_image"),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShowcaseList {
    pub items: Vec<Showcase>,
}
