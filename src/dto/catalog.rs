use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    dto::form::{FormData, parse_features},
    error::{AppError, AppResult},
    media::UploadFile,
    models::{Category, Product, Service},
};

/// Multipart fields for creating or updating a category.
#[derive(Debug)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub image: Option<UploadFile>,
}

impl CategoryInput {
    pub fn from_form(mut form: FormData) -> AppResult<Self> {
        Ok(Self {
            name: form.text("name"),
            image: form.take_file("image"),
        })
    }
}

#[derive(Debug)]
pub struct ServiceInput {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub image: Option<UploadFile>,
}

impl ServiceInput {
    pub fn from_form(mut form: FormData) -> AppResult<Self> {
        Ok(Self {
            name: form.text("name"),
            category_id: form.uuid("category_id")?,
            description: form.text("description"),
            image: form.take_file("image"),
        })
    }
}

#[derive(Debug)]
pub struct ProductInput {
    pub name: Option<String>,
    pub service_id: Option<Uuid>,
    pub description: Option<String>,
    pub original_price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
    pub features: Option<Vec<String>>,
    /// Video URL; product videos are hosted elsewhere, not uploaded here.
    pub video: Option<String>,
    pub is_active: Option<bool>,
    pub image: Option<UploadFile>,
}

impl ProductInput {
    pub fn from_form(mut form: FormData) -> AppResult<Self> {
        Ok(Self {
            name: form.text("name"),
            service_id: form.uuid("service_id")?,
            description: form.text("description"),
            original_price: form.price("original_price")?,
            discounted_price: form.price("discounted_price")?,
            features: form.text("features").map(|raw| parse_features(&raw)),
            video: form.text("video"),
            is_active: form.parse::<bool>("is_active")?,
            image: form.take_file("image"),
        })
    }
}

pub fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("{field} is required")))
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ServiceQuery {
    #[serde(alias = "categoryId")]
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceList {
    pub items: Vec<Service>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use rust_decimal_macros::dec;

    #[test]
    fn product_form_reads_camel_case_fields() {
        let service_id = Uuid::new_v4();
        let form = FormData::default()
            .with_field("name", "Luxury Cards")
            .with_field("serviceId", service_id.to_string())
            .with_field("originalPrice", "800")
            .with_field("discountedPrice", "650.50")
            .with_field("features", r#"["Thick stock","Foil"]"#)
            .with_file(
                "image",
                UploadFile {
                    file_name: "card.png".into(),
                    content_type: Some("image/png".into()),
                    bytes: Bytes::from_static(b"png"),
                },
            );

        let input = ProductInput::from_form(form).expect("valid form");
        assert_eq!(input.service_id, Some(service_id));
        assert_eq!(input.original_price, Some(dec!(800)));
        assert_eq!(input.discounted_price, Some(dec!(650.50)));
        assert_eq!(input.features.as_deref().map(<[String]>::len), Some(2));
        assert!(input.image.is_some());
        assert!(input.is_active.is_none());
    }

    #[test]
    fn service_form_rejects_malformed_category_id() {
        let form = FormData::default()
            .with_field("name", "Mugs")
            .with_field("categoryId", "not-a-uuid");
        assert!(matches!(
            ServiceInput::from_form(form),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn missing_required_field_names_the_field() {
        let err = required::<String>(None, "name").expect_err("missing");
        assert_eq!(err.to_string(), "Bad Request name is required");
    }
}
