use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::cart::{Customization, Direction},
    dto::form::FormData,
    error::AppResult,
    models::CartLine,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    #[serde(alias = "productId")]
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default, alias = "logoUrl")]
    pub logo_url: Option<String>,
    #[serde(default, alias = "videoUrl")]
    pub video_url: Option<String>,
    #[serde(default, alias = "customizationNote")]
    pub customization_note: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

impl AddToCartRequest {
    pub fn from_form(form: &FormData) -> AppResult<Self> {
        Ok(Self {
            product_id: form.require_uuid("product_id")?,
            quantity: form.parse::<i32>("quantity")?.unwrap_or(1),
            logo_url: form.text("logo_url"),
            video_url: form.text("video_url"),
            customization_note: form.text("customization_note"),
        })
    }

    pub fn customization(&self) -> Customization {
        Customization {
            logo_url: self.logo_url.clone(),
            video_url: self.video_url.clone(),
            note: self.customization_note.clone(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartRequest {
    #[serde(alias = "productId")]
    pub product_id: Uuid,
    #[serde(alias = "type")]
    pub direction: Direction,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveFromCartRequest {
    #[serde(alias = "productId")]
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLine>,
}
