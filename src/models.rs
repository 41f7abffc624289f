use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    cart_items, categories, feedback, order_items, orders, products, services, showcases, users,
};

pub use crate::entity::{
    feedback::FeedbackStatus, orders::OrderStatus, showcases::ShowcaseKind,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            is_verified: model.is_verified,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            image: model.image,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub category_id: Uuid,
    pub image: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<services::Model> for Service {
    fn from(model: services::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            category_id: model.category_id,
            image: model.image,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub service_id: Uuid,
    pub image: String,
    pub video: Option<String>,
    pub gallery: Vec<String>,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub original_price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            service_id: model.service_id,
            image: model.image,
            video: model.video,
            gallery: model.gallery,
            description: model.description,
            features: model.features,
            original_price: model.original_price,
            discounted_price: model.discounted_price,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// The live product fields joined onto cart lines and showcase entries.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub original_price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
}

impl From<&products::Model> for ProductSummary {
    fn from(model: &products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            slug: model.slug.clone(),
            image: model.image.clone(),
            original_price: model.original_price,
            discounted_price: model.discounted_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub logo_url: Option<String>,
    pub video_url: Option<String>,
    pub customization_note: Option<String>,
    pub version: i32,
    /// `None` when the product was deleted after the line was added.
    pub product: Option<ProductSummary>,
}

impl CartLine {
    pub fn from_entity(model: cart_items::Model, product: Option<ProductSummary>) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            quantity: model.quantity,
            logo_url: model.logo_url,
            video_url: model.video_url,
            customization_note: model.customization_note,
            version: model.version,
            product,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            total_amount: model.total_amount,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub logo_url: Option<String>,
    pub video_url: Option<String>,
    pub customization_note: Option<String>,
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            name: model.name,
            price: model.price,
            quantity: model.quantity,
            logo_url: model.logo_url,
            video_url: model.video_url,
            customization_note: model.customization_note,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Feedback {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub admin_reply: String,
    pub status: FeedbackStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<feedback::Model> for Feedback {
    fn from(model: feedback::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            message: model.message,
            admin_reply: model.admin_reply,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Showcase {
    pub id: Uuid,
    pub kind: ShowcaseKind,
    pub title: String,
    pub video: String,
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub price: Option<Decimal>,
    pub product_image: Option<String>,
    pub views: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub product: Option<ProductSummary>,
}

impl Showcase {
    pub fn from_entity(model: showcases::Model, product: Option<ProductSummary>) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            title: model.title,
            video: model.video,
            product_id: model.product_id,
            product_name: model.product_name,
            price: model.price,
            product_image: model.product_image,
            views: model.views,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            product,
        }
    }
}
