use sea_orm::{ActiveEnum, Iterable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Order, OrderItem, OrderStatus},
};

/// Who placed an order, shown on the admin listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderWithItems>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// Accepts exactly the stored spellings: Pending, Confirmed, Preparing,
/// Completed, Cancelled.
pub fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    OrderStatus::iter()
        .find(|status| status.to_value() == raw.trim())
        .ok_or_else(|| AppError::BadRequest(format!("Invalid status: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_parse() {
        assert_eq!(parse_status("Pending").expect("valid"), OrderStatus::Pending);
        assert_eq!(parse_status(" Completed ").expect("valid"), OrderStatus::Completed);
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        assert!(matches!(parse_status("Shipped"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_status("pending"), Err(AppError::BadRequest(_))));
    }
}
