//! Cart mutation rules.
//!
//! The functions here only decide *what* should change; the cart service
//! applies the resulting [`CartChange`] to storage with a version check.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

fn too_large() -> AppError {
    AppError::BadRequest("quantity is too large".into())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customization {
    pub logo_url: Option<String>,
    pub video_url: Option<String>,
    pub note: Option<String>,
}

impl Customization {
    /// Drop blank values so "" and a missing field mean the same thing.
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        Self {
            logo_url: keep(self.logo_url),
            video_url: keep(self.video_url),
            note: keep(self.note),
        }
    }

    pub fn is_empty(&self) -> bool {
        [&self.logo_url, &self.video_url, &self.note]
            .iter()
            .all(|field| field.as_deref().is_none_or(str::is_empty))
    }
}

/// What the rules need to know about an existing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineState {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub customized: bool,
    pub version: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inc,
    Dec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    Append {
        product_id: Uuid,
        quantity: i32,
        customization: Customization,
    },
    SetQuantity {
        line_id: Uuid,
        expected_version: i32,
        quantity: i32,
    },
    RemoveProduct {
        product_id: Uuid,
    },
}

/// Plain lines of the same product merge; customized lines always append.
/// `lines` must be in cart order. A merged quantity past `i32::MAX` is a
/// bad request.
pub fn plan_add(
    lines: &[LineState],
    product_id: Uuid,
    quantity: i32,
    customization: Customization,
) -> AppResult<CartChange> {
    let customization = customization.normalized();
    if customization.is_empty() {
        if let Some(line) = lines
            .iter()
            .find(|line| line.product_id == product_id && !line.customized)
        {
            return Ok(CartChange::SetQuantity {
                line_id: line.id,
                expected_version: line.version,
                quantity: line.quantity.checked_add(quantity).ok_or_else(too_large)?,
            });
        }
    }
    Ok(CartChange::Append {
        product_id,
        quantity,
        customization,
    })
}

/// Step the first line of `product_id` by one.
///
/// Decrementing to zero removes *every* line of that product, not only the
/// one that was stepped.
pub fn plan_step(lines: &[LineState], product_id: Uuid, direction: Direction) -> AppResult<CartChange> {
    let line = lines
        .iter()
        .find(|line| line.product_id == product_id)
        .ok_or_else(|| AppError::NotFound("Item not in cart".into()))?;
    let quantity = match direction {
        Direction::Inc => line.quantity.checked_add(1).ok_or_else(too_large)?,
        Direction::Dec => line.quantity - 1,
    };
    if quantity <= 0 {
        return Ok(CartChange::RemoveProduct { product_id });
    }
    Ok(CartChange::SetQuantity {
        line_id: line.id,
        expected_version: line.version,
        quantity,
    })
}
