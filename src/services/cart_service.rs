use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::cart::{CartChange, Customization, LineState, plan_add, plan_step},
    dto::cart::{AddToCartRequest, CartView, RemoveFromCartRequest, UpdateCartRequest},
    entity::{CartItems, Products, Users, cart_items, products},
    error::{AppError, AppResult},
    media::{ResourceType, UploadFile},
    middleware::auth::AuthUser,
    models::{CartLine, ProductSummary},
    response::ApiResponse,
    services::upload_media,
    state::AppState,
};

/// The user's lines in cart order.
pub(crate) async fn load_lines<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> AppResult<Vec<cart_items::Model>> {
    Ok(CartItems::find()
        .filter(cart_items::Column::UserId.eq(user_id))
        .order_by_asc(cart_items::Column::CreatedAt)
        .order_by_asc(cart_items::Column::Id)
        .all(db)
        .await?)
}

fn line_state(line: &cart_items::Model) -> LineState {
    let customization = Customization {
        logo_url: line.logo_url.clone(),
        video_url: line.video_url.clone(),
        note: line.customization_note.clone(),
    };
    LineState {
        id: line.id,
        product_id: line.product_id,
        quantity: line.quantity,
        customized: !customization.is_empty(),
        version: line.version,
    }
}

/// Write one planned change. A `SetQuantity` whose expected version is no
/// longer current is rejected with a conflict.
pub async fn apply_change(state: &AppState, user_id: Uuid, change: CartChange) -> AppResult<()> {
    match change {
        CartChange::Append {
            product_id,
            quantity,
            customization,
        } => {
            cart_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                product_id: Set(product_id),
                quantity: Set(quantity),
                logo_url: Set(customization.logo_url),
                video_url: Set(customization.video_url),
                customization_note: Set(customization.note),
                version: Set(0),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?;
        }
        CartChange::SetQuantity {
            line_id,
            expected_version,
            quantity,
        } => {
            let result = CartItems::update_many()
                .col_expr(cart_items::Column::Quantity, Expr::value(quantity))
                .col_expr(
                    cart_items::Column::Version,
                    Expr::col(cart_items::Column::Version).add(1),
                )
                .filter(cart_items::Column::Id.eq(line_id))
                .filter(cart_items::Column::UserId.eq(user_id))
                .filter(cart_items::Column::Version.eq(expected_version))
                .exec(&state.orm)
                .await?;
            if result.rows_affected == 0 {
                tracing::warn!(%user_id, %line_id, expected_version, "stale cart write rejected");
                return Err(AppError::Conflict(
                    "Cart was modified by another request, reload and try again".into(),
                ));
            }
        }
        CartChange::RemoveProduct { product_id } => {
            CartItems::delete_many()
                .filter(cart_items::Column::UserId.eq(user_id))
                .filter(cart_items::Column::ProductId.eq(product_id))
                .exec(&state.orm)
                .await?;
        }
    }
    Ok(())
}

/// Cart lines joined with the current product fields.
pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let lines = load_lines(&state.orm, user.user_id).await?;

    let product_ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
    let products: HashMap<Uuid, products::Model> = if product_ids.is_empty() {
        HashMap::new()
    } else {
        Products::find()
            .filter(products::Column::Id.is_in(product_ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|product| (product.id, product))
            .collect()
    };

    let items = lines
        .into_iter()
        .map(|line| {
            let product = products.get(&line.product_id).map(ProductSummary::from);
            CartLine::from_entity(line, product)
        })
        .collect();

    Ok(ApiResponse::ok("Cart", CartView { items }))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    mut payload: AddToCartRequest,
    design_file: Option<UploadFile>,
) -> AppResult<ApiResponse<CartView>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

    if let Some(media) = upload_media(state, design_file, ResourceType::Auto).await? {
        if media.is_video() {
            payload.video_url = Some(media.secure_url);
        } else {
            payload.logo_url = Some(media.secure_url);
        }
    }

    let lines: Vec<LineState> = load_lines(&state.orm, user.user_id)
        .await?
        .iter()
        .map(line_state)
        .collect();
    let change = plan_add(
        &lines,
        payload.product_id,
        payload.quantity,
        payload.customization(),
    )?;
    apply_change(state, user.user_id, change).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "cart_add",
        "cart_items",
        serde_json::json!({ "product_id": payload.product_id, "quantity": payload.quantity }),
    )
    .await;

    get_cart(state, user).await
}

/// Step the first line of the product up or down by one.
pub async fn update_quantity(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let lines: Vec<LineState> = load_lines(&state.orm, user.user_id)
        .await?
        .iter()
        .map(line_state)
        .collect();
    let change = plan_step(&lines, payload.product_id, payload.direction)?;
    apply_change(state, user.user_id, change).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "cart_update",
        "cart_items",
        serde_json::json!({ "product_id": payload.product_id, "direction": payload.direction }),
    )
    .await;

    get_cart(state, user).await
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    payload: RemoveFromCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    apply_change(
        state,
        user.user_id,
        CartChange::RemoveProduct {
            product_id: payload.product_id,
        },
    )
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "cart_remove",
        "cart_items",
        serde_json::json!({ "product_id": payload.product_id }),
    )
    .await;

    get_cart(state, user).await
}
