use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::pricing::{CheckoutLine, PricedProduct, price_cart},
    dto::orders::{
        CustomerSummary, OrderList, OrderWithItems, UpdateOrderStatusRequest, parse_status,
    },
    entity::{CartItems, OrderItems, Orders, Products, Users, cart_items, order_items, orders, products, users},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, PageQuery, SortOrder},
    state::AppState,
};

/// Price the cart and turn it into an order. Writing the order and clearing
/// the cart happen in one transaction with the cart rows locked. Lines whose
/// product is gone are skipped, so a cart of only such lines still yields an
/// empty zero-total order and is cleared.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderWithItems>> {
    Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let txn = state.orm.begin().await?;

    let lines = CartItems::find()
        .filter(cart_items::Column::UserId.eq(user.user_id))
        .order_by_asc(cart_items::Column::CreatedAt)
        .order_by_asc(cart_items::Column::Id)
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    if lines.is_empty() {
        return Err(AppError::InvalidState("Cart is empty".into()));
    }

    let product_ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
    let products: HashMap<Uuid, products::Model> = Products::find()
        .filter(products::Column::Id.is_in(product_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    let checkout: Vec<CheckoutLine> = lines
        .into_iter()
        .map(|line| CheckoutLine {
            product: products.get(&line.product_id).map(|p| PricedProduct {
                id: p.id,
                name: p.name.clone(),
                original_price: p.original_price,
                discounted_price: p.discounted_price,
            }),
            quantity: line.quantity,
            logo_url: line.logo_url,
            video_url: line.video_url,
            customization_note: line.customization_note,
        })
        .collect();

    let line_count = checkout.len();
    let priced = price_cart(checkout);
    if priced.lines.len() < line_count {
        tracing::info!(
            user_id = %user.user_id,
            dropped = line_count - priced.lines.len(),
            "cart lines for deleted products skipped"
        );
    }

    let now = Utc::now();
    let order = orders::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        total_amount: Set(priced.total),
        status: Set(OrderStatus::Pending),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(priced.lines.len());
    for line in priced.lines {
        let item = order_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            name: Set(line.name),
            price: Set(line.price),
            quantity: Set(line.quantity),
            logo_url: Set(line.logo_url),
            video_url: Set(line.video_url),
            customization_note: Set(line.customization_note),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(item.into());
    }

    CartItems::delete_many()
        .filter(cart_items::Column::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %user.user_id,
        subtotal = %priced.subtotal,
        discount = %priced.discount,
        total = %priced.total,
        "order created"
    );
    audit::record(
        &state.pool,
        user.user_id,
        "order_create",
        "orders",
        serde_json::json!({ "order_id": order.id, "total": priced.total }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Order created",
        OrderWithItems {
            order: order.into(),
            items,
            customer: None,
        },
    ))
}

async fn with_items<C: ConnectionTrait>(
    db: &C,
    orders: Vec<orders::Model>,
    customers: &HashMap<Uuid, users::Model>,
) -> AppResult<Vec<OrderWithItems>> {
    let order_ids: Vec<Uuid> = orders.iter().map(|order| order.id).collect();
    let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    if !order_ids.is_empty() {
        for item in OrderItems::find()
            .filter(order_items::Column::OrderId.is_in(order_ids))
            .order_by_asc(order_items::Column::CreatedAt)
            .all(db)
            .await?
        {
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(item.into());
        }
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let customer = customers.get(&order.user_id).map(|user| CustomerSummary {
                id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
            });
            OrderWithItems {
                items: items_by_order.remove(&order.id).unwrap_or_default(),
                order: order.into(),
                customer,
            }
        })
        .collect())
}

pub async fn my_orders(
    state: &AppState,
    user: &AuthUser,
    query: PageQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let finder = Orders::find()
        .filter(orders::Column::UserId.eq(user.user_id))
        .order_by_desc(orders::Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let page_orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let items = with_items(&state.orm, page_orders, &HashMap::new()).await?;
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = Orders::find();
    if let Some(status) = query.status.as_deref().filter(|s| !s.trim().is_empty()) {
        finder = finder.filter(orders::Column::Status.eq(parse_status(status)?));
    }
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(orders::Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(orders::Column::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let page_orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let user_ids: Vec<Uuid> = page_orders.iter().map(|order| order.user_id).collect();
    let customers: HashMap<Uuid, users::Model> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        Users::find()
            .filter(users::Column::Id.is_in(user_ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect()
    };

    let items = with_items(&state.orm, page_orders, &customers).await?;
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Any documented status is accepted, in any order.
pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let status = parse_status(&payload.status)?;

    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    let previous = order.status;

    let mut active: orders::ActiveModel = order.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": id, "from": previous, "to": status }),
    )
    .await;

    Ok(ApiResponse::ok("Order status updated", order.into()))
}

pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find()
        .filter(orders::Column::Id.eq(id))
        .filter(orders::Column::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    if order.status == OrderStatus::Completed {
        return Err(AppError::InvalidState(
            "Cannot cancel completed order".into(),
        ));
    }

    let mut active: orders::ActiveModel = order.into();
    active.status = Set(OrderStatus::Cancelled);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "order_cancel",
        "orders",
        serde_json::json!({ "order_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Order cancelled", order.into()))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Orders::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Order"));
    }

    audit::record(
        &state.pool,
        user.user_id,
        "order_delete",
        "orders",
        serde_json::json!({ "order_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Order deleted"))
}
