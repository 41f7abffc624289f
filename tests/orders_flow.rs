mod common;

use printshop_api::{
    dto::{
        cart::{AddToCartRequest, UpdateCartRequest},
        orders::UpdateOrderStatusRequest,
    },
    domain::cart::{CartChange, Direction},
    entity::{Products, categories, products, services, users},
    error::AppError,
    middleware::auth::{AuthUser, ROLE_ADMIN, ROLE_USER},
    models::OrderStatus,
    routes::params::PageQuery,
    services::{cart_service, order_service},
    state::AppState,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

async fn create_user(state: &AppState, role: &str) -> anyhow::Result<AuthUser> {
    let id = Uuid::new_v4();
    users::ActiveModel {
        id: Set(id),
        name: Set(format!("{role} tester")),
        email: Set(format!("{id}@example.com")),
        password_hash: Set("not-a-real-hash".into()),
        role: Set(role.into()),
        is_verified: Set(true),
        otp: Set(None),
        otp_expires_at: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(AuthUser {
        user_id: id,
        role: role.into(),
    })
}

async fn create_product(
    state: &AppState,
    service_id: Uuid,
    name: &str,
    original: Decimal,
    discounted: Option<Decimal>,
) -> anyhow::Result<products::Model> {
    let id = Uuid::new_v4();
    Ok(products::ActiveModel {
        id: Set(id),
        name: Set(name.into()),
        slug: Set(format!("{name}-{id}").to_lowercase().replace(' ', "-")),
        service_id: Set(service_id),
        image: Set("https://cdn.test/image/product.png".into()),
        video: Set(None),
        gallery: Set(vec![]),
        description: Set(None),
        features: Set(vec!["Full colour".into()]),
        original_price: Set(Some(original)),
        discounted_price: Set(discounted),
        is_active: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?)
}

async fn create_service(state: &AppState) -> anyhow::Result<Uuid> {
    let category_id = Uuid::new_v4();
    categories::ActiveModel {
        id: Set(category_id),
        name: Set("Printing".into()),
        slug: Set(format!("printing-{category_id}")),
        image: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let service_id = Uuid::new_v4();
    services::ActiveModel {
        id: Set(service_id),
        name: Set("Visiting Cards".into()),
        slug: Set(format!("visiting-cards-{service_id}")),
        category_id: Set(category_id),
        image: Set(None),
        description: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(service_id)
}

fn plain(product_id: Uuid, quantity: i32) -> AddToCartRequest {
    AddToCartRequest {
        product_id,
        quantity,
        logo_url: None,
        video_url: None,
        customization_note: None,
    }
}

#[tokio::test]
async fn cart_to_order_flow_prices_and_snapshots() -> anyhow::Result<()> {
    let Some(state) = common::database_state().await? else {
        return Ok(());
    };

    let shopper = create_user(&state, ROLE_USER).await?;
    let admin = create_user(&state, ROLE_ADMIN).await?;
    let service_id = create_service(&state).await?;
    let cards = create_product(&state, service_id, "Business Card", dec!(600), Some(dec!(500))).await?;
    let mugs = create_product(&state, service_id, "Magic Mug", dec!(300), None).await?;

    // Plain adds of the same product merge into one line.
    cart_service::add_to_cart(&state, &shopper, plain(cards.id, 1), None).await?;
    let cart = cart_service::add_to_cart(&state, &shopper, plain(cards.id, 1), None)
        .await?
        .data
        .expect("cart");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);

    // A customized add always gets its own line.
    let mut noted = plain(mugs.id, 1);
    noted.customization_note = Some("gift wrap".into());
    cart_service::add_to_cart(&state, &shopper, noted, None).await?;
    let cart = cart_service::add_to_cart(&state, &shopper, plain(mugs.id, 1), None)
        .await?
        .data
        .expect("cart");
    assert_eq!(cart.items.len(), 3);

    // Stepping the first mug line down to zero drops every mug line.
    let cart = cart_service::update_quantity(
        &state,
        &shopper,
        UpdateCartRequest {
            product_id: mugs.id,
            direction: Direction::Dec,
        },
    )
    .await?
    .data
    .expect("cart");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].product_id, cards.id);

    let placed = order_service::create_order(&state, &shopper)
        .await?
        .data
        .expect("order");
    assert_eq!(placed.order.total_amount, dec!(880));
    assert_eq!(placed.order.status, OrderStatus::Pending);
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].price, dec!(500));

    let cart = cart_service::get_cart(&state, &shopper).await?.data.expect("cart");
    assert!(cart.items.is_empty());

    // Later price changes do not touch the snapshot.
    let mut repriced: products::ActiveModel = cards.into();
    repriced.discounted_price = Set(Some(dec!(450)));
    repriced.update(&state.orm).await?;

    let mine = order_service::my_orders(
        &state,
        &shopper,
        PageQuery {
            page: None,
            per_page: None,
        },
    )
    .await?
    .data
    .expect("orders");
    let snapshot = mine
        .items
        .iter()
        .find(|entry| entry.order.id == placed.order.id)
        .expect("placed order listed");
    assert_eq!(snapshot.items[0].price, dec!(500));
    assert_eq!(snapshot.items[0].name, "Business Card");

    // An emptied cart cannot be ordered again.
    let err = order_service::create_order(&state, &shopper)
        .await
        .expect_err("empty cart");
    assert!(matches!(err, AppError::InvalidState(_)));

    // Completed orders can no longer be cancelled by the shopper.
    order_service::update_status(
        &state,
        &admin,
        placed.order.id,
        UpdateOrderStatusRequest {
            status: "Completed".into(),
        },
    )
    .await?;
    let err = order_service::cancel_order(&state, &shopper, placed.order.id)
        .await
        .expect_err("completed order");
    assert!(matches!(err, AppError::InvalidState(_)));

    // Shoppers cannot touch the admin side.
    let err = order_service::delete_order(&state, &shopper, placed.order.id)
        .await
        .expect_err("not admin");
    assert!(matches!(err, AppError::Forbidden));
    order_service::delete_order(&state, &admin, placed.order.id).await?;

    Ok(())
}

#[tokio::test]
async fn stepping_a_product_not_in_cart_is_not_found() -> anyhow::Result<()> {
    let Some(state) = common::database_state().await? else {
        return Ok(());
    };
    let shopper = create_user(&state, ROLE_USER).await?;

    let err = cart_service::update_quantity(
        &state,
        &shopper,
        UpdateCartRequest {
            product_id: Uuid::new_v4(),
            direction: Direction::Inc,
        },
    )
    .await
    .expect_err("not in cart");
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

async fn place_order(
    state: &AppState,
    shopper: &AuthUser,
    product_id: Uuid,
) -> anyhow::Result<Uuid> {
    cart_service::add_to_cart(state, shopper, plain(product_id, 1), None).await?;
    let placed = order_service::create_order(state, shopper)
        .await?
        .data
        .expect("order");
    Ok(placed.order.id)
}

#[tokio::test]
async fn open_orders_can_be_cancelled_by_their_owner() -> anyhow::Result<()> {
    let Some(state) = common::database_state().await? else {
        return Ok(());
    };
    let shopper = create_user(&state, ROLE_USER).await?;
    let admin = create_user(&state, ROLE_ADMIN).await?;
    let service_id = create_service(&state).await?;
    let flyer = create_product(&state, service_id, "Flyer", dec!(120), Some(dec!(100))).await?;

    for status in ["Pending", "Confirmed", "Preparing"] {
        let order_id = place_order(&state, &shopper, flyer.id).await?;
        if status != "Pending" {
            order_service::update_status(
                &state,
                &admin,
                order_id,
                UpdateOrderStatusRequest {
                    status: status.into(),
                },
            )
            .await?;
        }

        let cancelled = order_service::cancel_order(&state, &shopper, order_id)
            .await?
            .data
            .expect("order");
        assert_eq!(cancelled.status, OrderStatus::Cancelled, "from {status}");
    }

    // Someone else's order is invisible to the shopper.
    let stranger = create_user(&state, ROLE_USER).await?;
    let order_id = place_order(&state, &shopper, flyer.id).await?;
    let err = order_service::cancel_order(&state, &stranger, order_id)
        .await
        .expect_err("not owner");
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn stale_line_version_is_a_conflict() -> anyhow::Result<()> {
    let Some(state) = common::database_state().await? else {
        return Ok(());
    };
    let shopper = create_user(&state, ROLE_USER).await?;
    let service_id = create_service(&state).await?;
    let banner = create_product(&state, service_id, "Banner", dec!(900), Some(dec!(750))).await?;

    let cart = cart_service::add_to_cart(&state, &shopper, plain(banner.id, 1), None)
        .await?
        .data
        .expect("cart");
    let observed = cart.items[0].clone();

    // Another request bumps the line first.
    cart_service::update_quantity(
        &state,
        &shopper,
        UpdateCartRequest {
            product_id: banner.id,
            direction: Direction::Inc,
        },
    )
    .await?;

    let err = cart_service::apply_change(
        &state,
        shopper.user_id,
        CartChange::SetQuantity {
            line_id: observed.id,
            expected_version: observed.version,
            quantity: observed.quantity + 5,
        },
    )
    .await
    .expect_err("stale version");
    assert!(matches!(err, AppError::Conflict(_)));

    let cart = cart_service::get_cart(&state, &shopper).await?.data.expect("cart");
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.items[0].version, observed.version + 1);
    Ok(())
}

#[tokio::test]
async fn lines_of_deleted_products_are_skipped_at_checkout() -> anyhow::Result<()> {
    let Some(state) = common::database_state().await? else {
        return Ok(());
    };
    let shopper = create_user(&state, ROLE_USER).await?;
    let service_id = create_service(&state).await?;
    let kept = create_product(&state, service_id, "Sticker", dec!(50), Some(dec!(40))).await?;
    let gone = create_product(&state, service_id, "Poster", dec!(300), None).await?;

    cart_service::add_to_cart(&state, &shopper, plain(kept.id, 3), None).await?;
    cart_service::add_to_cart(&state, &shopper, plain(gone.id, 1), None).await?;
    Products::delete_by_id(gone.id).exec(&state.orm).await?;

    let cart = cart_service::get_cart(&state, &shopper).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 2);
    assert!(cart.items[1].product.is_none());

    let placed = order_service::create_order(&state, &shopper)
        .await?
        .data
        .expect("order");
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].product_id, kept.id);
    assert_eq!(placed.order.total_amount, dec!(120));

    let cart = cart_service::get_cart(&state, &shopper).await?.data.expect("cart");
    assert!(cart.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn cart_of_only_deleted_products_still_checks_out_empty() -> anyhow::Result<()> {
    let Some(state) = common::database_state().await? else {
        return Ok(());
    };
    let shopper = create_user(&state, ROLE_USER).await?;
    let service_id = create_service(&state).await?;
    let gone = create_product(&state, service_id, "Calendar", dec!(200), Some(dec!(180))).await?;

    cart_service::add_to_cart(&state, &shopper, plain(gone.id, 2), None).await?;
    Products::delete_by_id(gone.id).exec(&state.orm).await?;

    let placed = order_service::create_order(&state, &shopper)
        .await?
        .data
        .expect("order");
    assert!(placed.items.is_empty());
    assert_eq!(placed.order.total_amount, Decimal::ZERO);
    assert_eq!(placed.order.status, OrderStatus::Pending);

    let cart = cart_service::get_cart(&state, &shopper).await?.data.expect("cart");
    assert!(cart.items.is_empty());
    Ok(())
}
