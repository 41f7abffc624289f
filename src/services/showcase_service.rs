use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::{catalog::required, showcase::{ShowcaseInput, ShowcaseList}},
    entity::{Products, Showcases, products, showcases},
    error::{AppError, AppResult},
    media::ResourceType,
    middleware::auth::{AuthUser, ensure_admin},
    models::{ProductSummary, Showcase, ShowcaseKind},
    response::ApiResponse,
    services::upload_optional,
    state::AppState,
};

fn label(kind: ShowcaseKind) -> &'static str {
    match kind {
        ShowcaseKind::VideoStory => "Video Story",
        ShowcaseKind::WatchAndBuy => "Watch and buy entry",
    }
}

async fn ensure_product_exists(state: &AppState, id: Uuid) -> AppResult<()> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("Product"))
}

/// Active entries of one kind, newest first, with their linked product.
pub async fn list(state: &AppState, kind: ShowcaseKind) -> AppResult<ApiResponse<ShowcaseList>> {
    let entries = Showcases::find()
        .filter(showcases::Column::Kind.eq(kind))
        .filter(showcases::Column::IsActive.eq(true))
        .order_by_desc(showcases::Column::CreatedAt)
        .all(&state.orm)
        .await?;

    let product_ids: Vec<Uuid> = entries.iter().filter_map(|e| e.product_id).collect();
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

    let items = entries
        .into_iter()
        .map(|entry| {
            let product = entry
                .product_id
                .and_then(|id| products.get(&id))
                .map(ProductSummary::from);
            Showcase::from_entity(entry, product)
        })
        .collect();

    Ok(ApiResponse::ok(label(kind), ShowcaseList { items }))
}

pub async fn create(
    state: &AppState,
    user: &AuthUser,
    kind: ShowcaseKind,
    input: ShowcaseInput,
) -> AppResult<ApiResponse<Showcase>> {
    ensure_admin(user)?;
    let title = required(input.title, "title")?;
    let video_file = input
        .video
        .ok_or_else(|| AppError::BadRequest("Video file is required".into()))?;
    if let Some(product_id) = input.product_id {
        ensure_product_exists(state, product_id).await?;
    }

    let video = state
        .media
        .upload(video_file, ResourceType::Video)
        .await?
        .secure_url;
    let product_image = upload_optional(state, input.product_image, ResourceType::Image).await?;

    let entry = showcases::ActiveModel {
        id: Set(Uuid::new_v4()),
        kind: Set(kind),
        title: Set(title),
        video: Set(video),
        product_id: Set(input.product_id),
        product_name: Set(input.product_name),
        price: Set(input.price),
        product_image: Set(product_image),
        views: Set(0),
        is_active: Set(input.is_active.unwrap_or(true)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "showcase_create",
        "showcases",
        serde_json::json!({ "showcase_id": entry.id, "kind": kind }),
    )
    .await;

    Ok(ApiResponse::ok(
        format!("{} created", label(kind)),
        Showcase::from_entity(entry, None),
    ))
}

pub async fn update(
    state: &AppState,
    user: &AuthUser,
    kind: ShowcaseKind,
    id: Uuid,
    input: ShowcaseInput,
) -> AppResult<ApiResponse<Showcase>> {
    ensure_admin(user)?;
    let existing = Showcases::find_by_id(id)
        .filter(showcases::Column::Kind.eq(kind))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found(label(kind)))?;

    let mut active: showcases::ActiveModel = existing.into();
    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(product_name) = input.product_name {
        active.product_name = Set(Some(product_name));
    }
    if let Some(price) = input.price {
        active.price = Set(Some(price));
    }
    if let Some(product_id) = input.product_id {
        ensure_product_exists(state, product_id).await?;
        active.product_id = Set(Some(product_id));
    }
    if let Some(is_active) = input.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(video) = upload_optional(state, input.video, ResourceType::Video).await? {
        active.video = Set(video);
    }
    if let Some(image) = upload_optional(state, input.product_image, ResourceType::Image).await? {
        active.product_image = Set(Some(image));
    }
    let entry = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "showcase_update",
        "showcases",
        serde_json::json!({ "showcase_id": id, "kind": kind }),
    )
    .await;

    Ok(ApiResponse::ok(
        format!("{} updated", label(kind)),
        Showcase::from_entity(entry, None),
    ))
}

pub async fn delete(
    state: &AppState,
    user: &AuthUser,
    kind: ShowcaseKind,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Showcases::delete_many()
        .filter(showcases::Column::Id.eq(id))
        .filter(showcases::Column::Kind.eq(kind))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found(label(kind)));
    }

    audit::record(
        &state.pool,
        user.user_id,
        "showcase_delete",
        "showcases",
        serde_json::json!({ "showcase_id": id, "kind": kind }),
    )
    .await;

    Ok(ApiResponse::message(format!("{} deleted", label(kind))))
}
