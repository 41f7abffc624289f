//! Video stories and watch-and-buy share handlers; the mounted router
//! carries its [`ShowcaseKind`] as a request extension.

use axum::{
    Extension, Json, Router,
    extract::{Multipart, Path, State},
    routing::{get, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{
        form::FormData,
        showcase::{ShowcaseInput, ShowcaseList},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Showcase, ShowcaseKind},
    response::ApiResponse,
    services::showcase_service,
    state::AppState,
};

pub fn router(kind: ShowcaseKind) -> Router<AppState> {
    Router::new()
        .route("/", get(list_showcases).post(create_showcase))
        .route("/{id}", put(update_showcase).delete(delete_showcase))
        .layer(Extension(kind))
}

#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
pub struct ShowcaseForm {
    title: Option<String>,
    product_name: Option<String>,
    price: Option<Decimal>,
    product_id: Option<Uuid>,
    is_active: Option<bool>,
    /// Required on create.
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    video: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    product_image: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/{collection}",
    params(("collection" = String, Path, description = "video-stories or watch-and-buy")),
    responses(
        (status = 200, description = "Active entries, newest first, with linked product", body = ApiResponse<ShowcaseList>),
    ),
    tag = "Showcases"
)]
pub async fn list_showcases(
    State(state): State<AppState>,
    Extension(kind): Extension<ShowcaseKind>,
) -> AppResult<Json<ApiResponse<ShowcaseList>>> {
    let resp = showcase_service::list(&state, kind).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/{collection}",
    params(("collection" = String, Path, description = "video-stories or watch-and-buy")),
    request_body(content = ShowcaseForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Entry created", body = ApiResponse<Showcase>),
        (status = 400, description = "Video file is required"),
        (status = 404, description = "Linked product not found"),
        (status = 502, description = "Upload failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Showcases"
)]
pub async fn create_showcase(
    State(state): State<AppState>,
    Extension(kind): Extension<ShowcaseKind>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Showcase>>> {
    let input = ShowcaseInput::from_form(FormData::from_multipart(multipart).await?)?;
    let resp = showcase_service::create(&state, &user, kind, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/{collection}/{id}",
    params(
        ("collection" = String, Path, description = "video-stories or watch-and-buy"),
        ("id" = Uuid, Path, description = "Entry ID")
    ),
    request_body(content = ShowcaseForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Entry updated", body = ApiResponse<Showcase>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Showcases"
)]
pub async fn update_showcase(
    State(state): State<AppState>,
    Extension(kind): Extension<ShowcaseKind>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Showcase>>> {
    let input = ShowcaseInput::from_form(FormData::from_multipart(multipart).await?)?;
    let resp = showcase_service::update(&state, &user, kind, id, input).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/{collection}/{id}",
    params(
        ("collection" = String, Path, description = "video-stories or watch-and-buy"),
        ("id" = Uuid, Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Entry deleted"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Showcases"
)]
pub async fn delete_showcase(
    State(state): State<AppState>,
    Extension(kind): Extension<ShowcaseKind>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = showcase_service::delete(&state, &user, kind, id).await?;
    Ok(Json(resp))
}
