use axum::{
    Json, Router,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    routing::{get, post},
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{
        cart::{AddToCartRequest, CartView, RemoveFromCartRequest, UpdateCartRequest},
        form::FormData,
    },
    error::{AppError, AppResult},
    media::UploadFile,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get", get(cart_list))
        .route("/add", post(add_to_cart))
        .route("/update", post(update_cart))
        .route("/remove", post(remove_from_cart))
}

/// Add-to-cart body: JSON, or multipart with an optional `design_file`.
pub struct AddToCartPayload {
    pub request: AddToCartRequest,
    pub design_file: Option<UploadFile>,
}

impl<S> FromRequest<S> for AddToCartPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let mut form = FormData::from_multipart(multipart).await?;
            let design_file = form.take_file("design_file");
            Ok(Self {
                request: AddToCartRequest::from_form(&form)?,
                design_file,
            })
        } else {
            let Json(request) = Json::<AddToCartRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self {
                request,
                design_file: None,
            })
        }
    }
}

#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
pub struct AddToCartForm {
    product_id: Uuid,
    quantity: Option<i32>,
    logo_url: Option<String>,
    video_url: Option<String>,
    customization_note: Option<String>,
    /// Image or video; a video sets `video_url`, anything else `logo_url`.
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    design_file: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/cart/get",
    responses(
        (status = 200, description = "Cart lines with current product details", body = ApiResponse<CartView>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::get_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/add",
    request_body(
        content(
            (AddToCartRequest = "application/json"),
            (AddToCartForm = "multipart/form-data")
        )
    ),
    responses(
        (status = 200, description = "Line merged or appended; returns the cart", body = ApiResponse<CartView>),
        (status = 400, description = "Invalid quantity or product id"),
        (status = 404, description = "User or product not found"),
        (status = 409, description = "Concurrent cart update"),
        (status = 502, description = "Design upload failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    payload: AddToCartPayload,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp =
        cart_service::add_to_cart(&state, &user, payload.request, payload.design_file).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/update",
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Quantity stepped; returns the cart", body = ApiResponse<CartView>),
        (status = 404, description = "Item not in cart"),
        (status = 409, description = "Concurrent cart update"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::update_quantity(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/remove",
    request_body = RemoveFromCartRequest,
    responses(
        (status = 200, description = "Every line of the product removed; returns the cart", body = ApiResponse<CartView>),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RemoveFromCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::remove_from_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}
