use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::feedback::{FeedbackList, SubmitFeedbackRequest, UpdateFeedbackRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Feedback,
    response::ApiResponse,
    routes::params::PageQuery,
    services::feedback_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_feedback).post(submit_feedback))
        .route("/public", get(public_feedback))
        .route("/{id}", patch(update_feedback).delete(delete_feedback))
}

#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 200, description = "Feedback stored as pending", body = ApiResponse<Feedback>),
        (status = 400, description = "All fields required"),
        (status = 409, description = "Same email and message already submitted"),
    ),
    tag = "Feedback"
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(payload): Json<SubmitFeedbackRequest>,
) -> AppResult<Json<ApiResponse<Feedback>>> {
    let resp = feedback_service::submit(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/feedback/public",
    responses(
        (status = 200, description = "All feedback, newest first", body = ApiResponse<FeedbackList>),
    ),
    tag = "Feedback"
)]
pub async fn public_feedback(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<FeedbackList>>> {
    let resp = feedback_service::list_public(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/feedback",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated feedback (admin only)", body = ApiResponse<FeedbackList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Feedback"
)]
pub async fn list_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<FeedbackList>>> {
    let resp = feedback_service::list_all(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/feedback/{id}",
    params(("id" = Uuid, Path, description = "Feedback ID")),
    request_body = UpdateFeedbackRequest,
    responses(
        (status = 200, description = "Status or reply updated", body = ApiResponse<Feedback>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Feedback"
)]
pub async fn update_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFeedbackRequest>,
) -> AppResult<Json<ApiResponse<Feedback>>> {
    let resp = feedback_service::update(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/feedback/{id}",
    params(("id" = Uuid, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Feedback"
)]
pub async fn delete_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = feedback_service::delete(&state, &user, id).await?;
    Ok(Json(resp))
}
