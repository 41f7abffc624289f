use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::contact::ContactRequest, error::AppResult, response::ApiResponse,
    services::contact_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(send_contact))
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message delivered to the shop"),
        (status = 400, description = "Name, email, and message are required"),
        (status = 502, description = "Notification email failed"),
    ),
    tag = "Contact"
)]
pub async fn send_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = contact_service::send_contact(&state, payload).await?;
    Ok(Json(resp))
}
