use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::feedback::{FeedbackList, SubmitFeedbackRequest, UpdateFeedbackRequest},
    entity::{Feedback as FeedbackEntity, feedback},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Feedback, FeedbackStatus},
    response::{ApiResponse, Meta},
    routes::params::PageQuery,
    state::AppState,
};

/// Resulting reply and status. Applied in order: explicit status, then a
/// reply (marks `replied`), then `delete_reply` (clears and resets to `pending`).
pub fn apply_update(
    reply: String,
    status: FeedbackStatus,
    update: &UpdateFeedbackRequest,
) -> (String, FeedbackStatus) {
    let (mut reply, mut status) = (reply, update.status.unwrap_or(status));
    if let Some(admin_reply) = &update.admin_reply {
        reply = admin_reply.clone();
        status = FeedbackStatus::Replied;
    }
    if update.delete_reply {
        reply = String::new();
        status = FeedbackStatus::Pending;
    }
    (reply, status)
}

pub async fn submit(
    state: &AppState,
    payload: SubmitFeedbackRequest,
) -> AppResult<ApiResponse<Feedback>> {
    let name = payload.name.trim();
    let email = payload.email.trim();
    let message = payload.message.trim();
    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(AppError::BadRequest("All fields required".into()));
    }

    let duplicate = FeedbackEntity::find()
        .filter(feedback::Column::Email.eq(email))
        .filter(feedback::Column::Message.eq(message))
        .count(&state.orm)
        .await?;
    if duplicate > 0 {
        return Err(AppError::Conflict(
            "You have already submitted this exact feedback.".into(),
        ));
    }

    let now = Utc::now();
    let feedback = feedback::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        message: Set(message.to_string()),
        admin_reply: Set(String::new()),
        status: Set(FeedbackStatus::Pending),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(feedback_id = %feedback.id, "feedback submitted");
    Ok(ApiResponse::ok("Feedback submitted", feedback.into()))
}

pub async fn list_public(state: &AppState) -> AppResult<ApiResponse<FeedbackList>> {
    let items = FeedbackEntity::find()
        .order_by_desc(feedback::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Feedback::from)
        .collect();
    Ok(ApiResponse::ok("Feedback", FeedbackList { items }))
}

pub async fn list_all(
    state: &AppState,
    user: &AuthUser,
    query: PageQuery,
) -> AppResult<ApiResponse<FeedbackList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();
    let finder = FeedbackEntity::find().order_by_desc(feedback::Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Feedback::from)
        .collect();
    Ok(ApiResponse::success(
        "Feedback",
        FeedbackList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn update(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateFeedbackRequest,
) -> AppResult<ApiResponse<Feedback>> {
    ensure_admin(user)?;
    let existing = FeedbackEntity::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Feedback"))?;

    let (reply, status) = apply_update(existing.admin_reply.clone(), existing.status, &payload);
    let mut active: feedback::ActiveModel = existing.into();
    active.admin_reply = Set(reply);
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let feedback = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "feedback_update",
        "feedback",
        serde_json::json!({ "feedback_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::ok("Feedback updated", feedback.into()))
}

pub async fn delete(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = FeedbackEntity::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Feedback"));
    }

    audit::record(
        &state.pool,
        user.user_id,
        "feedback_delete",
        "feedback",
        serde_json::json!({ "feedback_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_marks_feedback_replied() {
        let update = UpdateFeedbackRequest {
            admin_reply: Some("Thanks, fixed!".into()),
            ..Default::default()
        };
        let (reply, status) = apply_update(String::new(), FeedbackStatus::Pending, &update);
        assert_eq!(reply, "Thanks, fixed!");
        assert_eq!(status, FeedbackStatus::Replied);
    }

    #[test]
    fn delete_reply_wins_over_everything() {
        let update = UpdateFeedbackRequest {
            status: Some(FeedbackStatus::Reviewed),
            admin_reply: Some("ignored".into()),
            delete_reply: true,
        };
        let (reply, status) =
            apply_update("old reply".into(), FeedbackStatus::Replied, &update);
        assert!(reply.is_empty());
        assert_eq!(status, FeedbackStatus::Pending);
    }

    #[test]
    fn status_alone_keeps_the_reply() {
        let update = UpdateFeedbackRequest {
            status: Some(FeedbackStatus::Reviewed),
            ..Default::default()
        };
        let (reply, status) = apply_update("kept".into(), FeedbackStatus::Replied, &update);
        assert_eq!(reply, "kept");
        assert_eq!(status, FeedbackStatus::Reviewed);
    }
}
