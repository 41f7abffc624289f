use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Feedback, FeedbackStatus};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitFeedbackRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateFeedbackRequest {
    pub status: Option<FeedbackStatus>,
    #[serde(alias = "adminReply")]
    pub admin_reply: Option<String>,
    #[serde(default, alias = "deleteReply")]
    pub delete_reply: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackList {
    pub items: Vec<Feedback>,
}
