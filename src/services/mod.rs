use crate::{
    error::AppResult,
    media::{ResourceType, UploadFile, UploadedMedia},
    state::AppState,
};

pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod contact_service;
pub mod feedback_service;
pub mod order_service;
pub mod showcase_service;

/// Upload `file` when one was sent and return its public URL.
pub(crate) async fn upload_optional(
    state: &AppState,
    file: Option<UploadFile>,
    resource_type: ResourceType,
) -> AppResult<Option<String>> {
    Ok(upload_media(state, file, resource_type)
        .await?
        .map(|media| media.secure_url))
}

pub(crate) async fn upload_media(
    state: &AppState,
    file: Option<UploadFile>,
    resource_type: ResourceType,
) -> AppResult<Option<UploadedMedia>> {
    match file {
        Some(file) => Ok(Some(state.media.upload(file, resource_type).await?)),
        None => Ok(None),
    }
}
