use axum::Router;

use crate::{models::ShowcaseKind, state::AppState};

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod contact;
pub mod doc;
pub mod feedback;
pub mod health;
pub mod orders;
pub mod params;
pub mod showcases;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/catalog", catalog::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::route())
        .nest("/feedback", feedback::router())
        .nest("/contact", contact::router())
        .nest("/video-stories", showcases::router(ShowcaseKind::VideoStory))
        .nest("/watch-and-buy", showcases::router(ShowcaseKind::WatchAndBuy))
}
