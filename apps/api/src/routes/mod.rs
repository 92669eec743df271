pub mod admin;
pub mod health;

use axum::{
    response::Html,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::webhook;

async fn home() -> Html<&'static str> {
    Html(include_str!("home.html"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health::health_handler))
        // Submission webhook
        .route("/webhook/whatsapp", post(webhook::whatsapp_handler))
        // Admin surface
        .route("/admin", get(admin::dashboard))
        .route("/api/resumes", get(admin::list_resumes))
        .route("/api/resumes/status", post(admin::update_status))
        .route("/api/export", get(admin::export_spreadsheet))
        .with_state(state)
}
