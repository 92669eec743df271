use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and stored count.
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let count = state
        .store
        .list_all()
        .map_err(|e| AppError::Storage(e.to_string()))?
        .len();

    Ok(Json(json!({
        "status": "healthy",
        "service": "resume-intake",
        "version": env!("CARGO_PKG_VERSION"),
        "resumes_count": count
    })))
}
