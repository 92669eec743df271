use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::models::candidate::{CandidateRecord, Status};
use crate::state::AppState;

/// GET /admin
pub async fn dashboard() -> Html<&'static str> {
    Html(include_str!("admin.html"))
}

#[derive(Debug, Deserialize)]
pub struct ResumeListQuery {
    pub min_cgpa: Option<f64>,
}

/// GET /api/resumes?min_cgpa=8.0
pub async fn list_resumes(
    State(state): State<AppState>,
    Query(params): Query<ResumeListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let resumes: Vec<CandidateRecord> = match params.min_cgpa {
        Some(min) => state.store.filter_by_min_cgpa(min),
        None => state.store.list_all(),
    }
    .map_err(|e| AppError::Storage(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "count": resumes.len(),
        "resumes": resumes
    })))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub email: String,
    pub status: String,
}

/// POST /api/resumes/status
pub async fn update_status(
    State(state): State<AppState>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status: Status = req
        .status
        .parse()
        .map_err(AppError::Validation)?;

    let updated = state
        .store
        .set_status(&req.email, status)
        .map_err(|e| AppError::Storage(e.to_string()))?;

    Ok(Json(json!({ "success": updated })))
}

/// GET /api/export
/// Streams the whole store as a spreadsheet attachment.
pub async fn export_spreadsheet(State(state): State<AppState>) -> Result<Response, AppError> {
    let bytes = state
        .store
        .export()
        .map_err(|e| AppError::Storage(e.to_string()))?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let disposition = format!("attachment; filename=\"resumes_export_{timestamp}.csv\"");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
