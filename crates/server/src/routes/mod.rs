use axum::{extract::Path, http::StatusCode, response::Json};
use serde_json::{json, Value};

use shared::{seeded_issues, Issue, IssuesResponse};

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// The seeded issue list
pub async fn list_issues() -> Json<IssuesResponse> {
    let issues = seeded_issues();
    tracing::debug!("Serving {} issues", issues.len());
    Json(IssuesResponse {
        issues,
        status: StatusCode::OK.as_u16(),
    })
}

/// One issue by id
pub async fn get_issue(Path(id): Path<String>) -> Result<Json<Issue>, StatusCode> {
    seeded_issues()
        .into_iter()
        .find(|issue| issue.id.to_string() == id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
