use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HealthQuery {
    #[serde(default)]
    pub deep: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    /// Only present for `?deep=true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_reachable: Option<bool>,
}

/// GET /health
/// Returns service status; `?deep=true` also pings the LLM provider.
pub async fn health_handler(
    State(state): State<AppState>,
    Query(query): Query<HealthQuery>,
) -> Json<HealthResponse> {
    let llm_reachable = if query.deep {
        Some(state.llm.health_check().await)
    } else {
        None
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        service: "careerforge-api",
        llm_reachable,
    })
}
