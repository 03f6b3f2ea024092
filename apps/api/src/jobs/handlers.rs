//! Axum route handlers for the Jobs API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{require_non_empty, AppError};
use crate::jobs::aggregator::{aggregate_search, SearchFilters, SearchOutcome};
use crate::jobs::matching::JobMatchReport;
use crate::jobs::insights::{alert_preview, company_insights, CompanyInsights};
use crate::jobs::salary::{format_salary_in_inr, salary_benchmark, SalaryBenchmark};
use crate::jobs::sources::JobQuery;
use crate::models::job::JobListing;
use crate::models::profile::UserProfile;
use crate::state::AppState;

pub const MAX_LIMIT: usize = 50;
const DEFAULT_LIMIT: usize = 20;

pub const TRENDING_KEYWORDS: &[&str] = &[
    "AI Engineer",
    "Machine Learning",
    "Cloud Engineer",
    "DevOps",
    "Full Stack Developer",
    "Data Scientist",
    "Cybersecurity",
    "Blockchain Developer",
    "Mobile Developer",
    "Product Manager",
];

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub keywords: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub filters: SearchFilters,
    /// Ranks results by skill overlap when present.
    pub profile: Option<UserProfile>,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub profile: UserProfile,
    pub jobs: Vec<JobListing>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub matches: Vec<JobMatchReport>,
}

#[derive(Debug, Deserialize)]
pub struct SalaryRequest {
    pub salary: String,
}

#[derive(Debug, Serialize)]
pub struct SalaryResponse {
    pub original: String,
    pub inr: String,
    pub rate: f64,
}

#[derive(Debug, Deserialize)]
pub struct SalaryInsightsRequest {
    pub job_title: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct SalaryInsightsResponse {
    #[serde(flatten)]
    pub benchmark: SalaryBenchmark,
    /// The min – max range in rupees.
    pub inr_range: String,
}

#[derive(Debug, Deserialize)]
pub struct CompanyRequest {
    pub company: String,
}

#[derive(Debug, Deserialize)]
pub struct AlertPreviewRequest {
    pub keywords: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub profile: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct AlertPreviewResponse {
    pub preview: String,
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub keywords: Vec<&'static str>,
}

fn validate_limit(limit: usize, field: &str) -> Result<(), AppError> {
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "{field} must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/search
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchOutcome>, AppError> {
    require_non_empty(&request.keywords, "keywords")?;
    validate_limit(request.limit, "limit")?;

    let query = JobQuery {
        keywords: request.keywords.trim().to_string(),
        location: request.location.trim().to_string(),
        limit: request.limit,
    };
    let profile = request.profile.map(UserProfile::normalized);

    let outcome = aggregate_search(&state.job_sources, &query, &request.filters, profile.as_ref()).await;
    info!(
        "Job search '{}' returned {} of {} listings",
        query.keywords,
        outcome.jobs.len(),
        outcome.total_found
    );
    Ok(Json(outcome))
}

/// POST /api/v1/jobs/match
///
/// Listings are evaluated one after another; a transport failure aborts the batch.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    validate_limit(request.jobs.len(), "jobs count")?;
    let profile = request.profile.normalized();

    let mut matches = Vec::with_capacity(request.jobs.len());
    for listing in &request.jobs {
        matches.push(state.matcher.evaluate(&profile, listing).await?);
    }
    Ok(Json(MatchResponse { matches }))
}

/// GET /api/v1/jobs/trending
pub async fn handle_trending() -> Json<TrendingResponse> {
    Json(TrendingResponse {
        keywords: TRENDING_KEYWORDS.to_vec(),
    })
}

/// POST /api/v1/jobs/salary
pub async fn handle_salary(
    State(state): State<AppState>,
    Json(request): Json<SalaryRequest>,
) -> Json<SalaryResponse> {
    let rate = state.config.usd_to_inr_rate;
    Json(SalaryResponse {
        inr: format_salary_in_inr(&request.salary, rate),
        original: request.salary,
        rate,
    })
}

/// POST /api/v1/jobs/salary/insights
pub async fn handle_salary_insights(
    State(state): State<AppState>,
    Json(request): Json<SalaryInsightsRequest>,
) -> Result<Json<SalaryInsightsResponse>, AppError> {
    require_non_empty(&request.job_title, "job_title")?;

    let benchmark = salary_benchmark(&request.job_title, &request.location);
    let inr_range = format_salary_in_inr(
        &format!("${} - ${}", benchmark.min_salary, benchmark.max_salary),
        state.config.usd_to_inr_rate,
    );
    Ok(Json(SalaryInsightsResponse {
        benchmark,
        inr_range,
    }))
}

/// POST /api/v1/jobs/company
pub async fn handle_company_insights(
    State(state): State<AppState>,
    Json(request): Json<CompanyRequest>,
) -> Result<Json<CompanyInsights>, AppError> {
    require_non_empty(&request.company, "company")?;
    Ok(Json(company_insights(&state.llm, &request.company).await?))
}

/// POST /api/v1/jobs/alerts/preview
pub async fn handle_alert_preview(
    State(state): State<AppState>,
    Json(request): Json<AlertPreviewRequest>,
) -> Result<Json<AlertPreviewResponse>, AppError> {
    require_non_empty(&request.keywords, "keywords")?;
    let profile = request.profile.normalized();

    let preview = alert_preview(&state.llm, &request.keywords, &request.location, &profile).await?;
    Ok(Json(AlertPreviewResponse { preview }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_limit_bounds() {
        assert!(validate_limit(1, "limit").is_ok());
        assert!(validate_limit(MAX_LIMIT, "limit").is_ok());
        assert!(validate_limit(0, "limit").is_err());
        assert!(validate_limit(MAX_LIMIT + 1, "limit").is_err());
    }

    #[test]
    fn test_search_request_defaults() {
        let request: SearchRequest = serde_json::from_str(r#"{"keywords": "rust"}"#).unwrap();
        assert_eq!(request.limit, DEFAULT_LIMIT);
        assert!(request.location.is_empty());
        assert!(!request.filters.remote_only);
        assert!(request.profile.is_none());
    }
}
