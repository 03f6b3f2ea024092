//! Axum route handlers for the Documents API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::documents::analysis::{
    analyze_cover_letter, analyze_job_requirements, analyze_resume_match, CoverLetterQuality,
    RequirementsAnalysis, ResumeMatch,
};
use crate::documents::cover_letter::{
    alternative_tone, generate_cover_letter, CoverLetterInput, CoverLetterOutput,
};
use crate::documents::pdf::{render_pdf, sanitize_filename};
use crate::documents::portfolio::{generate_portfolio, PortfolioOutput, PortfolioRequestOptions};
use crate::documents::resume::{
    evaluate_quality, generate_resume, optimize_resume, resolve_style, ResumeOutput,
    ResumeQualityReport,
};
use crate::errors::{require_non_empty, AppError};
use crate::models::document::GeneratedDocument;
use crate::models::profile::UserProfile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResumeRequest {
    pub profile: UserProfile,
    pub style: Option<String>,
    pub job_description: Option<String>,
    #[serde(default)]
    pub enhancements: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub resume: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct QualityRequest {
    pub resume: String,
    pub job_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub profile: UserProfile,
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub job_description: String,
    pub tone: Option<String>,
    pub length: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlternativeCoverLetterRequest {
    #[serde(flatten)]
    pub letter: CoverLetterRequest,
    pub alternative_tone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResumeMatchRequest {
    pub resume: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct RequirementsRequest {
    #[serde(default)]
    pub profile: UserProfile,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct LetterQualityRequest {
    pub cover_letter: String,
    #[serde(default)]
    pub job_description: String,
    pub company: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioRequest {
    pub profile: UserProfile,
    pub layout: Option<String>,
    pub color_scheme: Option<String>,
    #[serde(default = "default_true")]
    pub include_projects: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct PdfRequest {
    pub content: String,
    pub title: Option<String>,
    pub file_name: Option<String>,
}

fn require_name(profile: &UserProfile) -> Result<(), AppError> {
    if !profile.has_required_fields() {
        return Err(AppError::Validation("profile.name is required".to_string()));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/documents/resume
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Json(request): Json<ResumeRequest>,
) -> Result<Json<ResumeOutput>, AppError> {
    require_name(&request.profile)?;
    let profile = request.profile.normalized();
    let style = resolve_style(request.style.as_deref());

    let output = generate_resume(
        &state.llm,
        &profile,
        style,
        request.job_description.as_deref(),
        &request.enhancements,
    )
    .await?;
    Ok(Json(output))
}

/// POST /api/v1/documents/resume/optimize
pub async fn handle_optimize_resume(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<GeneratedDocument>, AppError> {
    require_non_empty(&request.resume, "resume")?;
    require_non_empty(&request.job_description, "job_description")?;

    let document = optimize_resume(&state.llm, &request.resume, &request.job_description).await?;
    Ok(Json(document))
}

/// POST /api/v1/documents/resume/quality
pub async fn handle_resume_quality(
    State(state): State<AppState>,
    Json(request): Json<QualityRequest>,
) -> Result<Json<ResumeQualityReport>, AppError> {
    require_non_empty(&request.resume, "resume")?;

    let report = evaluate_quality(&state.llm, &request.resume, request.job_description.as_deref()).await;
    Ok(Json(report))
}

/// POST /api/v1/documents/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterOutput>, AppError> {
    let tone = request.tone.clone();
    write_cover_letter(&state, request, tone.as_deref()).await
}

/// POST /api/v1/documents/cover-letter/alternative
///
/// Same letter in another tone; see `alternative_tone`.
pub async fn handle_alternative_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<AlternativeCoverLetterRequest>,
) -> Result<Json<CoverLetterOutput>, AppError> {
    let tone = alternative_tone(
        request.letter.tone.as_deref(),
        request.alternative_tone.as_deref(),
    );
    write_cover_letter(&state, request.letter, Some(tone)).await
}

async fn write_cover_letter(
    state: &AppState,
    request: CoverLetterRequest,
    tone: Option<&str>,
) -> Result<Json<CoverLetterOutput>, AppError> {
    require_name(&request.profile)?;
    require_non_empty(&request.company, "company")?;
    let profile = request.profile.normalized();

    let output = generate_cover_letter(
        &state.llm,
        CoverLetterInput {
            profile: &profile,
            company: &request.company,
            position: &request.position,
            job_description: &request.job_description,
            tone,
            length: request.length.as_deref(),
        },
    )
    .await?;
    Ok(Json(output))
}

/// POST /api/v1/documents/cover-letter/quality
pub async fn handle_cover_letter_quality(
    State(state): State<AppState>,
    Json(request): Json<LetterQualityRequest>,
) -> Result<Json<CoverLetterQuality>, AppError> {
    require_non_empty(&request.cover_letter, "cover_letter")?;

    let quality = analyze_cover_letter(
        &state.llm,
        &request.cover_letter,
        &request.job_description,
        request.company.as_deref(),
    )
    .await?;
    Ok(Json(quality))
}

/// POST /api/v1/documents/resume/match
pub async fn handle_resume_match(
    State(state): State<AppState>,
    Json(request): Json<ResumeMatchRequest>,
) -> Result<Json<ResumeMatch>, AppError> {
    require_non_empty(&request.resume, "resume")?;
    require_non_empty(&request.job_description, "job_description")?;

    let result = analyze_resume_match(&state.llm, &request.resume, &request.job_description).await?;
    Ok(Json(result))
}

/// POST /api/v1/documents/job-requirements
pub async fn handle_job_requirements(
    State(state): State<AppState>,
    Json(request): Json<RequirementsRequest>,
) -> Result<Json<RequirementsAnalysis>, AppError> {
    require_non_empty(&request.job_description, "job_description")?;
    let profile = request.profile.normalized();

    let analysis = analyze_job_requirements(&state.llm, &profile, &request.job_description).await?;
    Ok(Json(analysis))
}

/// POST /api/v1/documents/portfolio
pub async fn handle_portfolio(
    State(state): State<AppState>,
    Json(request): Json<PortfolioRequest>,
) -> Result<Json<PortfolioOutput>, AppError> {
    require_name(&request.profile)?;
    let profile = request.profile.normalized();

    let output = generate_portfolio(
        &state.llm,
        &profile,
        PortfolioRequestOptions {
            layout: request.layout.as_deref(),
            color_scheme: request.color_scheme.as_deref(),
            include_projects: request.include_projects,
        },
    )
    .await?;
    Ok(Json(output))
}

/// POST /api/v1/documents/pdf
///
/// Renders a text document to PDF. PDF assembly is CPU-bound and runs on the
/// blocking pool.
pub async fn handle_pdf(Json(request): Json<PdfRequest>) -> Result<Response, AppError> {
    require_non_empty(&request.content, "content")?;

    let title = request.title.unwrap_or_else(|| "Document".to_string());
    let file_name = sanitize_filename(request.file_name.as_deref().unwrap_or(&title));
    let content = request.content;

    let bytes = tokio::task::spawn_blocking(move || render_pdf(&title, &content))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF task failed: {e}")))??;
    info!("Rendered {file_name}.pdf ({} bytes)", bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}.pdf\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
