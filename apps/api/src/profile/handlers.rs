//! Axum route handlers for the Profile API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::{require_non_empty, AppError};
use crate::models::profile::UserProfile;
use crate::profile::linkedin::{extract_linkedin, validate_linkedin_url, LinkedInProfile};
use crate::profile::parser::{parse_profile, ParserKind};
use crate::profile::strength::{profile_strength, ProfileStrengthReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkedInRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub parser: ParserKind,
    pub strength: ProfileStrengthReport,
    pub text_length: usize,
}

async fn parse_and_score(state: &AppState, text: &str) -> ProfileResponse {
    let parsed = parse_profile(text, &state.llm).await;
    let strength = profile_strength(&parsed.profile);
    ProfileResponse {
        profile: parsed.profile,
        parser: parsed.parser,
        strength,
        text_length: text.chars().count(),
    }
}

/// POST /api/v1/profile/upload
///
/// Multipart form with a `file` field (PDF, DOCX, JPG or PNG).
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;
        upload = Some((file_name, bytes));
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let text = state.extractor.extract_text(&file_name, &bytes).await?;
    Ok(Json(parse_and_score(&state, &text).await))
}

/// POST /api/v1/profile/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(request): Json<ParseRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    require_non_empty(&request.text, "text")?;
    Ok(Json(parse_and_score(&state, request.text.trim()).await))
}

/// POST /api/v1/profile/strength
pub async fn handle_strength(
    Json(profile): Json<UserProfile>,
) -> Json<ProfileStrengthReport> {
    Json(profile_strength(&profile.normalized()))
}

/// POST /api/v1/profile/linkedin
pub async fn handle_linkedin(
    State(state): State<AppState>,
    Json(request): Json<LinkedInRequest>,
) -> Result<Json<LinkedInProfile>, AppError> {
    let url = validate_linkedin_url(&request.url)?;
    let profile = extract_linkedin(&state.http, &url).await?;
    Ok(Json(profile))
}
