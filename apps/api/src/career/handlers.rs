//! Axum route handlers for the Career API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::career::planning::{
    career_potential, career_strategy, learning_path, resolve_horizon, CareerPotential,
};
use crate::errors::AppError;
use crate::models::profile::UserProfile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StrategyRequest {
    pub profile: UserProfile,
    #[serde(default)]
    pub goals: Vec<String>,
    pub time_horizon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StrategyResponse {
    pub time_horizon: &'static str,
    pub strategy: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub profile: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct LearningPathResponse {
    pub learning_path: String,
}

/// Planning needs something to plan from.
fn require_background(profile: &UserProfile) -> Result<(), AppError> {
    if profile.title.trim().is_empty() && profile.skills.is_empty() {
        return Err(AppError::Validation(
            "profile.title or profile.skills is required".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/v1/career/strategy
pub async fn handle_strategy(
    State(state): State<AppState>,
    Json(request): Json<StrategyRequest>,
) -> Result<Json<StrategyResponse>, AppError> {
    let profile = request.profile.normalized();
    require_background(&profile)?;
    let time_horizon = resolve_horizon(request.time_horizon.as_deref());

    let strategy = career_strategy(&state.llm, &profile, &request.goals, time_horizon).await?;
    Ok(Json(StrategyResponse {
        time_horizon,
        strategy,
    }))
}

/// POST /api/v1/career/potential
pub async fn handle_potential(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<CareerPotential>, AppError> {
    let profile = request.profile.normalized();
    require_background(&profile)?;
    Ok(Json(career_potential(&state.llm, &profile).await?))
}

/// POST /api/v1/career/learning-path
pub async fn handle_learning_path(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<LearningPathResponse>, AppError> {
    let profile = request.profile.normalized();
    require_background(&profile)?;

    let path = learning_path(&state.llm, &profile).await?;
    Ok(Json(LearningPathResponse {
        learning_path: path,
    }))
}
