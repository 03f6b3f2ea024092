use serde::{Deserialize, Serialize};
use tracing::info;

use crate::career::prompts::{
    LEARNING_PROMPT, LEARNING_SYSTEM, POTENTIAL_PROMPT, POTENTIAL_SYSTEM, STRATEGY_PROMPT,
    STRATEGY_SYSTEM,
};
use crate::llm_client::prompts::{candidate_block, fill_template, JSON_ONLY_SUFFIX};
use crate::llm_client::scores::percent;
use crate::llm_client::{CompletionOptions, LlmClient, LlmError};
use crate::models::profile::UserProfile;

const STRATEGY_OPTIONS: CompletionOptions = CompletionOptions::new(2000, 0.6);
const POTENTIAL_OPTIONS: CompletionOptions = CompletionOptions::new(1000, 0.5);
const LEARNING_OPTIONS: CompletionOptions = CompletionOptions::new(1500, 0.6);

pub const TIME_HORIZONS: &[&str] = &["6 months", "1 year", "2 years", "3-5 years"];
const DEFAULT_HORIZON: &str = "1 year";
const DEFAULT_GOAL: &str = "Advance in my current field";

/// Unknown horizons fall back to one year.
pub fn resolve_horizon(label: Option<&str>) -> &'static str {
    label
        .and_then(|l| TIME_HORIZONS.iter().find(|h| h.eq_ignore_ascii_case(l.trim())))
        .copied()
        .unwrap_or(DEFAULT_HORIZON)
}

/// Roadmap toward `goals` within `horizon`.
pub async fn career_strategy(
    llm: &LlmClient,
    profile: &UserProfile,
    goals: &[String],
    horizon: &str,
) -> Result<String, LlmError> {
    let goals: Vec<&str> = goals
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect();
    let goals = if goals.is_empty() {
        DEFAULT_GOAL.to_string()
    } else {
        goals.join(", ")
    };

    let prompt = fill_template(
        STRATEGY_PROMPT,
        &[
            ("candidate", &candidate_block(profile, None)),
            ("goals", &goals),
            ("horizon", horizon),
        ],
    );
    let strategy = llm.chat(STRATEGY_SYSTEM, &prompt, STRATEGY_OPTIONS).await?;
    info!("Career strategy over {horizon} ({} chars)", strategy.len());
    Ok(strategy)
}

/// Market outlook for the candidate's role. Scores are 0–100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareerPotential {
    #[serde(deserialize_with = "percent")]
    pub market_demand: u8,
    #[serde(deserialize_with = "percent")]
    pub salary_growth: u8,
    #[serde(deserialize_with = "percent")]
    pub skill_relevance: u8,
    #[serde(default)]
    pub growth_areas: Vec<String>,
    #[serde(default)]
    pub market_trends: Vec<String>,
}

/// No local fallback: the scores only mean something when the model gives them.
pub async fn career_potential(
    llm: &LlmClient,
    profile: &UserProfile,
) -> Result<CareerPotential, LlmError> {
    let prompt = fill_template(
        POTENTIAL_PROMPT,
        &[("candidate", &candidate_block(profile, None))],
    );
    let system = format!("{POTENTIAL_SYSTEM}{JSON_ONLY_SUFFIX}");
    let mut potential: CareerPotential = llm.chat_json(&system, &prompt, POTENTIAL_OPTIONS).await?;
    for list in [&mut potential.growth_areas, &mut potential.market_trends] {
        list.retain(|item| !item.trim().is_empty());
    }
    Ok(potential)
}

pub async fn learning_path(llm: &LlmClient, profile: &UserProfile) -> Result<String, LlmError> {
    let prompt = fill_template(
        LEARNING_PROMPT,
        &[("candidate", &candidate_block(profile, None))],
    );
    llm.chat(LEARNING_SYSTEM, &prompt, LEARNING_OPTIONS).await
}
