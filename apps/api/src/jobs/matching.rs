//! Job matching: a pluggable, trait-based matcher comparing a profile with a listing.
//!
//! Default: `KeywordJobMatcher` (deterministic skill overlap, no network).
//! `LlmJobMatcher` adds an AI analysis on top of the keyword report.
//!
//! `AppState` holds an `Arc<dyn JobMatcher>`, chosen at startup via config.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::jobs::prompts::{JOB_MATCH_PROMPT, JOB_MATCH_SYSTEM};
use crate::llm_client::prompts::{candidate_block, fill_template, or_placeholder, JSON_ONLY_SUFFIX};
use crate::llm_client::{CompletionOptions, LlmClient};
use crate::models::job::{JobListing, MatchAnalysis};
use crate::models::profile::UserProfile;
use crate::profile::parser::match_vocabulary;

const MATCH_OPTIONS: CompletionOptions = CompletionOptions::new(200, 0.3);

/// Description characters sent to the LLM per listing.
const DESCRIPTION_CAP: usize = 500;
const PROMPT_SKILL_CAP: usize = 8;

const LISTED_SKILL_STRENGTH: f32 = 1.0;
const MENTIONED_SKILL_STRENGTH: f32 = 0.6;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Skill overlap between a profile and one listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub score: u32, // 0 – 100
    pub strong_matches: Vec<String>,  // strength ≥ 0.8
    pub partial_matches: Vec<String>, // 0.4 – 0.79
    pub missing_skills: Vec<String>,  // strength < 0.4
}

/// Full match report for one listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatchReport {
    pub job_id: String,
    pub title: String,
    pub company: String,
    #[serde(flatten)]
    pub keyword: KeywordMatch,
    /// Absent when the matcher is keyword-only or the AI answer was unusable.
    pub analysis: Option<MatchAnalysis>,
    pub matcher_backend: String, // "keyword" | "llm"
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait JobMatcher: Send + Sync {
    async fn evaluate(
        &self,
        profile: &UserProfile,
        listing: &JobListing,
    ) -> Result<JobMatchReport, AppError>;
}

fn keyword_report(profile: &UserProfile, listing: &JobListing, backend: &str) -> JobMatchReport {
    JobMatchReport {
        job_id: listing.id.clone(),
        title: listing.title.clone(),
        company: listing.company.clone(),
        keyword: keyword_match(profile, listing),
        analysis: None,
        matcher_backend: backend.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordJobMatcher
// ────────────────────────────────────────────────────────────────────────────

pub struct KeywordJobMatcher;

#[async_trait]
impl JobMatcher for KeywordJobMatcher {
    async fn evaluate(
        &self,
        profile: &UserProfile,
        listing: &JobListing,
    ) -> Result<JobMatchReport, AppError> {
        Ok(keyword_report(profile, listing, "keyword"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmJobMatcher
// ────────────────────────────────────────────────────────────────────────────

/// Keyword report plus an LLM estimate of skills, experience and overall fit.
pub struct LlmJobMatcher(pub LlmClient);

#[async_trait]
impl JobMatcher for LlmJobMatcher {
    async fn evaluate(
        &self,
        profile: &UserProfile,
        listing: &JobListing,
    ) -> Result<JobMatchReport, AppError> {
        let mut report = keyword_report(profile, listing, "llm");

        let description: String = listing.description.chars().take(DESCRIPTION_CAP).collect();
        let prompt = fill_template(
            JOB_MATCH_PROMPT,
            &[
                ("title", &listing.title),
                ("company", &listing.company),
                ("job_skills", &listing.skills.join(", ")),
                ("description", or_placeholder(&description, "Not provided")),
                ("candidate", &candidate_block(profile, Some(PROMPT_SKILL_CAP))),
            ],
        );
        let system = format!("{JOB_MATCH_SYSTEM}{JSON_ONLY_SUFFIX}");

        match self
            .0
            .chat_json::<MatchAnalysis>(&system, &prompt, MATCH_OPTIONS)
            .await
        {
            Ok(analysis) => report.analysis = Some(clamp_analysis(analysis)),
            Err(e) if e.is_unusable_output() => {
                warn!("Unusable match analysis for '{}': {e}", listing.id);
            }
            Err(e) => return Err(e.into()),
        }
        Ok(report)
    }
}

fn clamp_analysis(analysis: MatchAnalysis) -> MatchAnalysis {
    MatchAnalysis {
        explanation: analysis.explanation.trim().to_string(),
        ..analysis
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core keyword algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Scores each profile skill against the listing:
/// - listed in the listing's skills → 1.0
/// - mentioned in title or description → 0.6
/// - otherwise → 0.0
///
/// The score is the mean strength × 100. A profile without skills scores 0.
pub fn keyword_match(profile: &UserProfile, listing: &JobListing) -> KeywordMatch {
    if profile.skills.is_empty() {
        return KeywordMatch::default();
    }

    let listing_text = format!("{} {}", listing.title, listing.description);
    let mut result = KeywordMatch::default();
    let mut total = 0.0_f32;

    for skill in &profile.skills {
        let listed = listing
            .skills
            .iter()
            .any(|s| s.eq_ignore_ascii_case(skill.trim()));
        let mentioned = !match_vocabulary(&listing_text, &[skill.trim()]).is_empty();

        let strength = if listed {
            LISTED_SKILL_STRENGTH
        } else if mentioned {
            MENTIONED_SKILL_STRENGTH
        } else {
            0.0
        };
        total += strength;

        if strength >= 0.8 {
            result.strong_matches.push(skill.clone());
        } else if strength >= 0.4 {
            result.partial_matches.push(skill.clone());
        } else {
            result.missing_skills.push(skill.clone());
        }
    }

    result.score = (total / profile.skills.len() as f32 * 100.0).round() as u32;
    result
}
