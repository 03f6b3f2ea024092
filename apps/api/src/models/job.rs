use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm_client::scores::percent;

/// AI explanation of how well a listing fits a candidate.
/// Percentages are read leniently (`85.5`, `"85%"`) and clamped to 0–100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchAnalysis {
    #[serde(deserialize_with = "percent")]
    pub skills_match: u8,
    #[serde(deserialize_with = "percent")]
    pub experience_match: u8,
    #[serde(deserialize_with = "percent")]
    pub overall_fit: u8,
    #[serde(default)]
    pub explanation: String,
}

/// A single job listing scraped from a job board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub salary_range: String,
    pub employment_type: String,
    /// Normalized relative label: "Today", "Yesterday", "N days ago", "30+ days ago", "Recently".
    pub posted_date: String,
    pub url: String,
    pub source: String,
    pub skills: Vec<String>,
    pub remote_type: Option<String>,
    pub scraped_at: DateTime<Utc>,
    /// Keyword match against the requesting profile, 0 – 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_analysis: Option<MatchAnalysis>,
}

impl JobListing {
    /// Key used to collapse the same posting seen on several boards.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}_{}",
            self.title.trim().to_lowercase(),
            self.company.trim().to_lowercase()
        )
    }
}
