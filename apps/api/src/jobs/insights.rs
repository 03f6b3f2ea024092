//! LLM-backed market context: company profiles and job-alert previews.
//!
//! Neither has a local fallback; an unusable answer surfaces as an LLM error.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::jobs::prompts::{
    ALERT_PREVIEW_PROMPT, ALERT_PREVIEW_SYSTEM, COMPANY_INSIGHTS_PROMPT, COMPANY_INSIGHTS_SYSTEM,
};
use crate::llm_client::prompts::{fill_template, or_placeholder, JSON_ONLY_SUFFIX};
use crate::llm_client::scores::{lenient_integer, lenient_number};
use crate::llm_client::{CompletionOptions, LlmClient, LlmError};
use crate::models::profile::UserProfile;

const COMPANY_OPTIONS: CompletionOptions = CompletionOptions::new(800, 0.3);
const ALERT_OPTIONS: CompletionOptions = CompletionOptions::new(800, 0.6);

const PREVIEW_SKILL_CAP: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompanyInsights {
    pub company_name: String,
    pub industry: String,
    pub size: String,
    #[serde(deserialize_with = "lenient_integer")]
    pub founded_year: Option<i64>,
    pub location: String,
    pub culture: Vec<String>,
    pub benefits: Vec<String>,
    pub tech_stack: Vec<String>,
    pub growth_stage: String,
    /// 0 – 5
    #[serde(deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    pub notable_for: String,
}

impl CompanyInsights {
    /// Drops an implausible founding year and clamps the rating to 0–5.
    fn sanitized(mut self, company: &str) -> Self {
        self.company_name = company.trim().to_string();
        let this_year = i64::from(Utc::now().year());
        self.founded_year = self.founded_year.filter(|y| (1600..=this_year).contains(y));
        self.rating = self.rating.map(|r| (r.clamp(0.0, 5.0) * 10.0).round() / 10.0);
        for list in [&mut self.culture, &mut self.benefits, &mut self.tech_stack] {
            list.retain(|item| !item.trim().is_empty());
        }
        self
    }
}

pub async fn company_insights(llm: &LlmClient, company: &str) -> Result<CompanyInsights, LlmError> {
    let prompt = fill_template(COMPANY_INSIGHTS_PROMPT, &[("company", company.trim())]);
    let system = format!("{COMPANY_INSIGHTS_SYSTEM}{JSON_ONLY_SUFFIX}");

    let insights: CompanyInsights = llm.chat_json(&system, &prompt, COMPANY_OPTIONS).await?;
    info!("Company insights for '{}'", company.trim());
    Ok(insights.sanitized(company))
}

/// Narrative preview of what a saved search would surface.
pub async fn alert_preview(
    llm: &LlmClient,
    keywords: &str,
    location: &str,
    profile: &UserProfile,
) -> Result<String, LlmError> {
    let skill_count = profile.skills.len().to_string();
    let skills: Vec<&str> = profile
        .skills
        .iter()
        .map(String::as_str)
        .take(PREVIEW_SKILL_CAP)
        .collect();
    let skills = skills.join(", ");

    let prompt = fill_template(
        ALERT_PREVIEW_PROMPT,
        &[
            ("keywords", keywords.trim()),
            ("location", or_placeholder(location, "Any")),
            ("title", or_placeholder(&profile.title, "Professional")),
            ("skill_count", &skill_count),
            ("skills", or_placeholder(&skills, "none listed")),
        ],
    );
    llm.chat(ALERT_PREVIEW_SYSTEM, &prompt, ALERT_OPTIONS).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::FixedBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_company_insights_are_sanitized() {
        let llm = FixedBackend::client([
            r#"{"company_name": "ACME Corp", "industry": "Robotics", "founded_year": "1999",
                "culture": ["Ownership", " "], "rating": 7.25}"#,
        ]);
        let insights = company_insights(&llm, " Acme ").await.unwrap();
        assert_eq!(insights.company_name, "Acme");
        assert_eq!(insights.industry, "Robotics");
        assert_eq!(insights.founded_year, Some(1999));
        assert_eq!(insights.culture, vec!["Ownership"]);
        assert_eq!(insights.rating, Some(5.0));
        assert!(insights.benefits.is_empty());
    }

    #[tokio::test]
    async fn test_company_insights_drop_future_year() {
        let llm = FixedBackend::client([r#"{"founded_year": 3020, "rating": 4.24}"#]);
        let insights = company_insights(&llm, "Acme").await.unwrap();
        assert_eq!(insights.founded_year, None);
        assert_eq!(insights.rating, Some(4.2));
    }

    #[tokio::test]
    async fn test_company_insights_prose_is_an_error() {
        let llm = FixedBackend::client(["Acme is a great place to work."]);
        let err = company_insights(&llm, "Acme").await.unwrap_err();
        assert!(err.is_unusable_output());
    }

    #[tokio::test]
    async fn test_alert_preview_prompt() {
        let backend = Arc::new(FixedBackend::new(["Expect 5-10 new roles a week."]));
        let llm = LlmClient::new(backend.clone());
        let profile = UserProfile {
            title: "Data Engineer".into(),
            skills: vec!["SQL".into(), "Spark".into()],
            ..Default::default()
        };
        let preview = alert_preview(&llm, "data engineer", "", &profile).await.unwrap();
        assert_eq!(preview, "Expect 5-10 new roles a week.");

        let calls = backend.calls();
        let prompt = &calls[0][1].content;
        assert!(prompt.contains("Location: Any"));
        assert!(prompt.contains("Data Engineer with 2 skills (SQL, Spark)"));
    }
}
