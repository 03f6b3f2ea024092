//! Fit analysis against a job description: resume match, job requirements and
//! cover-letter quality.
//!
//! Each analysis has a keyword baseline computed locally. A usable LLM answer
//! overrides the baseline field by field; unusable output returns the baseline
//! with `ai_generated: false`. Transport failures propagate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::documents::impact::validate_impact;
use crate::documents::prompts::{
    COVER_LETTER_QUALITY_PROMPT, COVER_LETTER_QUALITY_SYSTEM, JOB_REQUIREMENTS_PROMPT,
    JOB_REQUIREMENTS_SYSTEM, RESUME_MATCH_PROMPT, RESUME_MATCH_SYSTEM,
};
use crate::documents::resume::{heuristic_quality, jd_keywords};
use crate::llm_client::prompts::{candidate_block, fill_template, or_placeholder, JSON_ONLY_SUFFIX};
use crate::llm_client::scores::{clamp_percent, lenient_number};
use crate::llm_client::{CompletionOptions, LlmClient, LlmError};
use crate::models::profile::UserProfile;
use crate::profile::parser::{match_vocabulary, SKILL_VOCABULARY};

const RESUME_MATCH_OPTIONS: CompletionOptions = CompletionOptions::new(1000, 0.4);
const REQUIREMENTS_OPTIONS: CompletionOptions = CompletionOptions::new(1000, 0.5);
const LETTER_QUALITY_OPTIONS: CompletionOptions = CompletionOptions::new(1000, 0.5);

const MAX_MISSING_KEYWORDS: usize = 10;

/// Stock phrases that make a cover letter read as a template.
const CLICHES: &[&str] = &[
    "to whom it may concern",
    "i am writing to apply",
    "i am writing to express",
    "hard worker",
    "team player",
    "think outside the box",
    "go-getter",
    "perfect fit",
];

fn coverage(found: usize, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        clamp_percent(found as f64 * 100.0 / total as f64)
    }
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// The model's list when it gave one, otherwise the baseline's.
fn prefer(model: Vec<String>, baseline: Vec<String>) -> Vec<String> {
    let model = non_blank(model);
    if model.is_empty() {
        baseline
    } else {
        model
    }
}

fn count(n: Option<f64>) -> Option<u32> {
    n.map(|n| n.round().max(0.0) as u32)
}

// ────────────────────────────────────────────────────────────────────────────
// Resume ↔ job description
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResumeMatch {
    pub match_percentage: u8,
    pub keyword_matches: u32,
    pub ats_score: u8,
    pub suggestions: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub ai_generated: bool,
}

#[derive(Debug, Deserialize)]
struct LlmResumeMatch {
    #[serde(default, deserialize_with = "lenient_number")]
    match_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    keyword_matches: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    ats_score: Option<f64>,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    missing_keywords: Vec<String>,
}

/// Keyword coverage of the job description plus the local ATS checks.
pub fn resume_match_baseline(resume: &str, job_description: &str) -> ResumeMatch {
    let lower = resume.to_lowercase();
    let keywords = jd_keywords(job_description);
    let (found, missing): (Vec<String>, Vec<String>) = keywords
        .into_iter()
        .partition(|k| lower.contains(k.as_str()));
    let quality = heuristic_quality(resume, Some(job_description));

    ResumeMatch {
        match_percentage: coverage(found.len(), found.len() + missing.len()),
        keyword_matches: found.len() as u32,
        ats_score: clamp_percent(f64::from(quality.heuristic_score)),
        suggestions: quality.suggestions,
        missing_keywords: missing.into_iter().take(MAX_MISSING_KEYWORDS).collect(),
        ai_generated: false,
    }
}

pub async fn analyze_resume_match(
    llm: &LlmClient,
    resume: &str,
    job_description: &str,
) -> Result<ResumeMatch, LlmError> {
    let baseline = resume_match_baseline(resume, job_description);
    let prompt = fill_template(
        RESUME_MATCH_PROMPT,
        &[
            ("resume", resume.trim()),
            ("job_description", job_description.trim()),
        ],
    );
    let system = format!("{RESUME_MATCH_SYSTEM}{JSON_ONLY_SUFFIX}");

    match llm
        .chat_json::<LlmResumeMatch>(&system, &prompt, RESUME_MATCH_OPTIONS)
        .await
    {
        Ok(answer) => Ok(ResumeMatch {
            match_percentage: answer
                .match_percentage
                .map(clamp_percent)
                .unwrap_or(baseline.match_percentage),
            keyword_matches: count(answer.keyword_matches).unwrap_or(baseline.keyword_matches),
            ats_score: answer.ats_score.map(clamp_percent).unwrap_or(baseline.ats_score),
            suggestions: prefer(answer.suggestions, baseline.suggestions),
            missing_keywords: prefer(answer.missing_keywords, baseline.missing_keywords),
            ai_generated: true,
        }),
        Err(e) if e.is_unusable_output() => {
            warn!("Unusable resume match analysis ({e}); using keyword baseline");
            Ok(baseline)
        }
        Err(e) => Err(e),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job requirements ↔ profile
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequirementsAnalysis {
    pub keyword_matches: u32,
    pub skills_alignment: u8,
    pub missing_requirements: Vec<String>,
    pub suggestions: Vec<String>,
    pub ai_generated: bool,
}

#[derive(Debug, Deserialize)]
struct LlmRequirements {
    #[serde(default, deserialize_with = "lenient_number")]
    keyword_matches: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    skills_alignment: Option<f64>,
    #[serde(default)]
    missing_requirements: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Alignment is measured on the known skills the job names; a job naming none
/// falls back to plain keyword coverage of the profile text.
pub fn requirements_baseline(profile: &UserProfile, job_description: &str) -> RequirementsAnalysis {
    let profile_text = format!(
        "{} {} {} {}",
        profile.title,
        profile.summary,
        profile.experience,
        profile.skills.join(" ")
    )
    .to_lowercase();
    let keywords = jd_keywords(job_description);
    let found = keywords
        .iter()
        .filter(|k| profile_text.contains(k.as_str()))
        .count();

    let owned: HashSet<String> = profile.skills.iter().map(|s| s.trim().to_lowercase()).collect();
    let wanted = match_vocabulary(job_description, SKILL_VOCABULARY);
    let missing: Vec<String> = wanted
        .iter()
        .filter(|s| !owned.contains(&s.to_lowercase()))
        .cloned()
        .collect();

    let skills_alignment = if wanted.is_empty() {
        coverage(found, keywords.len())
    } else {
        coverage(wanted.len() - missing.len(), wanted.len())
    };

    let mut suggestions: Vec<String> = missing
        .iter()
        .take(3)
        .map(|skill| format!("Show evidence of {skill} if you have it"))
        .collect();
    if skills_alignment < 50 {
        suggestions.push("Reword your summary using the job description's terms".to_string());
    }

    RequirementsAnalysis {
        keyword_matches: found as u32,
        skills_alignment,
        missing_requirements: missing,
        suggestions,
        ai_generated: false,
    }
}

pub async fn analyze_job_requirements(
    llm: &LlmClient,
    profile: &UserProfile,
    job_description: &str,
) -> Result<RequirementsAnalysis, LlmError> {
    let baseline = requirements_baseline(profile, job_description);
    let prompt = fill_template(
        JOB_REQUIREMENTS_PROMPT,
        &[
            ("job_description", job_description.trim()),
            ("candidate", &candidate_block(profile, None)),
        ],
    );
    let system = format!("{JOB_REQUIREMENTS_SYSTEM}{JSON_ONLY_SUFFIX}");

    match llm
        .chat_json::<LlmRequirements>(&system, &prompt, REQUIREMENTS_OPTIONS)
        .await
    {
        Ok(answer) => Ok(RequirementsAnalysis {
            keyword_matches: count(answer.keyword_matches).unwrap_or(baseline.keyword_matches),
            skills_alignment: answer
                .skills_alignment
                .map(clamp_percent)
                .unwrap_or(baseline.skills_alignment),
            missing_requirements: prefer(
                answer.missing_requirements,
                baseline.missing_requirements,
            ),
            suggestions: prefer(answer.suggestions, baseline.suggestions),
            ai_generated: true,
        }),
        Err(e) if e.is_unusable_output() => {
            warn!("Unusable job requirements analysis ({e}); using keyword baseline");
            Ok(baseline)
        }
        Err(e) => Err(e),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letter quality
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CoverLetterQuality {
    pub overall_score: u8,
    pub personalization: u8,
    pub relevance: u8,
    pub tone_score: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub suggestions: String,
    pub ai_generated: bool,
}

#[derive(Debug, Deserialize)]
struct LlmLetterQuality {
    #[serde(default, deserialize_with = "lenient_number")]
    overall_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    personalization: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    relevance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    tone_score: Option<f64>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    suggestions: Value,
}

/// Scores a letter on company mention, quantified claims, job keyword
/// coverage and stock phrases.
pub fn letter_quality_baseline(
    letter: &str,
    job_description: &str,
    company: Option<&str>,
) -> CoverLetterQuality {
    let lower = letter.to_lowercase();
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();

    let names_company = company
        .map(|c| c.trim().to_lowercase())
        .is_some_and(|c| !c.is_empty() && lower.contains(&c));
    let has_result = letter
        .split(['.', '!', '?', '\n'])
        .any(|sentence| !sentence.trim().is_empty() && validate_impact(sentence).passed);
    let personalization = 40 + 30 * u8::from(names_company) + 30 * u8::from(has_result);
    if personalization >= 70 {
        strengths.push("Personal to the company or backed by concrete results".to_string());
    }
    if !names_company {
        improvements.push("Name the company and say why it appeals to you".to_string());
    }
    if !has_result {
        improvements.push("Back your claims with at least one measurable result".to_string());
    }

    // Without a job description relevance stays neutral.
    let mut relevance = 50;
    if !job_description.trim().is_empty() {
        let keywords = jd_keywords(job_description);
        let found = keywords.iter().filter(|k| lower.contains(k.as_str())).count();
        relevance = coverage(found, keywords.len());
        if relevance >= 60 {
            strengths.push("Echoes the job's key requirements".to_string());
        } else {
            improvements.push("Mirror more of the job description's keywords".to_string());
        }
    }

    let cliches = match_vocabulary(letter, CLICHES);
    let tone_score = clamp_percent(100.0 - 20.0 * cliches.len() as f64);
    match cliches.first() {
        None => strengths.push("Professional tone without stock phrases".to_string()),
        Some(phrase) => improvements.push(format!("Replace stock phrases such as '{phrase}'")),
    }

    let words = letter.split_whitespace().count();
    if !(200..=500).contains(&words) {
        improvements.push(format!("Aim for 200 to 500 words (currently {words})"));
    }

    let overall_score = clamp_percent(
        (f64::from(personalization) + f64::from(relevance) + f64::from(tone_score)) / 3.0,
    );
    let suggestions = if improvements.is_empty() {
        "Strong letter. Keep tailoring the opening to each company.".to_string()
    } else {
        format!("{}.", improvements.join(". "))
    };

    CoverLetterQuality {
        overall_score,
        personalization,
        relevance,
        tone_score,
        strengths,
        improvements,
        suggestions,
        ai_generated: false,
    }
}

fn advice_text(value: Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    };
    (!text.is_empty()).then_some(text)
}

pub async fn analyze_cover_letter(
    llm: &LlmClient,
    letter: &str,
    job_description: &str,
    company: Option<&str>,
) -> Result<CoverLetterQuality, LlmError> {
    let baseline = letter_quality_baseline(letter, job_description, company);
    let prompt = fill_template(
        COVER_LETTER_QUALITY_PROMPT,
        &[
            ("cover_letter", letter.trim()),
            ("job_description", or_placeholder(job_description, "Not provided")),
        ],
    );
    let system = format!("{COVER_LETTER_QUALITY_SYSTEM}{JSON_ONLY_SUFFIX}");

    match llm
        .chat_json::<LlmLetterQuality>(&system, &prompt, LETTER_QUALITY_OPTIONS)
        .await
    {
        Ok(answer) => {
            let personalization = answer
                .personalization
                .map(clamp_percent)
                .unwrap_or(baseline.personalization);
            let relevance = answer.relevance.map(clamp_percent).unwrap_or(baseline.relevance);
            let tone_score = answer.tone_score.map(clamp_percent).unwrap_or(baseline.tone_score);
            let overall_score = answer.overall_score.map(clamp_percent).unwrap_or_else(|| {
                clamp_percent(
                    (f64::from(personalization) + f64::from(relevance) + f64::from(tone_score))
                        / 3.0,
                )
            });
            Ok(CoverLetterQuality {
                overall_score,
                personalization,
                relevance,
                tone_score,
                strengths: prefer(answer.strengths, baseline.strengths),
                improvements: prefer(answer.improvements, baseline.improvements),
                suggestions: advice_text(answer.suggestions).unwrap_or(baseline.suggestions),
                ai_generated: true,
            })
        }
        Err(e) if e.is_unusable_output() => {
            warn!("Unusable cover letter analysis ({e}); using local checks");
            Ok(baseline)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::FixedBackend;
    use std::sync::Arc;

    const JD: &str = "Backend engineer: Rust, Kubernetes, PostgreSQL and observability.";

    fn profile() -> UserProfile {
        UserProfile {
            name: "Ada".into(),
            title: "Backend Engineer".into(),
            skills: vec!["Python".into(), "SQL".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_resume_baseline_counts_jd_keywords() {
        let result = resume_match_baseline("Rust services on Kubernetes", JD);
        // backend, engineer, rust, kubernetes, postgresql, observability
        assert_eq!(result.keyword_matches, 2);
        assert_eq!(result.match_percentage, 33);
        assert_eq!(
            result.missing_keywords,
            vec!["backend", "engineer", "postgresql", "observability"]
        );
        assert!(!result.ai_generated);
        assert!(!result.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_resume_match_prefers_model_fields() {
        let llm = FixedBackend::client([
            r#"{"match_percentage": "82%", "ats_score": 91.4, "suggestions": ["Lead with Rust"], "missing_keywords": []}"#,
        ]);
        let result = analyze_resume_match(&llm, "Rust services on Kubernetes", JD)
            .await
            .unwrap();
        assert!(result.ai_generated);
        assert_eq!(result.match_percentage, 82);
        assert_eq!(result.ats_score, 91);
        assert_eq!(result.keyword_matches, 2);
        assert_eq!(result.suggestions, vec!["Lead with Rust"]);
        assert_eq!(result.missing_keywords.len(), 4);
    }

    #[tokio::test]
    async fn test_resume_match_prose_uses_baseline() {
        let llm = FixedBackend::client(["It is a decent match overall."]);
        let result = analyze_resume_match(&llm, "Rust services on Kubernetes", JD)
            .await
            .unwrap();
        assert_eq!(result, resume_match_baseline("Rust services on Kubernetes", JD));
    }

    #[tokio::test]
    async fn test_resume_match_transport_error_propagates() {
        let llm = LlmClient::new(Arc::new(FixedBackend::failing(502)));
        assert!(analyze_resume_match(&llm, "resume", JD).await.is_err());
    }

    #[test]
    fn test_requirements_baseline_uses_known_skills() {
        let result = requirements_baseline(
            &profile(),
            "We want Python, SQL, Docker and AWS experience.",
        );
        assert_eq!(result.skills_alignment, 50);
        assert_eq!(result.missing_requirements, vec!["AWS", "Docker"]);
        assert_eq!(result.suggestions[0], "Show evidence of AWS if you have it");
    }

    #[test]
    fn test_requirements_baseline_without_known_skills() {
        let result = requirements_baseline(&profile(), "Backend engineer for billing");
        // backend, engineer, billing
        assert_eq!(result.keyword_matches, 2);
        assert_eq!(result.skills_alignment, 67);
        assert!(result.missing_requirements.is_empty());
    }

    #[tokio::test]
    async fn test_requirements_from_model() {
        let llm = FixedBackend::client([
            r#"{"keyword_matches": 7, "skills_alignment": 120, "missing_requirements": ["Kafka"]}"#,
        ]);
        let result = analyze_job_requirements(&llm, &profile(), JD).await.unwrap();
        assert_eq!(result.keyword_matches, 7);
        assert_eq!(result.skills_alignment, 100);
        assert_eq!(result.missing_requirements, vec!["Kafka"]);
        assert!(result.ai_generated);
    }

    #[test]
    fn test_letter_baseline_flags_cliches_and_missing_company() {
        let letter = "To whom it may concern, I am a hard worker and a team player.";
        let result = letter_quality_baseline(letter, "", Some("Acme"));
        assert_eq!(result.tone_score, 40);
        assert_eq!(result.personalization, 40);
        assert_eq!(result.relevance, 50);
        assert!(result
            .improvements
            .contains(&"Replace stock phrases such as 'to whom it may concern'".to_string()));
        assert!(result.suggestions.starts_with("Name the company"));
    }

    #[test]
    fn test_letter_baseline_rewards_specifics() {
        let letter = "Acme's platform work excites me. At Initech I cut deploy time by 40% on Rust services.";
        let result = letter_quality_baseline(letter, JD, Some("Acme"));
        assert_eq!(result.personalization, 100);
        assert_eq!(result.tone_score, 100);
        assert!(result.strengths.contains(&"Professional tone without stock phrases".to_string()));
    }

    #[tokio::test]
    async fn test_letter_quality_from_model() {
        let llm = FixedBackend::client([
            r#"{"overall_score": 85, "personalization": 80, "relevance": 88, "tone_score": 90,
                "strengths": ["Clear"], "improvements": [], "suggestions": ["Open stronger.", "Add a metric."]}"#,
        ]);
        let result = analyze_cover_letter(&llm, "Dear team, ...", JD, None).await.unwrap();
        assert_eq!(result.overall_score, 85);
        assert_eq!(result.relevance, 88);
        assert_eq!(result.strengths, vec!["Clear"]);
        assert!(!result.improvements.is_empty());
        assert_eq!(result.suggestions, "Open stronger. Add a metric.");
        assert!(result.ai_generated);
    }

    #[tokio::test]
    async fn test_letter_quality_prose_uses_baseline() {
        let llm = FixedBackend::client(["A lovely letter!"]);
        let result = analyze_cover_letter(&llm, "Short letter.", "", None).await.unwrap();
        assert!(!result.ai_generated);
        assert_eq!(result.relevance, 50);
    }
}
