//! Resume generation, ATS optimization and quality scoring.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::documents::cleaning::clean_resume;
use crate::documents::impact::{summarize_impact, ImpactSummary};
use crate::documents::prompts::{
    ATS_OPTIMIZE_PROMPT, ATS_OPTIMIZE_SYSTEM, QUALITY_PROMPT, QUALITY_SYSTEM, RESUME_PROMPT,
    RESUME_SYSTEM, RESUME_TAILORING,
};
use crate::llm_client::prompts::{
    candidate_block, fill_template, or_placeholder, NO_COMMENTARY_INSTRUCTION,
};
use crate::llm_client::scores::percent;
use crate::llm_client::{CompletionOptions, LlmClient, LlmError};
use crate::models::document::{DocumentKind, GeneratedDocument};
use crate::models::profile::UserProfile;
use crate::profile::parser::{match_vocabulary, EMAIL_RE, PHONE_RE, SKILL_VOCABULARY};

const GENERATE_OPTIONS: CompletionOptions = CompletionOptions::new(2000, 0.6);
const OPTIMIZE_OPTIONS: CompletionOptions = CompletionOptions::new(2000, 0.5);
const QUALITY_OPTIONS: CompletionOptions = CompletionOptions::new(1000, 0.4);

pub const RESUME_STYLES: &[&str] = &[
    "Professional ATS-Optimized",
    "Creative Professional",
    "Executive Leadership",
    "Technical Specialist",
    "Entry Level Focus",
];

const STANDARD_HEADINGS: &[&str] = &[
    "summary",
    "experience",
    "education",
    "skills",
    "projects",
    "certifications",
];

const STOPWORDS: &[&str] = &[
    "about", "above", "after", "also", "and", "been", "being", "both", "candidate", "company",
    "each", "from", "have", "into", "will", "more", "must", "other", "role", "team", "that",
    "their", "them", "they", "this", "what", "when", "where", "which", "while", "with", "work",
    "years", "your", "ability", "experience", "strong", "using", "within", "should", "including",
];

const MAX_JD_KEYWORDS: usize = 25;

/// Resolves a style label; unknown labels fall back to the ATS style.
pub fn resolve_style(label: Option<&str>) -> &'static str {
    label
        .and_then(|l| RESUME_STYLES.iter().find(|s| s.eq_ignore_ascii_case(l.trim())))
        .copied()
        .unwrap_or(RESUME_STYLES[0])
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeOutput {
    pub document: GeneratedDocument,
    /// Cleaned body under a contact header, ready for download.
    pub plain_text: String,
}

pub async fn generate_resume(
    llm: &LlmClient,
    profile: &UserProfile,
    style: &'static str,
    job_description: Option<&str>,
    enhancements: &[String],
) -> Result<ResumeOutput, LlmError> {
    let tailoring = match job_description.map(str::trim) {
        Some(jd) if !jd.is_empty() => fill_template(RESUME_TAILORING, &[("job_description", jd)]),
        _ => String::new(),
    };
    let enhancements = if enhancements.is_empty() {
        "Quantified achievements, Strong action verbs, ATS keywords".to_string()
    } else {
        enhancements.join(", ")
    };

    let prompt = fill_template(
        RESUME_PROMPT,
        &[
            ("style", style),
            ("enhancements", &enhancements),
            ("no_commentary", NO_COMMENTARY_INSTRUCTION),
            ("email", or_placeholder(&profile.email, "email@example.com")),
            ("phone", or_placeholder(&profile.phone, "Phone Number")),
            ("candidate", &candidate_block(profile, None)),
            ("tailoring", &tailoring),
        ],
    );

    let raw = llm.chat(RESUME_SYSTEM, &prompt, GENERATE_OPTIONS).await?;
    let content = clean_resume(&raw);
    info!("Generated {style} resume ({} chars)", content.len());

    let plain_text = format_resume_text(&content, profile);
    Ok(ResumeOutput {
        document: GeneratedDocument::new(DocumentKind::Resume, style, content),
        plain_text,
    })
}

/// Contact header + body + generation footer.
pub fn format_resume_text(content: &str, profile: &UserProfile) -> String {
    format!(
        "{}\n{} | {}\nLinkedIn: {}\n\n{}\n\n---\nGenerated on {}",
        or_placeholder(&profile.name, "Your Name"),
        or_placeholder(&profile.email, "email@example.com"),
        or_placeholder(&profile.phone, "Phone Number"),
        or_placeholder(&profile.linkedin_url, "linkedin.com/in/yourprofile"),
        content.trim(),
        Utc::now().format("%B %d, %Y"),
    )
}

/// Rewrites an existing resume against a job description.
pub async fn optimize_resume(
    llm: &LlmClient,
    resume: &str,
    job_description: &str,
) -> Result<GeneratedDocument, LlmError> {
    let prompt = fill_template(
        ATS_OPTIMIZE_PROMPT,
        &[
            ("no_commentary", NO_COMMENTARY_INSTRUCTION),
            ("job_description", job_description.trim()),
            ("resume", resume.trim()),
        ],
    );

    let raw = llm.chat(ATS_OPTIMIZE_SYSTEM, &prompt, OPTIMIZE_OPTIONS).await?;
    Ok(GeneratedDocument::new(
        DocumentKind::Resume,
        "ATS Optimized",
        clean_resume(&raw),
    ))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityCheck {
    pub name: String,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeQualityReport {
    pub overall_score: u32,
    pub heuristic_score: u32,
    pub llm_score: Option<u32>,
    pub checks: Vec<QualityCheck>,
    pub suggestions: Vec<String>,
    pub impact: ImpactSummary,
}

#[derive(Debug, Deserialize)]
struct LlmQuality {
    #[serde(deserialize_with = "percent")]
    overall_score: u8,
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Local checks plus the LLM's opinion when it gives a usable one.
pub async fn evaluate_quality(
    llm: &LlmClient,
    resume: &str,
    job_description: Option<&str>,
) -> ResumeQualityReport {
    let mut report = heuristic_quality(resume, job_description);

    let target = match job_description {
        Some(jd) if !jd.trim().is_empty() => format!("TARGET JOB:\n{}", jd.trim()),
        _ => "General evaluation, no target job.".to_string(),
    };
    let prompt = fill_template(
        QUALITY_PROMPT,
        &[("target", &target), ("resume", resume.trim())],
    );

    match llm
        .chat_json::<LlmQuality>(QUALITY_SYSTEM, &prompt, QUALITY_OPTIONS)
        .await
    {
        Ok(answer) => {
            let llm_score = u32::from(answer.overall_score);
            report.llm_score = Some(llm_score);
            report.overall_score = (report.heuristic_score + llm_score + 1) / 2;
            let mut seen: HashSet<String> =
                report.suggestions.iter().map(|s| s.to_lowercase()).collect();
            for suggestion in answer.suggestions {
                let suggestion = suggestion.trim().to_string();
                if !suggestion.is_empty() && seen.insert(suggestion.to_lowercase()) {
                    report.suggestions.push(suggestion);
                }
            }
        }
        Err(e) => warn!("LLM quality score unavailable, using local checks only: {e}"),
    }
    report
}

/// Deterministic quality checks, 20 points each.
pub fn heuristic_quality(resume: &str, job_description: Option<&str>) -> ResumeQualityReport {
    let lower = resume.to_lowercase();
    let impact = summarize_impact(resume);
    let mut suggestions = Vec::new();

    let headings = STANDARD_HEADINGS
        .iter()
        .filter(|h| lower.lines().any(|l| is_heading(l, h)))
        .count();
    let ats_compatible = headings >= 3 && !resume.contains('\t');
    if !ats_compatible {
        suggestions.push(
            "Use standard section headings (Summary, Experience, Education, Skills) and avoid tab-aligned layouts"
                .to_string(),
        );
    }

    let keywords_optimized = match job_description.filter(|jd| !jd.trim().is_empty()) {
        Some(jd) => {
            let keywords = jd_keywords(jd);
            let missing: Vec<&String> = keywords.iter().filter(|k| !lower.contains(k.as_str())).collect();
            let covered = keywords.len() - missing.len();
            let ok = !keywords.is_empty() && covered * 2 >= keywords.len();
            if !ok {
                let sample: Vec<&str> = missing.iter().take(5).map(|k| k.as_str()).collect();
                suggestions.push(format!(
                    "Work in more of the job's keywords, e.g. {}",
                    sample.join(", ")
                ));
            }
            ok
        }
        None => {
            let ok = match_vocabulary(resume, SKILL_VOCABULARY).len() >= 3;
            if !ok {
                suggestions.push("List more concrete, in-demand skills".to_string());
            }
            ok
        }
    };

    let achievements_quantified = impact.bullets > 0 && impact.ratio() >= 0.5;
    if !achievements_quantified {
        suggestions.push("Add numbers, percentages or amounts to your achievements".to_string());
    }

    let words = resume.split_whitespace().count();
    let professional_format = (200..=1000).contains(&words) && impact.bullets >= 3;
    if !professional_format {
        suggestions.push(
            "Aim for 200 to 1000 words with achievements written as bullet points".to_string(),
        );
    }

    let contact_complete = EMAIL_RE.is_match(resume) && PHONE_RE.is_match(resume);
    if !contact_complete {
        suggestions.push("Include both an e-mail address and a phone number".to_string());
    }

    let checks = vec![
        check("ATS Compatible", ats_compatible),
        check("Keywords Optimized", keywords_optimized),
        check("Achievements Quantified", achievements_quantified),
        check("Professional Format", professional_format),
        check("Contact Info Complete", contact_complete),
    ];
    let heuristic_score = checks.iter().filter(|c| c.passed).count() as u32 * 20;

    ResumeQualityReport {
        overall_score: heuristic_score,
        heuristic_score,
        llm_score: None,
        checks,
        suggestions,
        impact,
    }
}

fn check(name: &str, passed: bool) -> QualityCheck {
    QualityCheck {
        name: name.to_string(),
        passed,
    }
}

/// A short line that names a section, e.g. `EXPERIENCE` or `Work Experience:`.
fn is_heading(line: &str, heading: &str) -> bool {
    let line = line.trim().trim_end_matches(':');
    line.contains(heading) && line.split_whitespace().count() <= 4
}

/// Distinct significant words of a job description, in order of appearance.
pub fn jd_keywords(job_description: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    job_description
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#')))
        .filter(|w| w.chars().count() >= 4 && !STOPWORDS.contains(w))
        .filter(|w| seen.insert(w.to_string()))
        .take(MAX_JD_KEYWORDS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::FixedBackend;

    fn strong_resume() -> String {
        let bullets: String = (1..=6)
            .map(|i| format!("• Cut processing time by {i}0% across {i} services\n"))
            .collect();
        format!(
            "Ada Lovelace\nada@example.com | 555-123-4567\n\nSUMMARY\n{}\n\nEXPERIENCE\n{}\nEDUCATION\nBSc Mathematics\n\nSKILLS\nPython, SQL, Docker, Git\n",
            "Engineer building reliable data platforms. ".repeat(30),
            bullets
        )
    }

    #[test]
    fn test_resolve_style_falls_back() {
        assert_eq!(resolve_style(Some("executive leadership")), "Executive Leadership");
        assert_eq!(resolve_style(Some("Baroque")), "Professional ATS-Optimized");
        assert_eq!(resolve_style(None), "Professional ATS-Optimized");
    }

    #[test]
    fn test_format_resume_text_uses_placeholders() {
        let text = format_resume_text("BODY", &UserProfile::default());
        assert!(text.starts_with("Your Name\nemail@example.com | Phone Number"));
        assert!(text.contains("\n\nBODY\n\n---\nGenerated on "));
    }

    #[test]
    fn test_strong_resume_passes_all_checks() {
        let report = heuristic_quality(&strong_resume(), None);
        assert!(report.checks.iter().all(|c| c.passed), "{:?}", report.checks);
        assert_eq!(report.heuristic_score, 100);
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn test_weak_resume_gets_suggestions() {
        let report = heuristic_quality("Ada\nDid things\n• Helped the team", None);
        assert_eq!(report.heuristic_score, 0);
        assert_eq!(report.suggestions.len(), 5);
    }

    #[test]
    fn test_jd_keywords_skip_stopwords() {
        let keywords = jd_keywords("We need Rust and Kubernetes experience. Rust is a must.");
        assert_eq!(keywords, vec!["need", "rust", "kubernetes"]);
    }

    #[test]
    fn test_keyword_check_against_jd() {
        let report = heuristic_quality(&strong_resume(), Some("Kubernetes Terraform Golang Haskell"));
        let keywords = report.checks.iter().find(|c| c.name == "Keywords Optimized").unwrap();
        assert!(!keywords.passed);
    }

    #[tokio::test]
    async fn test_quality_combines_llm_score() {
        let llm = FixedBackend::client([r#"{"overall_score": 60, "suggestions": ["Tighten the summary"]}"#]);
        let report = evaluate_quality(&llm, &strong_resume(), None).await;
        assert_eq!(report.llm_score, Some(60));
        assert_eq!(report.overall_score, 80);
        assert_eq!(report.suggestions, vec!["Tighten the summary"]);
    }

    #[tokio::test]
    async fn test_quality_without_usable_llm_answer() {
        let llm = FixedBackend::client(["Looks great to me!"]);
        let report = evaluate_quality(&llm, &strong_resume(), None).await;
        assert_eq!(report.llm_score, None);
        assert_eq!(report.overall_score, report.heuristic_score);
    }

    #[tokio::test]
    async fn test_generate_resume_cleans_output() {
        let llm = FixedBackend::client([
            "Here's an enhanced resume:\n**SUMMARY**\nRust engineer with 5 years of experience.\nada@example.com",
        ]);
        let profile = UserProfile {
            name: "Ada".into(),
            ..Default::default()
        };
        let out = generate_resume(&llm, &profile, RESUME_STYLES[0], None, &[])
            .await
            .unwrap();
        assert_eq!(
            out.document.content,
            "SUMMARY\nRust engineer with 5 years of experience."
        );
        assert!(out.plain_text.starts_with("Ada\n"));
        assert_eq!(out.document.kind, DocumentKind::Resume);
    }
}
