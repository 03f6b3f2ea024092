//! Achievement bullets: does each one state a measurable outcome?

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::profile::parser::match_vocabulary;

/// Why a bullet was judged unquantified, with a concrete rewrite hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VagueBullet {
    pub bullet: String,
    pub reason: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactCheck {
    pub passed: bool,
    pub vague: Vec<VagueBullet>,
}

/// Quantification across every bullet of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub bullets: usize,
    pub quantified: usize,
    pub vague: Vec<VagueBullet>,
}

impl ImpactSummary {
    /// Share of bullets carrying a metric; 0 when there are no bullets.
    pub fn ratio(&self) -> f64 {
        if self.bullets == 0 {
            0.0
        } else {
            self.quantified as f64 / self.bullets as f64
        }
    }
}

/// Phrases that describe a duty rather than a result.
const DUTY_PHRASES: &[&str] = &[
    "responsible for",
    "duties included",
    "tasked with",
    "worked on",
    "helped",
    "assisted",
    "participated in",
    "involved in",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "significantly",
    "substantial",
    "greatly",
    "various",
    "numerous",
    "several",
    "multiple",
    "many",
    "a lot of",
];

const BULLET_MARKERS: &[&str] = &["•", "-", "*", "–", "▪"];

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

/// Percentages, money, multipliers and magnitudes: `40%`, `$50,000`, `3x`, `2.5M`.
static METRIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d[\d,.]*\s*%|[$€£₹]\s*\d|\b\d+(\.\d+)?x\b|\b\d[\d,.]*\s*(k|m|bn|million|billion|thousand|lakhs?|crores?)\b",
    )
    .unwrap()
});

/// A count of something: `4 releases`, `~2 hours`, `12+ engineers`.
static COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d[\d,]*\+?\s+[A-Za-z]").unwrap());

/// Checks one achievement bullet for a measurable outcome.
///
/// Years and trailing version numbers ("since 2019", "Python 3") are not
/// metrics. An unquantified bullet reports the first duty phrase and the first
/// vague scale word it uses, or a generic gap when it has neither.
pub fn validate_impact(text: &str) -> ImpactCheck {
    if is_quantified(text) {
        return ImpactCheck {
            passed: true,
            vague: vec![],
        };
    }

    let mut vague = Vec::new();

    if let Some(phrase) = match_vocabulary(text, DUTY_PHRASES).first() {
        vague.push(VagueBullet {
            bullet: text.to_string(),
            reason: format!("Describes a duty ('{phrase}') instead of a result"),
            suggestion: "Lead with an action verb and state the outcome, e.g. 'Cut build time by 30%'"
                .to_string(),
        });
    }

    if let Some(word) = match_vocabulary(text, VAGUE_SCALE_WORDS).first() {
        vague.push(VagueBullet {
            bullet: text.to_string(),
            reason: format!("Uses '{word}' where a number belongs"),
            suggestion: format!("Replace '{word}' with the actual figure: users, hours, %, or revenue"),
        });
    }

    if vague.is_empty() {
        vague.push(VagueBullet {
            bullet: text.to_string(),
            reason: "No measurable outcome".to_string(),
            suggestion: "Add a count, percentage, amount or time saved".to_string(),
        });
    }

    ImpactCheck {
        passed: false,
        vague,
    }
}

fn is_quantified(text: &str) -> bool {
    let without_years = YEAR_RE.replace_all(text, "");
    METRIC_RE.is_match(&without_years) || COUNT_RE.is_match(&without_years)
}

/// Lines that start with a bullet marker, marker stripped.
pub fn bullet_lines(document: &str) -> Vec<String> {
    document
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            BULLET_MARKERS
                .iter()
                .find_map(|m| line.strip_prefix(m))
                .map(|rest| rest.trim().to_string())
        })
        .filter(|rest| !rest.is_empty())
        .collect()
}

/// Runs `validate_impact` over every bullet of a document.
pub fn summarize_impact(document: &str) -> ImpactSummary {
    let bullets = bullet_lines(document);
    let mut quantified = 0;
    let mut vague = Vec::new();

    for bullet in &bullets {
        let check = validate_impact(bullet);
        if check.passed {
            quantified += 1;
        } else {
            vague.extend(check.vague);
        }
    }

    ImpactSummary {
        bullets: bullets.len(),
        quantified,
        vague,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages_money_and_multipliers() {
        assert!(validate_impact("Reduced latency by 40% through caching").passed);
        assert!(validate_impact("Saved $50,000 annually by optimizing queries").passed);
        assert!(validate_impact("Generated €200k in new revenue").passed);
        assert!(validate_impact("Cut vendor spend by ₹12 lakhs").passed);
        assert!(validate_impact("Made the build 3x faster").passed);
        assert!(validate_impact("Grew the mailing list to 2.5M subscribers").passed);
    }

    #[test]
    fn test_counts_are_quantified() {
        assert!(validate_impact("Shipped 4 releases ahead of schedule").passed);
        assert!(validate_impact("Reduced deployment time by ~2 hours").passed);
        assert!(validate_impact("Mentored 12+ engineers").passed);
    }

    #[test]
    fn test_years_and_versions_are_not_metrics() {
        assert!(!validate_impact("Led the 2021 platform rewrite").passed);
        assert!(!validate_impact("Migrated the services to Python 3").passed);
        assert!(!validate_impact("Maintained billing from 2019 to 2023").passed);
    }

    #[test]
    fn test_duty_phrase_is_flagged() {
        let r = validate_impact("Responsible for the onboarding flow");
        assert!(!r.passed);
        assert!(r.vague[0].reason.contains("'responsible for'"));
    }

    #[test]
    fn test_scale_word_is_flagged() {
        let r = validate_impact("Delivered significant performance gains");
        assert!(!r.passed);
        assert_eq!(r.vague.len(), 1);
        assert!(r.vague[0].reason.contains("'significant'"));
    }

    #[test]
    fn test_reports_both_duty_and_scale_word() {
        let r = validate_impact("Helped numerous clients");
        assert_eq!(r.vague.len(), 2);
    }

    #[test]
    fn test_scale_words_match_whole_words() {
        let r = validate_impact("Architected the auth system for the Germany region");
        assert!(!r.passed);
        assert_eq!(r.vague[0].reason, "No measurable outcome");
    }

    #[test]
    fn test_bullet_lines_strip_markers() {
        let doc = "EXPERIENCE\n• Shipped 4 releases\n- Helped the team\nPlain line\n*   \n";
        assert_eq!(
            bullet_lines(doc),
            vec!["Shipped 4 releases".to_string(), "Helped the team".to_string()]
        );
    }

    #[test]
    fn test_summary_ratio() {
        let doc = "• Shipped 4 releases\n• Helped the team\n• Cut costs by 10%\n• Led various efforts";
        let summary = summarize_impact(doc);
        assert_eq!(summary.bullets, 4);
        assert_eq!(summary.quantified, 2);
        assert_eq!(summary.ratio(), 0.5);
    }

    #[test]
    fn test_summary_without_bullets() {
        assert_eq!(summarize_impact("No bullets here").ratio(), 0.0);
    }
}
