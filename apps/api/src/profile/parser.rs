//! Resume text → `UserProfile`.
//!
//! The LLM does the structured parse. When it is unreachable or answers with
//! something that is not the requested JSON, a regex parser recovers the
//! fields that have a recognizable shape.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::llm_client::prompts::fill_template;
use crate::llm_client::{CompletionOptions, LlmClient};
use crate::models::profile::UserProfile;
use crate::profile::prompts::{PROFILE_PARSE_PROMPT, PROFILE_PARSE_SYSTEM};

const PARSE_OPTIONS: CompletionOptions = CompletionOptions::new(1000, 0.3);

const EXPERIENCE_CAP: usize = 500;
const EDUCATION_CAP: usize = 300;

/// Vocabulary for the fallback skill scan.
pub const SKILL_VOCABULARY: &[&str] = &[
    "Python",
    "JavaScript",
    "Java",
    "C++",
    "React",
    "Node.js",
    "SQL",
    "Machine Learning",
    "Data Analysis",
    "Project Management",
    "Leadership",
    "Communication",
    "Problem Solving",
    "Teamwork",
    "Git",
    "AWS",
    "Docker",
];

pub static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

pub static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});

static EXPERIENCE_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)experience|work history|employment").unwrap());

static EXPERIENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)education|skills|projects").unwrap());

static EDUCATION_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)education|academic|degree").unwrap());

static EDUCATION_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)experience|skills|projects").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserKind {
    Llm,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsedProfile {
    pub profile: UserProfile,
    pub parser: ParserKind,
}

/// Parses resume text with the LLM, falling back to regex extraction.
/// Never fails: a provider outage degrades to the fallback parser.
pub async fn parse_profile(text: &str, llm: &LlmClient) -> ParsedProfile {
    let prompt = fill_template(PROFILE_PARSE_PROMPT, &[("resume_text", text)]);

    match llm
        .chat_json::<UserProfile>(PROFILE_PARSE_SYSTEM, &prompt, PARSE_OPTIONS)
        .await
    {
        Ok(profile) => {
            info!("Profile parsed by LLM ({} skills)", profile.skills.len());
            ParsedProfile {
                profile: profile.normalized(),
                parser: ParserKind::Llm,
            }
        }
        Err(e) => {
            warn!("LLM profile parse failed, using regex fallback: {e}");
            ParsedProfile {
                profile: fallback_parse(text),
                parser: ParserKind::Fallback,
            }
        }
    }
}

/// Regex-based extraction of the fields that have a recognizable shape.
pub fn fallback_parse(text: &str) -> UserProfile {
    UserProfile {
        name: guess_name(text).unwrap_or_default(),
        email: EMAIL_RE
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        phone: PHONE_RE
            .find(text)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        skills: match_vocabulary(text, SKILL_VOCABULARY),
        experience: section_after(text, &EXPERIENCE_HEADING_RE, &EXPERIENCE_END_RE, EXPERIENCE_CAP),
        education: section_after(text, &EDUCATION_HEADING_RE, &EDUCATION_END_RE, EDUCATION_CAP),
        ..Default::default()
    }
}

/// First of the first five non-empty lines that looks like a name.
fn guess_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(5)
        .find(|line| {
            !line.chars().any(|c| c.is_ascii_digit())
                && !line.contains('@')
                && line.split_whitespace().count() <= 4
                && line.chars().count() > 2
        })
        .map(str::to_string)
}

/// Vocabulary terms present in `text`, case-insensitive, bounded by non-alphanumerics
/// so that `Java` does not match inside `JavaScript`.
pub fn match_vocabulary(text: &str, vocabulary: &[&str]) -> Vec<String> {
    let haystack = text.to_lowercase();
    vocabulary
        .iter()
        .filter(|term| contains_term(&haystack, &term.to_lowercase()))
        .map(|term| term.to_string())
        .collect()
}

fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + term.len()..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    })
}

/// Text between the first `heading` match and the next `end` match, capped at `cap` chars.
fn section_after(text: &str, heading: &Regex, end: &Regex, cap: usize) -> String {
    let Some(start) = heading.find(text) else {
        return String::new();
    };
    let rest = &text[start.end()..];
    let body = match end.find(rest) {
        Some(stop) => &rest[..stop.start()],
        None => rest,
    };
    body.trim()
        .trim_start_matches(':')
        .trim()
        .chars()
        .take(cap)
        .collect()
}
