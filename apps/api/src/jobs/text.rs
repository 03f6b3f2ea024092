//! Heuristics over scraped listing text: posting dates, employment type,
//! remote detection and skill tags.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::profile::parser::match_vocabulary;

/// Skills tagged on listings, in display order.
pub const LISTING_SKILLS: &[&str] = &[
    "Python",
    "JavaScript",
    "Java",
    "React",
    "Node.js",
    "SQL",
    "AWS",
    "Docker",
    "Kubernetes",
    "Git",
    "Agile",
    "Scrum",
    "REST API",
    "Machine Learning",
    "Data Analysis",
    "Cloud Computing",
    "TypeScript",
    "Angular",
    "Vue.js",
    "MongoDB",
    "PostgreSQL",
    "Redis",
    "GraphQL",
    "Microservices",
    "DevOps",
    "CI/CD",
    "Jenkins",
    "Terraform",
    "HTML",
    "CSS",
    "C++",
    "C#",
    ".NET",
    "PHP",
    "Ruby",
    "Go",
    "Rust",
    "Swift",
];

pub const MAX_LISTING_SKILLS: usize = 6;

const INTERNSHIP_TERMS: &[&str] = &["intern", "interns", "internship", "co-op", "co op"];
const CONTRACT_TERMS: &[&str] = &["contract", "contractor", "freelance", "consultant"];
const PART_TIME_TERMS: &[&str] = &["part-time", "part time", "parttime"];
const REMOTE_TERMS: &[&str] = &[
    "remote",
    "work from home",
    "telecommute",
    "distributed",
    "anywhere",
];

pub const REMOTE_FRIENDLY: &str = "Remote-friendly";

/// Days assigned to labels with no usable number.
const RECENTLY_DAYS: u32 = 3;
const UNKNOWN_DAYS: u32 = 7;

static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").unwrap());

fn first_number(text: &str) -> Option<u32> {
    LEADING_NUMBER_RE
        .captures(text)
        .and_then(|c| c[1].parse().ok())
}

/// Normalizes board-specific posting dates ("Posted 3 days ago", "Just posted",
/// "2 weeks ago") to a small set of relative labels.
pub fn normalize_posted_date(raw: &str) -> String {
    let text = raw.trim().to_lowercase();

    if text.contains("today") || text.contains("just posted") {
        return "Today".to_string();
    }
    if text.contains("yesterday") {
        return "Yesterday".to_string();
    }
    if text.contains("day") {
        if let Some(days) = first_number(&text) {
            return format!("{days} days ago");
        }
    } else if text.contains("hour") {
        return "Today".to_string();
    } else if text.contains("week") {
        if let Some(weeks) = first_number(&text) {
            return format!("{} days ago", weeks.saturating_mul(7));
        }
    } else if text.contains("month") {
        return "30+ days ago".to_string();
    }
    "Recently".to_string()
}

/// Approximate age in days of a normalized posting label. Lower is newer.
pub fn posted_sort_key(label: &str) -> u32 {
    match label {
        "Today" => 0,
        "Yesterday" => 1,
        "Recently" => RECENTLY_DAYS,
        other if other.ends_with("days ago") => first_number(other).unwrap_or(UNKNOWN_DAYS),
        _ => UNKNOWN_DAYS,
    }
}

pub fn detect_employment_type(title: &str, description: &str) -> &'static str {
    let text = format!("{title} {description}");
    let mentions = |terms: &[&str]| !match_vocabulary(&text, terms).is_empty();

    if mentions(INTERNSHIP_TERMS) {
        "Internship"
    } else if mentions(CONTRACT_TERMS) {
        "Contract"
    } else if mentions(PART_TIME_TERMS) {
        "Part-time"
    } else {
        "Full-time"
    }
}

pub fn detect_remote(description: &str, location: &str) -> Option<String> {
    let text = format!("{description} {location}");
    (!match_vocabulary(&text, REMOTE_TERMS).is_empty()).then(|| REMOTE_FRIENDLY.to_string())
}

pub fn extract_listing_skills(text: &str) -> Vec<String> {
    let mut skills = match_vocabulary(text, LISTING_SKILLS);
    skills.truncate(MAX_LISTING_SKILLS);
    skills
}

/// Collapses runs of whitespace; scraped text is full of layout newlines.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
