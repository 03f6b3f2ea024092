use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::documents::cleaning::clean_cover_letter;
use crate::documents::prompts::{COVER_LETTER_PROMPT, COVER_LETTER_SYSTEM};
use crate::llm_client::prompts::{
    candidate_block, fill_template, or_placeholder, NO_COMMENTARY_INSTRUCTION,
};
use crate::llm_client::{CompletionOptions, LlmClient, LlmError};
use crate::models::document::{DocumentKind, GeneratedDocument};
use crate::models::profile::UserProfile;

const COVER_LETTER_OPTIONS: CompletionOptions = CompletionOptions::new(1500, 0.7);

pub const TONES: &[&str] = &[
    "Professional & Confident",
    "Enthusiastic & Energetic",
    "Formal & Conservative",
    "Creative & Personal",
    "Technical & Precise",
];

/// Length label and target word range.
pub const LENGTHS: &[(&str, &str)] = &[
    ("Concise", "200-250"),
    ("Standard", "300-400"),
    ("Detailed", "450-500"),
];

pub struct CoverLetterInput<'a> {
    pub profile: &'a UserProfile,
    pub company: &'a str,
    pub position: &'a str,
    pub job_description: &'a str,
    pub tone: Option<&'a str>,
    pub length: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverLetterOutput {
    pub document: GeneratedDocument,
    /// Cleaned body only, without the letter frame.
    pub body: String,
}

fn resolve_tone(tone: Option<&str>) -> &'static str {
    tone.and_then(|t| TONES.iter().find(|x| x.eq_ignore_ascii_case(t.trim())))
        .copied()
        .unwrap_or(TONES[0])
}

/// The tone for a second draft: `requested` when it names a known tone other
/// than `current`, otherwise the tone after `current` in `TONES`.
pub fn alternative_tone(current: Option<&str>, requested: Option<&str>) -> &'static str {
    let current = resolve_tone(current);
    let requested = requested
        .and_then(|r| TONES.iter().find(|t| t.eq_ignore_ascii_case(r.trim())))
        .copied()
        .filter(|t| *t != current);
    requested.unwrap_or_else(|| {
        let index = TONES.iter().position(|t| *t == current).unwrap_or(0);
        TONES[(index + 1) % TONES.len()]
    })
}

fn resolve_length(length: Option<&str>) -> (&'static str, &'static str) {
    length
        .and_then(|l| LENGTHS.iter().find(|(name, _)| name.eq_ignore_ascii_case(l.trim())))
        .copied()
        .unwrap_or(LENGTHS[1])
}

pub async fn generate_cover_letter(
    llm: &LlmClient,
    input: CoverLetterInput<'_>,
) -> Result<CoverLetterOutput, LlmError> {
    let tone = resolve_tone(input.tone);
    let (length, word_range) = resolve_length(input.length);
    let tone_lower = tone.to_lowercase();

    let system = fill_template(COVER_LETTER_SYSTEM, &[("tone", &tone_lower)]);
    let prompt = fill_template(
        COVER_LETTER_PROMPT,
        &[
            ("tone", &tone_lower),
            ("word_range", word_range),
            ("no_commentary", NO_COMMENTARY_INSTRUCTION),
            ("candidate", &candidate_block(input.profile, None)),
            ("company", input.company.trim()),
            ("position", or_placeholder(input.position, "the open position")),
            ("job_description", or_placeholder(input.job_description, "Not provided")),
        ],
    );

    let raw = llm.chat(&system, &prompt, COVER_LETTER_OPTIONS).await?;
    let body = clean_cover_letter(&raw);
    info!(
        "Generated {length} cover letter for {} ({} words)",
        input.company,
        body.split_whitespace().count()
    );

    let letter = letter_frame(&body, input.profile, input.company, Utc::now().date_naive());
    Ok(CoverLetterOutput {
        document: GeneratedDocument::new(DocumentKind::CoverLetter, tone, letter),
        body,
    })
}

/// Business-letter layout around a cleaned body.
pub fn letter_frame(body: &str, profile: &UserProfile, company: &str, date: NaiveDate) -> String {
    let name = or_placeholder(&profile.name, "Your Name");
    format!(
        "{name}\n{}\n{}\n\n{}\n\nHiring Manager\n{}\n\nDear Hiring Manager,\n\n{}\n\nSincerely,\n{name}",
        or_placeholder(&profile.email, "email@example.com"),
        or_placeholder(&profile.phone, "Phone Number"),
        date.format("%B %d, %Y"),
        company.trim(),
        body.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::FixedBackend;
    use std::sync::Arc;

    fn profile() -> UserProfile {
        UserProfile {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_letter_frame_layout() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let letter = letter_frame("I would love to join.", &profile(), "Acme", date);
        assert_eq!(
            letter,
            "Ada Lovelace\nada@example.com\nPhone Number\n\nMarch 05, 2024\n\nHiring Manager\nAcme\n\nDear Hiring Manager,\n\nI would love to join.\n\nSincerely,\nAda Lovelace"
        );
    }

    #[test]
    fn test_unknown_tone_and_length_use_defaults() {
        assert_eq!(resolve_tone(Some("Sarcastic")), "Professional & Confident");
        assert_eq!(resolve_tone(Some("technical & precise")), "Technical & Precise");
        assert_eq!(resolve_length(None), ("Standard", "300-400"));
        assert_eq!(resolve_length(Some("concise")), ("Concise", "200-250"));
    }

    #[test]
    fn test_alternative_tone() {
        assert_eq!(alternative_tone(None, None), "Enthusiastic & Energetic");
        assert_eq!(alternative_tone(Some("Technical & Precise"), None), "Professional & Confident");
        assert_eq!(
            alternative_tone(Some("Formal & Conservative"), Some("creative & personal")),
            "Creative & Personal"
        );
        assert_eq!(
            alternative_tone(Some("Formal & Conservative"), Some("Formal & Conservative")),
            "Creative & Personal"
        );
    }

    #[tokio::test]
    async fn test_prompt_carries_tone_and_length() {
        let backend = Arc::new(FixedBackend::new([
            "Here's an enhanced cover letter:\nI am excited to apply to Acme.",
        ]));
        let llm = LlmClient::new(backend.clone());
        let out = generate_cover_letter(
            &llm,
            CoverLetterInput {
                profile: &profile(),
                company: "Acme",
                position: "Engineer",
                job_description: "Build things",
                tone: Some("Formal & Conservative"),
                length: Some("Detailed"),
            },
        )
        .await
        .unwrap();

        let calls = backend.calls();
        assert!(calls[0][0].content.contains("formal & conservative"));
        assert!(calls[0][1].content.contains("450-500 words"));
        assert_eq!(out.body, "I am excited to apply to Acme.");
        assert!(out.document.content.contains("Dear Hiring Manager,\n\nI am excited"));
        assert_eq!(out.document.style, "Formal & Conservative");
    }
}
