use serde::Serialize;

use crate::interview::prompts::{COACHING_PROMPT, COACHING_SYSTEM, TIPS_PROMPT, TIPS_SYSTEM};
use crate::interview::session::InterviewSession;
use crate::llm_client::prompts::{candidate_block, fill_template};
use crate::llm_client::{CompletionOptions, LlmClient, LlmError};
use crate::models::profile::UserProfile;

const COACHING_OPTIONS: CompletionOptions = CompletionOptions::new(1500, 0.6);
const TIPS_OPTIONS: CompletionOptions = CompletionOptions::new(800, 0.6);

const TIPS_SKILL_CAP: usize = 3;

#[derive(Debug, Serialize)]
struct TranscriptEntry<'a> {
    question: &'a str,
    answer: &'a str,
    score: u8,
}

/// Answered questions as pretty JSON for the coaching prompt.
pub fn transcript(session: &InterviewSession) -> String {
    let entries: Vec<_> = session
        .answers
        .iter()
        .map(|a| TranscriptEntry {
            question: &a.question.question,
            answer: &a.answer,
            score: a.evaluation.score,
        })
        .collect();
    serde_json::to_string_pretty(&entries).unwrap_or_default()
}

/// Narrative feedback over the whole session.
pub async fn coaching_feedback(
    llm: &LlmClient,
    session: &InterviewSession,
) -> Result<String, LlmError> {
    let prompt = fill_template(COACHING_PROMPT, &[("transcript", &transcript(session))]);
    llm.chat(COACHING_SYSTEM, &prompt, COACHING_OPTIONS).await
}

/// How to approach a single question given the candidate's background.
pub async fn answer_tips(
    llm: &LlmClient,
    question: &str,
    profile: &UserProfile,
) -> Result<String, LlmError> {
    let prompt = fill_template(
        TIPS_PROMPT,
        &[
            ("question", question.trim()),
            ("candidate", &candidate_block(profile, Some(TIPS_SKILL_CAP))),
        ],
    );
    llm.chat(TIPS_SYSTEM, &prompt, TIPS_OPTIONS).await
}
