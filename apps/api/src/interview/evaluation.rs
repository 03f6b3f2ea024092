use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::interview::prompts::{EVALUATION_PROMPT, EVALUATION_SYSTEM};
use crate::interview::session::AnswerEvaluation;
use crate::llm_client::prompts::{fill_template, or_placeholder, JSON_ONLY_SUFFIX};
use crate::llm_client::scores::lenient_number;
use crate::llm_client::{CompletionOptions, LlmClient, LlmError};
use crate::models::profile::UserProfile;

const EVALUATION_OPTIONS: CompletionOptions = CompletionOptions::new(1000, 0.6);

const NEUTRAL_SCORE: u8 = 5;
const PROMPT_SKILL_CAP: usize = 3;
const NEUTRAL_SUGGESTION: &str =
    "Try to include specific examples and measurable outcomes to strengthen your answer.";

/// Evaluation as the model writes it: numbers may be floats and
/// `suggestions` is sometimes a list.
#[derive(Debug, Deserialize)]
struct RawEvaluation {
    #[serde(default, deserialize_with = "lenient_number")]
    score: Option<f64>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    suggestions: Value,
}

/// Used when the model's answer cannot be read.
pub fn neutral_evaluation() -> AnswerEvaluation {
    AnswerEvaluation {
        score: NEUTRAL_SCORE,
        strengths: Vec::new(),
        improvements: Vec::new(),
        suggestions: NEUTRAL_SUGGESTION.to_string(),
    }
}

fn normalize(raw: RawEvaluation) -> AnswerEvaluation {
    let score = raw
        .score
        .map(|s| s.round().clamp(1.0, 10.0) as u8)
        .unwrap_or(NEUTRAL_SCORE);

    let suggestions = match raw.suggestions {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    };

    let clean = |items: Vec<String>| -> Vec<String> {
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    };

    AnswerEvaluation {
        score,
        strengths: clean(raw.strengths),
        improvements: clean(raw.improvements),
        suggestions: if suggestions.is_empty() {
            NEUTRAL_SUGGESTION.to_string()
        } else {
            suggestions
        },
    }
}

/// Scores one answer. Unreadable model output yields the neutral evaluation;
/// transport failures propagate.
pub async fn evaluate_answer(
    llm: &LlmClient,
    question: &str,
    answer: &str,
    profile: &UserProfile,
) -> Result<AnswerEvaluation, LlmError> {
    let skills: Vec<&str> = profile
        .skills
        .iter()
        .take(PROMPT_SKILL_CAP)
        .map(String::as_str)
        .collect();
    let prompt = fill_template(
        EVALUATION_PROMPT,
        &[
            ("question", question),
            ("answer", answer),
            ("title", or_placeholder(&profile.title, "Professional")),
            ("skills", &skills.join(", ")),
        ],
    );
    let system = format!("{EVALUATION_SYSTEM}{JSON_ONLY_SUFFIX}");

    match llm
        .chat_json::<RawEvaluation>(&system, &prompt, EVALUATION_OPTIONS)
        .await
    {
        Ok(raw) => Ok(normalize(raw)),
        Err(e) if e.is_unusable_output() => {
            warn!("Unusable answer evaluation ({e}); using neutral score");
            Ok(neutral_evaluation())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::FixedBackend;

    async fn evaluate(answer: &str) -> AnswerEvaluation {
        let llm = FixedBackend::client([answer]);
        evaluate_answer(&llm, "Why Rust?", "Because of safety.", &UserProfile::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_parses_evaluation() {
        let eval = evaluate(
            r#"{"score": 8, "strengths": ["Clear", " "], "improvements": ["Add numbers"], "suggestions": "Quantify impact."}"#,
        )
        .await;
        assert_eq!(eval.score, 8);
        assert_eq!(eval.strengths, vec!["Clear"]);
        assert_eq!(eval.improvements, vec!["Add numbers"]);
        assert_eq!(eval.suggestions, "Quantify impact.");
    }

    #[tokio::test]
    async fn test_score_is_clamped() {
        assert_eq!(evaluate(r#"{"score": 14}"#).await.score, 10);
        assert_eq!(evaluate(r#"{"score": 0}"#).await.score, 1);
        assert_eq!(evaluate(r#"{"score": 7.6}"#).await.score, 8);
        assert_eq!(evaluate(r#"{"score": "9"}"#).await.score, 9);
    }

    #[tokio::test]
    async fn test_list_suggestions_are_joined() {
        let eval = evaluate(r#"{"score": 6, "suggestions": ["Use STAR.", "Be brief."]}"#).await;
        assert_eq!(eval.suggestions, "Use STAR. Be brief.");
    }

    #[tokio::test]
    async fn test_unparseable_answer_is_neutral() {
        let eval = evaluate("Great answer, 9 out of 10!").await;
        assert_eq!(eval, neutral_evaluation());
        assert!(eval.strengths.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let llm = LlmClient::new(std::sync::Arc::new(FixedBackend::failing(503)));
        let result = evaluate_answer(&llm, "Q", "A", &UserProfile::default()).await;
        assert!(result.is_err());
    }
}
