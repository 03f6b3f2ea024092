use tracing::{info, warn};

use crate::interview::prompts::{
    QUESTIONS_PROMPT, QUESTIONS_SYSTEM, ROLE_QUESTIONS_PROMPT, ROLE_QUESTIONS_SYSTEM,
};
use crate::interview::session::{InterviewQuestion, QuestionSource};
use crate::llm_client::prompts::{candidate_block, fill_template, JSON_ONLY_SUFFIX};
use crate::llm_client::{CompletionOptions, LlmClient, LlmError};
use crate::models::profile::UserProfile;

const QUESTIONS_OPTIONS: CompletionOptions = CompletionOptions::new(1500, 0.8);
const ROLE_QUESTIONS_OPTIONS: CompletionOptions = CompletionOptions::new(1200, 0.7);

pub const QUESTIONS_PER_SESSION: usize = 5;
const PROMPT_SKILL_CAP: usize = 5;

/// Used when the LLM answer has no usable questions.
const FALLBACK_QUESTIONS: [(&str, &str, &str, &str); QUESTIONS_PER_SESSION] = [
    (
        "Tell me about yourself and why you're interested in this position.",
        "general",
        "easy",
        "introduction",
    ),
    (
        "Describe a challenging project you worked on and how you overcame obstacles.",
        "behavioral",
        "medium",
        "problem_solving",
    ),
    (
        "What technical skills do you consider your strongest, and can you give an example of how you've applied them?",
        "technical",
        "medium",
        "technical_skills",
    ),
    (
        "How do you handle working under pressure and tight deadlines?",
        "behavioral",
        "medium",
        "stress_management",
    ),
    (
        "Where do you see yourself in 3-5 years, and how does this role fit into your career goals?",
        "career_goals",
        "easy",
        "future_planning",
    ),
];

/// Company-specific set; `{company}` is filled in.
const FALLBACK_ROLE_QUESTIONS: [(&str, &str, &str, &str); QUESTIONS_PER_SESSION] = [
    (
        "Why are you interested in this role at {company}?",
        "motivation",
        "easy",
        "company_fit",
    ),
    (
        "Describe your experience with the key technologies mentioned in the job description.",
        "technical",
        "medium",
        "skills",
    ),
    (
        "How would you approach solving the main challenges mentioned in this role?",
        "problem_solving",
        "hard",
        "approach",
    ),
    (
        "Tell me about a time you had to learn a new skill quickly.",
        "behavioral",
        "medium",
        "adaptability",
    ),
    (
        "Where do you see yourself growing in this position?",
        "career",
        "easy",
        "growth",
    ),
];

fn to_questions(
    set: &[(&str, &str, &str, &str)],
    values: &[(&str, &str)],
) -> Vec<InterviewQuestion> {
    set.iter()
        .map(|(question, kind, difficulty, focus_area)| InterviewQuestion {
            question: fill_template(question, values),
            kind: kind.to_string(),
            difficulty: difficulty.to_string(),
            focus_area: focus_area.to_string(),
        })
        .collect()
}

pub fn fallback_questions() -> Vec<InterviewQuestion> {
    to_questions(&FALLBACK_QUESTIONS, &[])
}

pub fn fallback_role_questions(company: &str) -> Vec<InterviewQuestion> {
    to_questions(&FALLBACK_ROLE_QUESTIONS, &[("company", company.trim())])
}

/// Builds the job description used when the caller only names an interview
/// type and a role.
pub fn describe_interview(interview_type: &str, job_role: &str) -> String {
    format!("{} interview for {} position", interview_type.trim(), job_role.trim())
}

/// Asks the LLM for a question set. Unusable output falls back to the fixed
/// set; transport failures propagate.
pub async fn generate_questions(
    llm: &LlmClient,
    profile: &UserProfile,
    job_description: &str,
) -> Result<(Vec<InterviewQuestion>, QuestionSource), LlmError> {
    let prompt = fill_template(
        QUESTIONS_PROMPT,
        &[
            ("job_description", job_description),
            ("candidate", &candidate_block(profile, Some(PROMPT_SKILL_CAP))),
        ],
    );
    let system = format!("{QUESTIONS_SYSTEM}{JSON_ONLY_SUFFIX}");
    request_questions(llm, &system, &prompt, QUESTIONS_OPTIONS, fallback_questions).await
}

/// Questions tailored to one company's posting. Same fallback rules as
/// `generate_questions`, with a company-specific fixed set.
pub async fn generate_role_questions(
    llm: &LlmClient,
    profile: &UserProfile,
    job_description: &str,
    company: &str,
) -> Result<(Vec<InterviewQuestion>, QuestionSource), LlmError> {
    let prompt = fill_template(
        ROLE_QUESTIONS_PROMPT,
        &[
            ("job_description", job_description),
            ("company", company.trim()),
            ("candidate", &candidate_block(profile, Some(PROMPT_SKILL_CAP))),
        ],
    );
    let system = format!("{ROLE_QUESTIONS_SYSTEM}{JSON_ONLY_SUFFIX}");
    request_questions(llm, &system, &prompt, ROLE_QUESTIONS_OPTIONS, || {
        fallback_role_questions(company)
    })
    .await
}

async fn request_questions(
    llm: &LlmClient,
    system: &str,
    prompt: &str,
    options: CompletionOptions,
    fallback: impl FnOnce() -> Vec<InterviewQuestion>,
) -> Result<(Vec<InterviewQuestion>, QuestionSource), LlmError> {
    match llm
        .chat_json::<Vec<InterviewQuestion>>(system, prompt, options)
        .await
    {
        Ok(questions) => {
            let questions: Vec<_> = questions
                .into_iter()
                .filter(|q| !q.question.trim().is_empty())
                .take(QUESTIONS_PER_SESSION)
                .collect();
            if questions.is_empty() {
                warn!("LLM returned no interview questions; using the fixed set");
                return Ok((fallback(), QuestionSource::Fallback));
            }
            info!("Generated {} interview questions", questions.len());
            Ok((questions, QuestionSource::Llm))
        }
        Err(e) if e.is_unusable_output() => {
            warn!("Unusable interview questions ({e}); using the fixed set");
            Ok((fallback(), QuestionSource::Fallback))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::FixedBackend;

    #[tokio::test]
    async fn test_llm_questions_are_capped() {
        let questions: Vec<String> = (1..=7)
            .map(|i| format!(r#"{{"question": "Question {i}?", "type": "technical"}}"#))
            .collect();
        let llm = FixedBackend::client([format!("[{}]", questions.join(","))]);

        let (set, source) = generate_questions(&llm, &UserProfile::default(), "Rust developer")
            .await
            .unwrap();
        assert_eq!(source, QuestionSource::Llm);
        assert_eq!(set.len(), QUESTIONS_PER_SESSION);
        assert_eq!(set[0].question, "Question 1?");
        assert_eq!(set[0].kind, "technical");
    }

    #[tokio::test]
    async fn test_prose_answer_uses_fixed_set() {
        let llm = FixedBackend::client(["Sure, here are some great questions for you!"]);
        let (set, source) = generate_questions(&llm, &UserProfile::default(), "Analyst")
            .await
            .unwrap();
        assert_eq!(source, QuestionSource::Fallback);
        assert_eq!(set, fallback_questions());
    }

    #[tokio::test]
    async fn test_empty_array_uses_fixed_set() {
        let llm = FixedBackend::client([r#"[{"question": "  "}]"#]);
        let (set, source) = generate_questions(&llm, &UserProfile::default(), "Analyst")
            .await
            .unwrap();
        assert_eq!(source, QuestionSource::Fallback);
        assert_eq!(set.len(), QUESTIONS_PER_SESSION);
    }

    #[tokio::test]
    async fn test_role_questions_fall_back_with_company() {
        let llm = FixedBackend::client(["These are tailored questions."]);
        let (set, source) =
            generate_role_questions(&llm, &UserProfile::default(), "Platform engineer", " Acme ")
                .await
                .unwrap();
        assert_eq!(source, QuestionSource::Fallback);
        assert_eq!(set[0].question, "Why are you interested in this role at Acme?");
        assert_eq!(set[0].focus_area, "company_fit");
        assert_eq!(set.len(), QUESTIONS_PER_SESSION);
    }

    #[tokio::test]
    async fn test_role_questions_accept_focus_key() {
        let llm = FixedBackend::client([
            r#"[{"question": "How would you scale Acme's API?", "type": "technical", "focus": "scaling"}]"#,
        ]);
        let (set, source) =
            generate_role_questions(&llm, &UserProfile::default(), "Platform engineer", "Acme")
                .await
                .unwrap();
        assert_eq!(source, QuestionSource::Llm);
        assert_eq!(set[0].focus_area, "scaling");
    }

    #[test]
    fn test_describe_interview() {
        assert_eq!(
            describe_interview(" Technical ", "Data Engineer"),
            "Technical interview for Data Engineer position"
        );
    }
}
