use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::UserProfile;

/// Sessions kept in memory before the oldest is evicted.
pub const DEFAULT_SESSION_CAPACITY: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    #[serde(alias = "focus")]
    pub focus_area: String,
}

impl Default for InterviewQuestion {
    fn default() -> Self {
        Self {
            question: String::new(),
            kind: "general".to_string(),
            difficulty: "medium".to_string(),
            focus_area: "general".to_string(),
        }
    }
}

/// Answer text recorded for a skipped question.
pub const SKIPPED_ANSWER: &str = "Skipped";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    /// 1 – 10
    pub score: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub suggestions: String,
}

impl AnswerEvaluation {
    /// Lowest score, no model call.
    pub fn skipped() -> Self {
        Self {
            score: 1,
            strengths: Vec::new(),
            improvements: vec!["Question was skipped".to_string()],
            suggestions: "Prepare an answer for this kind of question before the real interview."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnsweredQuestion {
    pub question: InterviewQuestion,
    pub answer: String,
    pub evaluation: AnswerEvaluation,
    pub skipped: bool,
}

impl AnsweredQuestion {
    pub fn new(question: InterviewQuestion, answer: String, evaluation: AnswerEvaluation) -> Self {
        Self {
            question,
            answer,
            evaluation,
            skipped: false,
        }
    }

    pub fn skipped(question: InterviewQuestion) -> Self {
        Self {
            question,
            answer: SKIPPED_ANSWER.to_string(),
            evaluation: AnswerEvaluation::skipped(),
            skipped: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    Llm,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct InterviewSession {
    pub id: Uuid,
    pub profile: UserProfile,
    pub job_description: String,
    pub questions: Vec<InterviewQuestion>,
    pub question_source: QuestionSource,
    pub answers: Vec<AnsweredQuestion>,
    pub started_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new(
        profile: UserProfile,
        job_description: String,
        questions: Vec<InterviewQuestion>,
        question_source: QuestionSource,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile,
            job_description,
            questions,
            question_source,
            answers: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// The next unanswered question, if any.
    pub fn current_question(&self) -> Option<&InterviewQuestion> {
        self.questions.get(self.answers.len())
    }

    pub fn is_finished(&self) -> bool {
        self.answers.len() >= self.questions.len()
    }
}

/// Position of the next question, numbered from 1.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub number: usize,
    #[serde(flatten)]
    pub question: InterviewQuestion,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionProgress {
    pub session_id: Uuid,
    pub answered: usize,
    pub total_questions: usize,
    pub finished: bool,
    pub current_question: Option<QuestionView>,
}

impl From<&InterviewSession> for SessionProgress {
    fn from(session: &InterviewSession) -> Self {
        Self {
            session_id: session.id,
            answered: session.answers.len(),
            total_questions: session.questions.len(),
            finished: session.is_finished(),
            current_question: session.current_question().map(|q| QuestionView {
                number: session.answers.len() + 1,
                question: q.clone(),
            }),
        }
    }
}

/// In-memory interview sessions shared through `AppState`.
///
/// Bounded: inserting beyond capacity evicts the session that started first.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, InterviewSession>>>,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SESSION_CAPACITY)
    }
}

impl SessionStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    pub async fn insert(&self, session: InterviewSession) -> Uuid {
        let id = session.id;
        let mut sessions = self.sessions.write().await;

        while sessions.len() >= self.capacity {
            let Some(oldest) = sessions
                .values()
                .min_by_key(|s| s.started_at)
                .map(|s| s.id)
            else {
                break;
            };
            sessions.remove(&oldest);
            info!("Evicted interview session {oldest} (store at capacity)");
        }

        sessions.insert(id, session);
        id
    }

    /// A snapshot of the session; `NotFound` when it does not exist.
    pub async fn get(&self, id: Uuid) -> Result<InterviewSession, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Appends the answer to question `index`. Fails with `Conflict` when the
    /// session has moved on since the question was read.
    pub async fn record_answer(
        &self,
        id: Uuid,
        index: usize,
        answered: AnsweredQuestion,
    ) -> Result<SessionProgress, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;

        if session.answers.len() != index || session.is_finished() {
            return Err(AppError::Conflict(format!(
                "Question {} of session {id} was already answered",
                index + 1
            )));
        }
        session.answers.push(answered);
        Ok(SessionProgress::from(&*session))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Interview session {id} not found"))
}
