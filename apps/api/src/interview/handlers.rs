//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{require_non_empty, AppError};
use crate::interview::coaching::{answer_tips, coaching_feedback};
use crate::interview::evaluation::evaluate_answer;
use crate::interview::questions::{describe_interview, generate_questions, generate_role_questions};
use crate::interview::report::{final_report, report_text, InterviewReport};
use crate::interview::session::{
    AnswerEvaluation, AnsweredQuestion, InterviewQuestion, InterviewSession, QuestionSource,
    SessionProgress,
};
use crate::models::profile::UserProfile;
use crate::state::AppState;

const DEFAULT_INTERVIEW_TYPE: &str = "General";

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub profile: UserProfile,
    pub job_description: Option<String>,
    pub interview_type: Option<String>,
    pub job_role: Option<String>,
    /// When set, questions are tailored to this company.
    pub company: Option<String>,
}

impl StartRequest {
    /// The job description, or one built from type + role.
    fn resolved_description(&self) -> Result<String, AppError> {
        if let Some(jd) = self.job_description.as_deref().filter(|d| !d.trim().is_empty()) {
            return Ok(jd.trim().to_string());
        }
        match self.job_role.as_deref().filter(|r| !r.trim().is_empty()) {
            Some(role) => Ok(describe_interview(
                self.interview_type
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or(DEFAULT_INTERVIEW_TYPE),
                role,
            )),
            None => Err(AppError::Validation(
                "Provide a job_description or a job_role".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub question_source: QuestionSource,
    #[serde(flatten)]
    pub progress: SessionProgress,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub evaluation: AnswerEvaluation,
    #[serde(flatten)]
    pub progress: SessionProgress,
}

#[derive(Debug, Deserialize)]
pub struct RoleQuestionsRequest {
    pub job_description: String,
    pub company: String,
    #[serde(default)]
    pub profile: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct RoleQuestionsResponse {
    pub question_source: QuestionSource,
    pub questions: Vec<InterviewQuestion>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub session_id: Uuid,
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct TipsRequest {
    pub question: String,
    #[serde(default)]
    pub profile: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct TipsResponse {
    pub tips: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
pub async fn handle_start(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Result<(StatusCode, Json<StartResponse>), AppError> {
    let job_description = request.resolved_description()?;
    let profile = request.profile.normalized();

    let (questions, source) = match request.company.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(company) => {
            generate_role_questions(&state.llm, &profile, &job_description, company).await?
        }
        None => generate_questions(&state.llm, &profile, &job_description).await?,
    };
    let session = InterviewSession::new(profile, job_description, questions, source);
    let progress = SessionProgress::from(&session);
    let id = state.interviews.insert(session).await;
    info!("Started interview session {id} ({source:?} questions)");

    Ok((
        StatusCode::CREATED,
        Json(StartResponse {
            question_source: source,
            progress,
        }),
    ))
}

/// GET /api/v1/interviews/:id
pub async fn handle_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionProgress>, AppError> {
    let session = state.interviews.get(id).await?;
    Ok(Json(SessionProgress::from(&session)))
}

/// POST /api/v1/interviews/:id/answers
///
/// The store lock is not held while the LLM evaluates; the answer is recorded
/// only if the session has not moved on in the meantime.
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    require_non_empty(&request.answer, "answer")?;

    let session = state.interviews.get(id).await?;
    let index = session.answers.len();
    let question = session.current_question().cloned().ok_or_else(|| {
        AppError::Conflict(format!("Interview session {id} has no questions left"))
    })?;

    let answer = request.answer.trim().to_string();
    let evaluation = evaluate_answer(&state.llm, &question.question, &answer, &session.profile).await?;

    let progress = state
        .interviews
        .record_answer(
            id,
            index,
            AnsweredQuestion::new(question, answer, evaluation.clone()),
        )
        .await?;

    Ok(Json(AnswerResponse {
        evaluation,
        progress,
    }))
}

/// POST /api/v1/interviews/:id/skip
///
/// Records the current question as skipped with the lowest score; the model
/// is not consulted.
pub async fn handle_skip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnswerResponse>, AppError> {
    let session = state.interviews.get(id).await?;
    let index = session.answers.len();
    let question = session.current_question().cloned().ok_or_else(|| {
        AppError::Conflict(format!("Interview session {id} has no questions left"))
    })?;

    let skipped = AnsweredQuestion::skipped(question);
    let evaluation = skipped.evaluation.clone();
    let progress = state.interviews.record_answer(id, index, skipped).await?;
    info!("Question {} of session {id} skipped", index + 1);

    Ok(Json(AnswerResponse {
        evaluation,
        progress,
    }))
}

/// GET /api/v1/interviews/:id/report
pub async fn handle_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewReport>, AppError> {
    let session = state.interviews.get(id).await?;
    Ok(Json(final_report(&session, Utc::now())?))
}

/// GET /api/v1/interviews/:id/report/text
pub async fn handle_report_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = state.interviews.get(id).await?;
    let report = final_report(&session, Utc::now())?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"interview_report_{id}.txt\""),
            ),
        ],
        report_text(&report),
    )
        .into_response())
}

/// POST /api/v1/interviews/:id/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let session = state.interviews.get(id).await?;
    if session.answers.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No answers submitted yet; answer at least one question first".to_string(),
        ));
    }

    let feedback = coaching_feedback(&state.llm, &session).await?;
    Ok(Json(FeedbackResponse {
        session_id: id,
        feedback,
    }))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.interviews.remove(id).await?;
    info!("Ended interview session {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/interviews/questions
pub async fn handle_role_questions(
    State(state): State<AppState>,
    Json(request): Json<RoleQuestionsRequest>,
) -> Result<Json<RoleQuestionsResponse>, AppError> {
    require_non_empty(&request.job_description, "job_description")?;
    require_non_empty(&request.company, "company")?;
    let profile = request.profile.normalized();

    let (questions, question_source) = generate_role_questions(
        &state.llm,
        &profile,
        request.job_description.trim(),
        &request.company,
    )
    .await?;
    Ok(Json(RoleQuestionsResponse {
        question_source,
        questions,
    }))
}

/// POST /api/v1/interviews/tips
pub async fn handle_tips(
    State(state): State<AppState>,
    Json(request): Json<TipsRequest>,
) -> Result<Json<TipsResponse>, AppError> {
    require_non_empty(&request.question, "question")?;
    let profile = request.profile.normalized();

    let tips = answer_tips(&state.llm, &request.question, &profile).await?;
    Ok(Json(TipsResponse { tips }))
}
