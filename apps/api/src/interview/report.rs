//! End-of-session report built from the per-answer evaluations.

use std::collections::HashSet;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::session::{AnsweredQuestion, InterviewSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl PerformanceLevel {
    pub fn from_score(average: f64) -> Self {
        if average >= 8.0 {
            PerformanceLevel::Excellent
        } else if average >= 6.0 {
            PerformanceLevel::Good
        } else if average >= 4.0 {
            PerformanceLevel::Fair
        } else {
            PerformanceLevel::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Excellent",
            PerformanceLevel::Good => "Good",
            PerformanceLevel::Fair => "Fair",
            PerformanceLevel::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => {
                "Outstanding performance! You're well-prepared for this role."
            }
            PerformanceLevel::Good => "Solid performance with room for improvement in some areas.",
            PerformanceLevel::Fair => "Decent start, but significant preparation needed.",
            PerformanceLevel::NeedsImprovement => {
                "Consider more preparation and practice before the actual interview."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewReport {
    pub session_id: Uuid,
    pub overall_score: f64,
    pub performance_level: PerformanceLevel,
    pub message: String,
    pub questions_answered: usize,
    pub total_questions: usize,
    pub duration_minutes: f64,
    pub detailed_feedback: Vec<AnsweredQuestion>,
    pub strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Case-insensitive dedupe keeping the first spelling seen.
fn first_seen<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(item.trim().to_lowercase()))
        .cloned()
        .collect()
}

/// Summarizes a session as of `now`. A session without answers cannot be
/// reported on.
pub fn final_report(
    session: &InterviewSession,
    now: DateTime<Utc>,
) -> Result<InterviewReport, AppError> {
    if session.answers.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No answers submitted yet; answer at least one question first".to_string(),
        ));
    }

    let total: u32 = session
        .answers
        .iter()
        .map(|a| u32::from(a.evaluation.score))
        .sum();
    let average = f64::from(total) / session.answers.len() as f64;
    let level = PerformanceLevel::from_score(average);

    let elapsed_secs = (now - session.started_at).num_seconds().max(0) as f64;

    Ok(InterviewReport {
        session_id: session.id,
        overall_score: round_one_decimal(average),
        performance_level: level,
        message: level.message().to_string(),
        questions_answered: session.answers.len(),
        total_questions: session.questions.len(),
        duration_minutes: round_one_decimal(elapsed_secs / 60.0),
        detailed_feedback: session.answers.clone(),
        strengths: first_seen(session.answers.iter().flat_map(|a| &a.evaluation.strengths)),
        improvement_areas: first_seen(
            session
                .answers
                .iter()
                .flat_map(|a| &a.evaluation.improvements),
        ),
    })
}

/// Plain-text rendering of a report, for download.
pub fn report_text(report: &InterviewReport) -> String {
    let rule = "-".repeat(20);
    let mut out = String::new();
    let _ = writeln!(out, "INTERVIEW PERFORMANCE REPORT");
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out, "Overall Score: {:.1}/10", report.overall_score);
    let _ = writeln!(out, "Performance Level: {}", report.performance_level.label());
    let _ = writeln!(
        out,
        "Questions Answered: {} of {}",
        report.questions_answered, report.total_questions
    );
    let _ = writeln!(out, "Duration: {:.1} minutes", report.duration_minutes);
    let _ = writeln!(out, "\nSUMMARY:\n{}", report.message);
    let _ = writeln!(out, "\nDETAILED FEEDBACK:\n{rule}");

    for (i, item) in report.detailed_feedback.iter().enumerate() {
        let feedback = if item.evaluation.suggestions.trim().is_empty() {
            "No feedback available"
        } else {
            item.evaluation.suggestions.trim()
        };
        let _ = writeln!(out, "\nQuestion {}:\n{}", i + 1, item.question.question);
        let _ = writeln!(out, "Your Answer: {}", item.answer);
        let _ = writeln!(out, "Score: {}/10", item.evaluation.score);
        let _ = writeln!(out, "Feedback: {feedback}\n{rule}");
    }

    if !report.improvement_areas.is_empty() {
        let _ = writeln!(out, "\nKEY IMPROVEMENT AREAS:");
        for area in &report.improvement_areas {
            let _ = writeln!(out, "• {area}");
        }
    }
    if !report.strengths.is_empty() {
        let _ = writeln!(out, "\nSTRENGTHS DEMONSTRATED:");
        for strength in &report.strengths {
            let _ = writeln!(out, "• {strength}");
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::session::{AnswerEvaluation, InterviewQuestion, QuestionSource};
    use crate::models::profile::UserProfile;
    use chrono::Duration;

    fn answered(score: u8, strengths: &[&str], improvements: &[&str]) -> AnsweredQuestion {
        AnsweredQuestion::new(
            InterviewQuestion::default(),
            "answer".to_string(),
            AnswerEvaluation {
                score,
                strengths: strengths.iter().map(|s| s.to_string()).collect(),
                improvements: improvements.iter().map(|s| s.to_string()).collect(),
                suggestions: String::new(),
            },
        )
    }

    fn session(answers: Vec<AnsweredQuestion>) -> InterviewSession {
        let mut session = InterviewSession::new(
            UserProfile::default(),
            "role".to_string(),
            vec![InterviewQuestion::default(); 5],
            QuestionSource::Fallback,
        );
        session.answers = answers;
        session
    }

    #[test]
    fn test_report_averages_and_dedupes() {
        let s = session(vec![
            answered(8, &["Clear", "Concise"], &["Add metrics"]),
            answered(7, &["clear", "Structured"], &["Add metrics", "Slow down"]),
            answered(6, &[], &[]),
        ]);
        let report = final_report(&s, s.started_at + Duration::seconds(450)).unwrap();

        assert_eq!(report.overall_score, 7.0);
        assert_eq!(report.performance_level, PerformanceLevel::Good);
        assert_eq!(report.questions_answered, 3);
        assert_eq!(report.total_questions, 5);
        assert_eq!(report.duration_minutes, 7.5);
        assert_eq!(report.strengths, vec!["Clear", "Concise", "Structured"]);
        assert_eq!(report.improvement_areas, vec!["Add metrics", "Slow down"]);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        let s = session(vec![answered(9, &[], &[]), answered(8, &[], &[]), answered(8, &[], &[])]);
        let report = final_report(&s, Utc::now()).unwrap();
        assert_eq!(report.overall_score, 8.3);
        assert_eq!(report.performance_level, PerformanceLevel::Excellent);
    }

    #[test]
    fn test_performance_bands() {
        assert_eq!(PerformanceLevel::from_score(8.0), PerformanceLevel::Excellent);
        assert_eq!(PerformanceLevel::from_score(6.0), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_score(4.0), PerformanceLevel::Fair);
        assert_eq!(PerformanceLevel::from_score(3.9), PerformanceLevel::NeedsImprovement);
    }

    #[test]
    fn test_no_answers_is_unprocessable() {
        let err = final_report(&session(vec![]), Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_report_text_layout() {
        let mut s = session(vec![answered(8, &["Clear"], &["Add metrics"])]);
        s.answers[0].question.question = "Why Rust?".to_string();
        s.answers[0].evaluation.suggestions = "Mention the borrow checker.".to_string();
        s.answers.push(AnsweredQuestion::skipped(InterviewQuestion::default()));
        let report = final_report(&s, s.started_at + Duration::seconds(90)).unwrap();

        let text = report_text(&report);
        assert!(text.starts_with("INTERVIEW PERFORMANCE REPORT\n========"));
        assert!(text.contains("Overall Score: 4.5/10\nPerformance Level: Fair\n"));
        assert!(text.contains("Questions Answered: 2 of 5\nDuration: 1.5 minutes"));
        assert!(text.contains(
            "Question 1:\nWhy Rust?\nYour Answer: answer\nScore: 8/10\nFeedback: Mention the borrow checker."
        ));
        assert!(text.contains("Your Answer: Skipped\nScore: 1/10"));
        assert!(text.contains("KEY IMPROVEMENT AREAS:\n• Add metrics\n• Question was skipped"));
        assert!(text.ends_with("STRENGTHS DEMONSTRATED:\n• Clear"));
    }

    #[test]
    fn test_level_serializes_with_space() {
        let json = serde_json::to_string(&PerformanceLevel::NeedsImprovement).unwrap();
        assert_eq!(json, "\"Needs Improvement\"");
    }
}
