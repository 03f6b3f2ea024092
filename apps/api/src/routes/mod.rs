pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::career::handlers as career;
use crate::documents::handlers as documents;
use crate::interview::handlers as interview;
use crate::jobs::handlers as jobs;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route("/api/v1/profile/upload", post(profile::handle_upload))
        .route("/api/v1/profile/parse", post(profile::handle_parse))
        .route("/api/v1/profile/strength", post(profile::handle_strength))
        .route("/api/v1/profile/linkedin", post(profile::handle_linkedin))
        // Documents API
        .route(
            "/api/v1/documents/resume",
            post(documents::handle_generate_resume),
        )
        .route(
            "/api/v1/documents/resume/optimize",
            post(documents::handle_optimize_resume),
        )
        .route(
            "/api/v1/documents/resume/quality",
            post(documents::handle_resume_quality),
        )
        .route(
            "/api/v1/documents/resume/match",
            post(documents::handle_resume_match),
        )
        .route(
            "/api/v1/documents/job-requirements",
            post(documents::handle_job_requirements),
        )
        .route(
            "/api/v1/documents/cover-letter",
            post(documents::handle_cover_letter),
        )
        .route(
            "/api/v1/documents/cover-letter/alternative",
            post(documents::handle_alternative_cover_letter),
        )
        .route(
            "/api/v1/documents/cover-letter/quality",
            post(documents::handle_cover_letter_quality),
        )
        .route(
            "/api/v1/documents/portfolio",
            post(documents::handle_portfolio),
        )
        .route("/api/v1/documents/pdf", post(documents::handle_pdf))
        // Jobs API
        .route("/api/v1/jobs/search", post(jobs::handle_search))
        .route("/api/v1/jobs/match", post(jobs::handle_match))
        .route("/api/v1/jobs/trending", get(jobs::handle_trending))
        .route("/api/v1/jobs/salary", post(jobs::handle_salary))
        .route(
            "/api/v1/jobs/salary/insights",
            post(jobs::handle_salary_insights),
        )
        .route("/api/v1/jobs/company", post(jobs::handle_company_insights))
        .route(
            "/api/v1/jobs/alerts/preview",
            post(jobs::handle_alert_preview),
        )
        // Interview API
        .route("/api/v1/interviews", post(interview::handle_start))
        .route("/api/v1/interviews/tips", post(interview::handle_tips))
        .route(
            "/api/v1/interviews/questions",
            post(interview::handle_role_questions),
        )
        .route(
            "/api/v1/interviews/:id",
            get(interview::handle_progress).delete(interview::handle_delete),
        )
        .route(
            "/api/v1/interviews/:id/answers",
            post(interview::handle_answer),
        )
        .route("/api/v1/interviews/:id/skip", post(interview::handle_skip))
        .route(
            "/api/v1/interviews/:id/report",
            get(interview::handle_report),
        )
        .route(
            "/api/v1/interviews/:id/report/text",
            get(interview::handle_report_text),
        )
        .route(
            "/api/v1/interviews/:id/feedback",
            post(interview::handle_feedback),
        )
        // Career API
        .route("/api/v1/career/strategy", post(career::handle_strategy))
        .route("/api/v1/career/potential", post(career::handle_potential))
        .route(
            "/api/v1/career/learning-path",
            post(career::handle_learning_path),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use chrono::Utc;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::jobs::sources::{JobQuery, JobSource, ScrapeError};
    use crate::llm_client::testing::FixedBackend;
    use crate::models::job::JobListing;

    struct FixtureSource;

    #[async_trait]
    impl JobSource for FixtureSource {
        fn name(&self) -> &'static str {
            "fixture"
        }

        async fn search(&self, query: &JobQuery) -> Result<Vec<JobListing>, ScrapeError> {
            Ok(vec![JobListing {
                id: "fixture_1".to_string(),
                title: format!("{} Engineer", query.keywords),
                company: "Acme".to_string(),
                location: "Remote".to_string(),
                description: "Rust services".to_string(),
                salary_range: "$100,000".to_string(),
                employment_type: "Full-time".to_string(),
                posted_date: "Today".to_string(),
                url: String::new(),
                source: "fixture".to_string(),
                skills: vec!["Rust".to_string()],
                remote_type: Some("Remote-friendly".to_string()),
                scraped_at: Utc::now(),
                match_score: None,
                match_analysis: None,
            }])
        }
    }

    fn app(llm_answers: &[&str]) -> Router {
        let llm = FixedBackend::client(llm_answers.iter().copied());
        let mut state = AppState::new(Config::for_tests(), llm).unwrap();
        state.job_sources = vec![Arc::new(FixtureSource)];
        build_router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(&["pong"]);

        let response = send(&app, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body.get("llm_reachable").is_none());

        let body = json_body(send(&app, "GET", "/health?deep=true", None).await).await;
        assert_eq!(body["llm_reachable"], true);
    }

    #[tokio::test]
    async fn test_profile_strength() {
        let app = app(&["unused"]);
        let response = send(
            &app,
            "POST",
            "/api/v1/profile/strength",
            Some(json!({"name": "Ada", "email": "ada@example.com", "skills": ["Rust"]})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["overall_score"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_resume_requires_name() {
        let app = app(&["unused"]);
        let response = send(
            &app,
            "POST",
            "/api/v1/documents/resume",
            Some(json!({"profile": {"skills": ["Rust"]}})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_cover_letter_requires_name() {
        let app = app(&["unused"]);
        let response = send(
            &app,
            "POST",
            "/api/v1/documents/cover-letter",
            Some(json!({"profile": {"skills": ["Rust"]}, "company": "Acme"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_pdf_download() {
        let app = app(&["unused"]);
        let response = send(
            &app,
            "POST",
            "/api/v1/documents/pdf",
            Some(json!({"content": "ADA LOVELACE\nAnalyst", "title": "Ada Resume"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Ada Resume.pdf\""
        );
    }

    #[tokio::test]
    async fn test_job_search_validates_limit() {
        let app = app(&["unused"]);
        let response = send(
            &app,
            "POST",
            "/api/v1/jobs/search",
            Some(json!({"keywords": "Rust", "limit": 0})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_job_search_ranks_with_profile() {
        let app = app(&["unused"]);
        let response = send(
            &app,
            "POST",
            "/api/v1/jobs/search",
            Some(json!({
                "keywords": "Rust",
                "limit": 5,
                "filters": {"remote_only": true},
                "profile": {"name": "Ada", "skills": ["Rust"]}
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["jobs"][0]["title"], "Rust Engineer");
        assert_eq!(body["jobs"][0]["match_score"], 100);
        assert_eq!(body["sources"][0]["status"], "ok");
    }

    #[tokio::test]
    async fn test_trending_and_salary() {
        let app = app(&["unused"]);
        let body = json_body(send(&app, "GET", "/api/v1/jobs/trending", None).await).await;
        assert_eq!(body["keywords"].as_array().unwrap().len(), 10);

        let body = json_body(
            send(
                &app,
                "POST",
                "/api/v1/jobs/salary",
                Some(json!({"salary": "$100,000 - $120,000"})),
            )
            .await,
        )
        .await;
        assert_eq!(body["inr"], "₹8,300,000 - ₹9,960,000");
    }

    #[tokio::test]
    async fn test_interview_flow() {
        // Prose everywhere: fixed question set and neutral evaluations.
        let app = app(&["I'm not sure what format you want."]);

        let response = send(
            &app,
            "POST",
            "/api/v1/interviews",
            Some(json!({"job_role": "Backend Engineer", "interview_type": "Technical"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["question_source"], "fallback");
        assert_eq!(body["total_questions"], 5);
        assert_eq!(body["current_question"]["number"], 1);
        let id = body["session_id"].as_str().unwrap().to_string();

        let report_uri = format!("/api/v1/interviews/{id}/report");
        let response = send(&app, "GET", &report_uri, None).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let answer_uri = format!("/api/v1/interviews/{id}/answers");
        let response = send(&app, "POST", &answer_uri, Some(json!({"answer": "  "}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            "POST",
            &answer_uri,
            Some(json!({"answer": "I build services in Rust."})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["evaluation"]["score"], 5);
        assert_eq!(body["answered"], 1);
        assert_eq!(body["current_question"]["number"], 2);

        let body = json_body(send(&app, "GET", &report_uri, None).await).await;
        assert_eq!(body["overall_score"], 5.0);
        assert_eq!(body["performance_level"], "Fair");

        let session_uri = format!("/api/v1/interviews/{id}");
        let response = send(&app, "DELETE", &session_uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = send(&app, "GET", &session_uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_skip_and_text_report() {
        let app = app(&["not json"]);
        let body = json_body(
            send(
                &app,
                "POST",
                "/api/v1/interviews",
                Some(json!({"job_description": "Platform engineer", "company": "Acme"})),
            )
            .await,
        )
        .await;
        assert_eq!(
            body["current_question"]["question"],
            "Why are you interested in this role at Acme?"
        );
        let id = body["session_id"].as_str().unwrap().to_string();

        let response = send(&app, "POST", &format!("/api/v1/interviews/{id}/skip"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["evaluation"]["score"], 1);
        assert_eq!(body["answered"], 1);

        let response = send(&app, "GET", &format!("/api/v1/interviews/{id}/report/text"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            format!("attachment; filename=\"interview_report_{id}.txt\"").as_str()
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("Performance Level: Needs Improvement"));
        assert!(text.contains("Your Answer: Skipped"));
    }

    #[tokio::test]
    async fn test_resume_match_and_letter_quality_fall_back() {
        let app = app(&["I cannot score this."]);
        let response = send(
            &app,
            "POST",
            "/api/v1/documents/resume/match",
            Some(json!({"resume": "Rust and Kubernetes", "job_description": "Rust Kubernetes Terraform"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["match_percentage"], 67);
        assert_eq!(body["missing_keywords"], json!(["terraform"]));
        assert_eq!(body["ai_generated"], false);

        let response = send(
            &app,
            "POST",
            "/api/v1/documents/cover-letter/quality",
            Some(json!({"cover_letter": "  "})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(
            send(
                &app,
                "POST",
                "/api/v1/documents/cover-letter/quality",
                Some(json!({"cover_letter": "I am a team player.", "company": "Acme"})),
            )
            .await,
        )
        .await;
        assert_eq!(body["tone_score"], 80);
        assert_eq!(body["ai_generated"], false);
    }

    #[tokio::test]
    async fn test_salary_insights_and_career_validation() {
        let app = app(&["unused"]);
        let body = json_body(
            send(
                &app,
                "POST",
                "/api/v1/jobs/salary/insights",
                Some(json!({"job_title": "Data Scientist", "location": "Seattle"})),
            )
            .await,
        )
        .await;
        assert_eq!(body["median_salary"], 156_000);
        assert_eq!(body["benchmark_title"], "data scientist");
        assert_eq!(body["inr_range"], "₹9,462,000 - ₹16,932,000");

        let response = send(
            &app,
            "POST",
            "/api/v1/career/strategy",
            Some(json!({"profile": {"name": "Ada"}, "goals": ["CTO"]})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_answering_finished_session_conflicts() {
        let app = app(&["not json"]);
        let body = json_body(
            send(
                &app,
                "POST",
                "/api/v1/interviews",
                Some(json!({"job_description": "Data analyst role"})),
            )
            .await,
        )
        .await;
        let id = body["session_id"].as_str().unwrap().to_string();
        let answer_uri = format!("/api/v1/interviews/{id}/answers");

        for _ in 0..5 {
            let response = send(&app, "POST", &answer_uri, Some(json!({"answer": "An answer"}))).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = send(&app, "POST", &answer_uri, Some(json!({"answer": "One more"}))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
