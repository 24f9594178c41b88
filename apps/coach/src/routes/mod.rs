pub mod bearer;
pub mod handlers;
pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/actions/auth/login", post(handlers::handle_login))
        .route("/actions/auth/register", post(handlers::handle_register))
        // Profile
        .route(
            "/actions/user/onboarding",
            get(handlers::handle_onboarding_status),
        )
        .route("/actions/user/profile", put(handlers::handle_update_profile))
        // Dashboard
        .route("/actions/insights", get(handlers::handle_insights))
        .route(
            "/actions/insights/:industry",
            get(handlers::handle_industry_insights),
        )
        // Cover letters
        .route(
            "/actions/cover-letters",
            get(handlers::handle_list_cover_letters).post(handlers::handle_generate_cover_letter),
        )
        .route(
            "/actions/cover-letters/:id",
            get(handlers::handle_get_cover_letter).delete(handlers::handle_delete_cover_letter),
        )
        // Interview
        .route("/actions/interview/quiz", post(handlers::handle_generate_quiz))
        .route(
            "/actions/interview/results",
            post(handlers::handle_save_quiz_result),
        )
        .route(
            "/actions/interview/assessments",
            get(handlers::handle_assessments),
        )
        // Resume
        .route(
            "/actions/resume",
            get(handlers::handle_resume_history).post(handlers::handle_save_resume),
        )
        .route("/actions/resume/improve", post(handlers::handle_improve_resume))
        .route("/actions/resume/analyze", post(handlers::handle_analyze_resume))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::ScriptedCompletion;
    use crate::testing::StubBackend;

    fn app(backend: &StubBackend, llm: ScriptedCompletion) -> Router {
        build_router(AppState {
            config: Config::for_backend(&backend.url()),
            api: backend.client(),
            llm: Arc::new(llm),
        })
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let backend = StubBackend::start().await;
        let response = app(&backend, ScriptedCompletion::failing())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_login_forwards_credentials() {
        let backend = StubBackend::start().await;
        let app = app(&backend, ScriptedCompletion::failing());

        let ok = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/actions/auth/login",
                json!({ "email": "a@b.c", "password": "secret" }),
            ))
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(body_json(ok).await["token"], "stub-token");

        let rejected = app
            .oneshot(json_request(
                "POST",
                "/actions/auth/login",
                json!({ "email": "a@b.c", "password": "wrong" }),
            ))
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(rejected).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_bearer_token_is_forwarded() {
        let backend = StubBackend::start().await;
        let response = app(&backend, ScriptedCompletion::failing())
            .oneshot(
                Request::get("/actions/user/onboarding")
                    .header(header::AUTHORIZATION, "Bearer abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["isOnboarded"], false);
        assert_eq!(
            backend.state().last_authorization.as_deref(),
            Some("Bearer abc123")
        );
    }

    #[tokio::test]
    async fn test_malformed_authorization_is_rejected() {
        let backend = StubBackend::start().await;
        let response = app(&backend, ScriptedCompletion::failing())
            .oneshot(
                Request::get("/actions/insights")
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwdw==")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_insights_fall_back_when_completion_fails() {
        let backend = StubBackend::start().await;
        let response = app(&backend, ScriptedCompletion::failing())
            .oneshot(
                Request::get("/actions/insights/Healthcare")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["demandLevel"], "High");
        assert_eq!(body["salaryRanges"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_cover_letter_lifecycle() {
        let backend = StubBackend::start().await;
        let app = app(
            &backend,
            ScriptedCompletion::replying(&["Dear Hiring Manager, ..."]),
        );

        let created = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/actions/cover-letters",
                json!({
                    "jobTitle": "Backend Engineer",
                    "companyName": "Acme",
                    "jobDescription": "Build services"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let id = body_json(created).await["id"].as_str().unwrap().to_string();

        let deleted = app
            .clone()
            .oneshot(
                Request::delete(format!("/actions/cover-letters/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let missing = app
            .oneshot(
                Request::get(format!("/actions/cover-letters/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cover_letter_missing_fields() {
        let backend = StubBackend::start().await;
        let response = app(&backend, ScriptedCompletion::replying(&["unused"]))
            .oneshot(json_request(
                "POST",
                "/actions/cover-letters",
                json!({ "jobTitle": "Backend Engineer" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(backend.state().cover_letters.is_empty());
    }

    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let boundary = "coach-test-boundary";
        let mut body = String::new();
        for (name, file_name, content) in parts {
            body.push_str(&format!("--{boundary}\r\n"));
            match file_name {
                Some(file_name) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{boundary}--\r\n"));

        Request::post("/actions/resume/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_resume_analysis_passes_upload_through() {
        let backend = StubBackend::start().await;
        let response = app(&backend, ScriptedCompletion::failing())
            .oneshot(multipart_request(&[
                ("resume", Some("cv.pdf"), "%PDF-1.4 fake resume"),
                ("jobDescription", None, "Rust backend engineer"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["atsScore"], 72);
        assert_eq!(
            backend.state().uploads,
            vec![("cv.pdf".to_string(), "Rust backend engineer".to_string())]
        );
    }

    #[tokio::test]
    async fn test_resume_analysis_without_file_is_rejected() {
        let backend = StubBackend::start().await;
        let response = app(&backend, ScriptedCompletion::failing())
            .oneshot(multipart_request(&[("jobDescription", None, "anything")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(backend.state().uploads.is_empty());
    }

    #[tokio::test]
    async fn test_improve_resume_uses_completion() {
        let backend = StubBackend::start().await;
        let response = app(
            &backend,
            ScriptedCompletion::replying(&["  Led a team of five engineers.  "]),
        )
        .oneshot(json_request(
            "POST",
            "/actions/resume/improve",
            json!({ "current": "managed people", "type": "experience" }),
        ))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["content"],
            "Led a team of five engineers."
        );
    }
}
