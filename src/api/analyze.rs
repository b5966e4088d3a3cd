//! REST API endpoint for message risk analysis

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use utoipa::{OpenApi, ToSchema};

use crate::api::error::{ApiError, ErrorResponse};
use crate::app::AppState;
use crate::model::{RiskAssessment, RiskLevel};

/// Request body for message analysis
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// The free-text message to analyze
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub message: Option<Value>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        analyze_message,
        crate::api::health::liveness,
        crate::api::health::readiness
    ),
    components(schemas(
        AnalyzeRequest,
        RiskAssessment,
        RiskLevel,
        ErrorResponse,
        crate::api::health::HealthStatus,
        crate::api::health::ReadinessStatus,
        crate::api::health::DependencyHealth
    )),
    tags(
        (name = "analysis", description = "Message scam-risk analysis"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Analyze a message for scam risk
///
/// The provider credential and the message are both validated before any
/// provider call. The analysis itself never fails: provider or parsing
/// failures produce the fixed fallback assessment with status 200.
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Risk assessment (the fallback assessment when the provider or parsing fails)", body = RiskAssessment),
        (status = 400, description = "Missing, non-string or blank message", body = ErrorResponse),
        (status = 500, description = "Completion provider credential not configured", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/analyze")]
pub async fn analyze_message(
    state: web::Data<AppState>,
    body: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, ApiError> {
    let service = state
        .analysis
        .as_ref()
        .ok_or(ApiError::MissingConfig("GROQ_API_KEY"))?;

    // The message is forwarded verbatim; trimming is only for validation
    let message = match body.message.as_ref().and_then(Value::as_str) {
        Some(message) if !message.trim().is_empty() => message,
        _ => {
            return Err(ApiError::BadRequest(
                "Invalid input. 'message' must be a non-empty string.".to_string(),
            ));
        }
    };

    let assessment = service.analyze(message).await;
    Ok(HttpResponse::Ok().json(assessment))
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(format!("Invalid JSON body: {}", err)).into()
    }))
    .service(analyze_message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::llm::{CompletionBackend, CompletionError};
    use crate::service::AnalysisService;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Backend that counts calls and returns a canned completion, or fails
    /// when no completion is configured.
    struct StubBackend {
        calls: AtomicUsize,
        completion: Option<&'static str>,
    }

    impl StubBackend {
        fn succeeding(completion: &'static str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                completion: Some(completion),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                completion: None,
            })
        }
    }

    #[async_trait]
    impl CompletionBackend for StubBackend {
        async fn complete(&self, _: &str, _: &str) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.completion {
                Some(completion) => Ok(completion.to_string()),
                None => Err(CompletionError::Status {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                    body: "upstream unavailable".to_string(),
                }),
            }
        }
    }

    fn state_with(backend: Arc<StubBackend>) -> web::Data<AppState> {
        let backend: Arc<dyn CompletionBackend> = backend;
        web::Data::new(AppState {
            analysis: Some(AnalysisService::new(backend)),
        })
    }

    #[actix_web::test]
    async fn test_blank_message_rejected_without_provider_call() {
        let backend = StubBackend::succeeding("{}");
        let app = test::init_service(
            App::new()
                .app_data(state_with(backend.clone()))
                .configure(configure),
        )
        .await;

        for body in [
            serde_json::json!({ "message": "   " }),
            serde_json::json!({ "message": "" }),
            serde_json::json!({ "message": 42 }),
            serde_json::json!({}),
        ] {
            let req = test::TestRequest::post()
                .uri("/analyze")
                .set_json(&body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        }

        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_missing_credential_rejected_without_provider_call() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState { analysis: None }))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/analyze")
            .set_json(serde_json::json!({ "message": "hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "missing_config");
    }

    #[actix_web::test]
    async fn test_analysis_success_returns_wire_fields() {
        let backend = StubBackend::succeeding(
            r#"{"risk_score": 82, "risk_level": "High", "reasoning": ["Urgent payment request"], "actions": ["Do not click the link"]}"#,
        );
        let app = test::init_service(
            App::new()
                .app_data(state_with(backend.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/analyze")
            .set_json(serde_json::json!({ "message": "Pay now or your account is closed" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["riskScore"], 82);
        assert_eq!(body["riskLevel"], "High");
        assert_eq!(body["reasoning"][0], "Urgent payment request");
        assert_eq!(body["actions"][0], "Do not click the link");
        assert_eq!(body.as_object().unwrap().len(), 4);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_provider_failure_returns_200_with_fallback() {
        let backend = StubBackend::failing();
        let app = test::init_service(
            App::new()
                .app_data(state_with(backend.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/analyze")
            .set_json(serde_json::json!({ "message": "hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: RiskAssessment = test::read_body_json(resp).await;
        assert_eq!(body, RiskAssessment::fallback());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_malformed_json_body_rejected() {
        let backend = StubBackend::succeeding("{}");
        let app = test::init_service(
            App::new()
                .app_data(state_with(backend.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/analyze")
            .insert_header(("content-type", "application/json"))
            .set_payload("not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }
}
