//! HTTP handlers and request/response DTOs

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::chat::{ConversationTurn, GenerationRequest};

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Body of POST /api/chat.
///
/// Fields default to empty so that missing-field validation can answer
/// with the API's own error message instead of a deserializer error.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub document_text: String,
    #[serde(default)]
    pub user_query: String,
    #[serde(default)]
    pub chat_history: Vec<ConversationTurn>,
}

/// Successful chat response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Handler: POST /api/chat
///
/// Receives a document, the user's query, and optional chat history, and
/// returns the generated answer. Inference runs on a blocking worker
/// thread; the model handle admits one generation at a time.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    tracing::info!("Received /api/chat request");

    let Json(body) = payload.map_err(|_| ApiError::BadRequest("Request must be JSON".into()))?;

    if body.document_text.trim().is_empty() || body.user_query.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Missing 'document_text' or 'user_query' field".into(),
        ));
    }

    let request = GenerationRequest::new(&body.document_text, &body.user_query)
        .with_history(body.chat_history);

    let engine = state.engine.clone();
    let response = tokio::task::spawn_blocking(move || engine.generate(&request))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    tracing::info!("Successfully generated response");
    Ok(Json(ChatResponse { response }))
}

/// Body of POST /api/set-api-key.
#[derive(Debug, Deserialize)]
pub struct SetApiKeyRequest {
    #[serde(default)]
    pub key_name: String,
    #[serde(default)]
    pub key_value: String,
}

#[derive(Debug, Serialize)]
pub struct SetApiKeyResponse {
    pub message: String,
}

/// Handler: POST /api/set-api-key
pub async fn set_api_key(
    State(state): State<AppState>,
    payload: Result<Json<SetApiKeyRequest>, JsonRejection>,
) -> ApiResult<Json<SetApiKeyResponse>> {
    let Json(body) = payload.map_err(|_| ApiError::BadRequest("Request must be JSON".into()))?;

    if body.key_name.is_empty() || body.key_value.is_empty() {
        return Err(ApiError::BadRequest(
            "Missing 'key_name' or 'key_value'".into(),
        ));
    }

    state.api_keys.set(&body.key_name, &body.key_value);
    tracing::info!("API Key for '{}' set successfully", body.key_name);

    Ok(Json(SetApiKeyResponse {
        message: format!("API Key for '{}' set successfully.", body.key_name),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Handler: GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.engine.is_ready() {
        "ready"
    } else {
        "unavailable"
    };
    Json(HealthResponse { status })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::chat::{EngineConfig, GenerationConfig, InferenceEngine};
    use crate::server::{router, ApiKeyStore, AppState};

    fn test_state() -> AppState {
        // No model loaded: the engine is in the unavailable state
        let engine = InferenceEngine::new(
            None,
            &EngineConfig::default(),
            GenerationConfig::default(),
        );
        AppState::new(Arc::new(engine))
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_chat_missing_query_is_client_error() {
        let app = router(test_state());
        let request = json_post("/api/chat", r#"{"document_text": "some document"}"#);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Missing 'document_text' or 'user_query' field"
        );
    }

    #[tokio::test]
    async fn test_chat_empty_body_is_client_error() {
        let app = router(test_state());
        let request = json_post("/api/chat", "{}");

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("Missing"));
    }

    #[tokio::test]
    async fn test_chat_non_json_body_is_client_error() {
        let app = router(test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .body(Body::from("not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Request must be JSON");
    }

    #[tokio::test]
    async fn test_chat_unavailable_model_is_server_error() {
        let app = router(test_state());
        let request = json_post(
            "/api/chat",
            r#"{"document_text": "doc", "user_query": "what?"}"#,
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("not loaded"));
    }

    #[tokio::test]
    async fn test_chat_accepts_history() {
        let app = router(test_state());
        // History is well-formed; the request still fails on the
        // unavailable model, proving validation passed
        let request = json_post(
            "/api/chat",
            r#"{
                "document_text": "doc",
                "user_query": "what?",
                "chat_history": [{"user_query": "hi", "ai_response": "hello"}]
            }"#,
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_set_api_key_roundtrip() {
        let state = test_state();
        let app = router(state.clone());
        let request = json_post(
            "/api/set-api-key",
            r#"{"key_name": "openai", "key_value": "sk-test"}"#,
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["message"], "API Key for 'openai' set successfully.");
        assert_eq!(state.api_keys.get("openai"), Some("sk-test".to_string()));
    }

    #[tokio::test]
    async fn test_set_api_key_missing_value() {
        let app = router(test_state());
        let request = json_post("/api/set-api-key", r#"{"key_name": "openai"}"#);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing 'key_name' or 'key_value'");
    }

    #[tokio::test]
    async fn test_health_reports_unavailable() {
        let app = router(test_state());
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "unavailable");
    }
}
