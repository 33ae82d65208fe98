//! Health endpoint
//!
//! Every request that is not a WebSocket upgrade gets a fixed readiness
//! payload, whatever the path or method.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// Body of the health response
pub fn health_body(service: &str) -> Value {
    json!({ "ok": true, "service": service })
}

/// Readiness response for `service`
pub fn health_response(service: &str) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        Json(health_body(service)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn test_health_body() {
        assert_eq!(
            health_body("ticket-board"),
            json!({"ok": true, "service": "ticket-board"})
        );
    }

    #[tokio::test]
    async fn test_health_response() {
        let response = health_response("matchmaking");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"ok": true, "service": "matchmaking"}));
    }
}
