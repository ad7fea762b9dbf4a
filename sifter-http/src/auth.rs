use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

/// Reject requests whose `Authorization` header is not exactly `token`.
///
/// The header value is compared verbatim; no scheme prefix is stripped.
pub async fn require_token(request: Request, next: Next, token: &str) -> Result<Response, Response> {
    if request.method() == Method::OPTIONS || request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if presented != Some(token) {
        tracing::debug!(path = %request.uri().path(), "Rejected request with bad token");
        return Err(unauthorized());
    }

    Ok(next.run(request).await)
}
