use axum::{
    body::Body as AxumBody,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};

/// Turns any bare `OPTIONS` answer into an empty 204. Wraps the CORS layer, so
/// the `Access-Control-*` headers it set are kept. Runs ahead of routing, which
/// means OPTIONS never reaches authentication.
pub async fn preflight(req: Request<AxumBody>, next: Next) -> Response {
    if req.method() != Method::OPTIONS {
        return next.run(req).await;
    }

    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_success() || status == StatusCode::METHOD_NOT_ALLOWED) {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.status = StatusCode::NO_CONTENT;
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    parts.headers.remove(axum::http::header::CONTENT_TYPE);
    Response::from_parts(parts, AxumBody::empty())
}
