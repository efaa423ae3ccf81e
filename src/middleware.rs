use super::errors::ServerError;
use axum::{
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Pages are rendered to plain `String`s, so the content type is set here
/// for the whole HTML router. Feeds and media are routed outside of it.
pub async fn html_headers<B>(
    request: Request<B>,
    next: Next<B>,
) -> Result<Response, ServerError> {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str("text/html; charset=utf-8")?,
    );

    Ok(response)
}
