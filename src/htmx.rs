/// HTMX utils
use axum::http::{HeaderMap, HeaderValue, StatusCode};

pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("Hx-Request")
}

/// An htmx request that wants a fragment. Boosted links and forms also
/// send `Hx-Request`, but they expect a whole page.
pub fn wants_fragment(headers: &HeaderMap) -> bool {
    is_htmx(headers) && !headers.contains_key("Hx-Boosted")
}

/// Client-side redirect for htmx requests. Anything that is not a valid
/// header value sends the browser home instead.
pub fn redirect(to: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Hx-Redirect",
        HeaderValue::from_str(to).unwrap_or(HeaderValue::from_static("/")),
    );
    headers
}

/// Redirect after a form post. htmx requests get `Hx-Redirect` (an XHR
/// would silently follow a 303), plain browser posts get a 303.
pub fn redirect_after_post(
    request_headers: &HeaderMap,
    to: &str,
) -> (StatusCode, HeaderMap) {
    if is_htmx(request_headers) {
        return (StatusCode::OK, redirect(to));
    }
    let mut headers = HeaderMap::new();
    headers.insert(
        "Location",
        HeaderValue::from_str(to).unwrap_or(HeaderValue::from_static("/")),
    );
    (StatusCode::SEE_OTHER, headers)
}
