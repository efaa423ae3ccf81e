use super::{
    errors::ServerError,
    models::{AppState, Capability, Principal},
    session,
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use regex::Regex;
use std::{convert::Infallible, sync::OnceLock};

fn cookie_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|;\s*)session=([^;]+)").expect("valid regex")
    })
}

/// The signed-in principal, if the request carries a valid, unexpired
/// session cookie.
fn principal_from_headers(
    headers: &HeaderMap,
    state: &AppState,
) -> Option<Principal> {
    let token = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            cookie_pattern()
                .captures(cookie)
                .map(|c| c[1].to_string())
        })?;
    match session::deserialize_session(
        &state.config.session_secret,
        state.config.session_ttl,
        &token,
    ) {
        Ok(session) => Some(session.principal),
        Err(reason) => {
            tracing::debug!(reason, "ignoring session cookie");
            None
        }
    }
}

fn redirect_to(to: &'static str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, HeaderValue::from_static(to));

    (StatusCode::SEE_OTHER, headers).into_response()
}

/// Whoever is signed in, for pages that look different to them (the
/// navbar) but are public.
pub struct MaybePrincipal(pub Option<Principal>);

#[async_trait]
impl FromRequestParts<AppState> for MaybePrincipal {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(principal_from_headers(&parts.headers, state)))
    }
}

/// Requires a session; anyone else is sent to the sign-in page.
pub struct AuthenticatedPrincipal(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedPrincipal {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        principal_from_headers(&parts.headers, state)
            .map(Self)
            .ok_or_else(|| redirect_to("/auth/signin"))
    }
}

/// Requires a session whose role may manage records. Signed-in users
/// without that capability are sent home. The role is looked up again
/// rather than trusted from the cookie, so a demotion takes effect on the
/// next request.
pub struct AdminPrincipal(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AdminPrincipal {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthenticatedPrincipal(mut principal) =
            AuthenticatedPrincipal::from_request_parts(parts, state).await?;
        let refused = |principal: &Principal| {
            tracing::warn!(
                user = %principal.id,
                path = %parts.uri.path(),
                "refused admin route"
            );
            redirect_to("/")
        };
        if !principal.can(Capability::ManageRecords) {
            return Err(refused(&principal));
        }
        match state.identity.current_role(&principal.id).await {
            Ok(Some(role)) => principal.role = role,
            Ok(None) => {
                tracing::info!(user = %principal.id, "session for a deleted account");
                return Err(redirect_to("/auth/signin"));
            }
            Err(e) => return Err(ServerError::from(e).into_response()),
        }
        if principal.can(Capability::ManageRecords) {
            Ok(Self(principal))
        } else {
            Err(refused(&principal))
        }
    }
}
