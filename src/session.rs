use super::{crypto, models::Principal};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const COOKIE_NAME: &str = "session";

/// HMAC-secured session string, signed with `SESSION_SECRET`
///
/// Note: since this guy is stored in a browser cookie, it's important to
/// esure it does not get too large.
#[derive(Debug, Serialize, Deserialize)]
pub struct Session {
    pub principal: Principal,
    /// Unix seconds
    pub created_at: u64,
}

impl Session {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            created_at: unix_now(),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn serialize_session(secret: &[u8], session: &Session) -> String {
    let json_bytes = serde_json::to_string(&session)
        .expect("session can be JSON serialized");
    let b64 = general_purpose::STANDARD_NO_PAD.encode(json_bytes);
    let raw_digest = crypto::get_digest(secret, b64.as_bytes());
    let digest = general_purpose::STANDARD_NO_PAD.encode(raw_digest);
    let session = format!("{}:{}", b64, digest);

    session
}

pub fn deserialize_session(
    secret: &[u8],
    ttl: Duration,
    cookie: &str,
) -> Result<Session, &'static str> {
    let parts: Vec<&str> = cookie.split(':').collect();
    if parts.len() != 2 {
        return Err("Invalid session");
    }
    let b64_json = parts[0].as_bytes();
    let Ok(digest) = general_purpose::STANDARD_NO_PAD.decode(parts[1]) else {
        return Err("Cannot base64 decode the digest");
    };
    if !crypto::is_valid(secret, b64_json, &digest) {
        return Err("Failed to validate session signature");
    }
    let Ok(json_string) = general_purpose::STANDARD_NO_PAD.decode(b64_json)
    else {
        return Err("Cannot base64 decode sesion string");
    };
    let Ok(session) = serde_json::from_slice::<Session>(&json_string) else {
        return Err("Cannot deserialize session JSON");
    };
    if unix_now().saturating_sub(session.created_at) > ttl.as_secs() {
        return Err("Session expired");
    }

    Ok(session)
}

/// `Set-Cookie` value that stores `session`.
pub fn set_cookie(secret: &[u8], ttl: Duration, session: &Session) -> String {
    format!(
        "{COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        serialize_session(secret, session),
        ttl.as_secs()
    )
}

/// `Set-Cookie` value that clears the session.
pub fn clear_cookie() -> String {
    format!("{COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
