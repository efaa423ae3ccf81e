//! Password storage. Each user row keeps a random salt and the
//! HMAC-SHA256 of the password keyed by that salt, both base64 encoded.

use super::crypto;
use anyhow::{bail, Result};
use base64::{engine::general_purpose, Engine as _};

#[derive(Debug, Clone)]
pub struct HashedPw {
    pub salt: String,
    pub digest: String,
}

pub fn hash_new(password: &str) -> HashedPw {
    let salt = general_purpose::STANDARD_NO_PAD
        .encode(uuid::Uuid::new_v4().as_bytes());
    let digest = general_purpose::STANDARD_NO_PAD
        .encode(crypto::get_digest(salt.as_bytes(), password.as_bytes()));

    HashedPw { salt, digest }
}

pub fn check(password: &str, truth: &HashedPw) -> Result<()> {
    let Ok(digest) = general_purpose::STANDARD_NO_PAD.decode(&truth.digest)
    else {
        bail!("stored digest is not base64");
    };
    if crypto::is_valid(truth.salt.as_bytes(), password.as_bytes(), &digest) {
        Ok(())
    } else {
        bail!("wrong password")
    }
}
