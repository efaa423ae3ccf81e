//! We can have a little hard-coded config, [as a
//! snack](https://knowyourmeme.com/memes/cats-can-have-a-little-salami).
//! Everything that differs between deployments comes from the environment
//! (or a `.env` file) through [Config::from_env].

use anyhow::{Context, Result};
use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

/// The home page shows this many of the newest listings.
pub const FEATURED_LIMIT: usize = 6;

/// Listings per page on `/properties`.
pub const PAGE_SIZE: usize = 24;

/// Hard cap on an uploaded image. Anything larger is rejected before it
/// reaches the bucket.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const SITE_NAME: &str = "Real Market";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Public origin of the site, without a trailing slash.
    pub site_url: String,
    /// Public base of the blog, without a trailing slash. Defaults to
    /// `{site_url}/blog`, but can point at a separate blog domain.
    pub blog_url: String,
    pub media_dir: PathBuf,
    pub session_secret: Vec<u8>,
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let pg_usr = required("POSTGRES_USER")?;
        let pg_pw = required("POSTGRES_PASSWORD")?;
        let pg_db = required("POSTGRES_DB")?;
        let pg_host = optional("POSTGRES_HOST")
            .unwrap_or_else(|| "localhost".to_string());
        let database_url =
            format!("postgres://{pg_usr}:{pg_pw}@{pg_host}:5432/{pg_db}");

        let site_url = trim_origin(
            optional("SITE_URL")
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
        );
        let blog_url = trim_origin(
            optional("BLOG_URL").unwrap_or_else(|| format!("{site_url}/blog")),
        );

        let bind_addr = optional("BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8000".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address like 127.0.0.1:8000")?;

        let session_ttl = match optional("SESSION_TTL_SECS") {
            Some(v) => Duration::from_secs(
                v.parse().context("SESSION_TTL_SECS must be an integer")?,
            ),
            None => Duration::from_secs(60 * 60 * 24 * 7),
        };

        Ok(Self {
            database_url,
            bind_addr,
            site_url,
            blog_url,
            media_dir: optional("MEDIA_DIR")
                .unwrap_or_else(|| "./media".to_string())
                .into(),
            session_secret: required("SESSION_SECRET")?.into_bytes(),
            session_ttl,
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be defined in environment"))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn trim_origin(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
        site_url: "https://real.example.com".to_string(),
        blog_url: "https://blog.real.example.com".to_string(),
        media_dir: PathBuf::from("./media"),
        session_secret: b"foo".to_vec(),
        session_ttl: Duration::from_secs(60 * 60),
    }
}
