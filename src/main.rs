use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::{env, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod assets;
mod auth;
mod components;
mod config;
mod controllers;
mod crypto;
mod db_ops;
mod errors;
mod extractors;
mod htmx;
mod listing;
#[cfg(test)]
mod memory;
mod middleware;
mod models;
mod pw;
mod records;
mod routes;
mod seed;
mod seo;
mod session;
mod sitemap;
mod validation;

const USAGE: &str = "usage: real-market \
    [--migrate] [--seed] \
    [--create-user <email> <password> <admin|member> [name]]";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "real_market=info,tower_http=info".into()),
        )
        .init();

    let config = config::Config::from_env()?;
    let db = PgPoolOptions::new()
        // Postgres default max connections is 100, and we'll take 'em
        // https://www.postgresql.org/docs/current/runtime-config-connection.html
        .max_connections(80)
        .connect(&config.database_url)
        .await
        .context("could not connect to postgres")?;

    let args: Vec<String> = env::args().skip(1).collect();
    if !args.is_empty() {
        return run_command(&db, &args).await;
    }

    let state = models::AppState {
        properties: Arc::new(db_ops::PgPropertyStore::new(db.clone())),
        posts: Arc::new(db_ops::PgBlogStore::new(db.clone())),
        pages: Arc::new(db_ops::PgPageStore::new(db.clone())),
        assets: Arc::new(assets::LocalBucket::new(
            config.media_dir.clone(),
            &config.site_url,
        )),
        identity: Arc::new(auth::PgIdentity::new(db)),
        config: Arc::new(config.clone()),
    };
    let app = routes::get_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!(addr = %config.bind_addr, "listening");
    axum::Server::bind(&config.bind_addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

/// One-off maintenance commands; the server is not started.
async fn run_command(db: &sqlx::PgPool, args: &[String]) -> Result<()> {
    match args[0].as_str() {
        "--migrate" => {
            sqlx::migrate!("./migrations").run(db).await?;
            tracing::info!("migrations applied");
        }
        "--seed" => {
            let store = db_ops::PgPropertyStore::new(db.clone());
            let count = seed::seed_properties(&store).await?;
            tracing::info!(count, "seeded properties");
        }
        "--create-user" => {
            let [email, password, role, rest @ ..] = &args[1..] else {
                bail!(USAGE);
            };
            let role: models::Role =
                role.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let name = rest
                .first()
                .cloned()
                .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());
            let principal = auth::PgIdentity::new(db.clone())
                .create_user(email, password, &name, role)
                .await?;
            tracing::info!(user = %principal.id, role = role.as_str(), "created user");
        }
        _ => bail!(USAGE),
    }

    Ok(())
}
