use super::{
    db_ops::new_id,
    models::{Principal, Role},
    pw,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::{postgres::PgPool, query, query_as, FromRow};

/// Checks a credential pair. `Ok(None)` means "wrong email or password";
/// `Err` means the check itself could not be carried out.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>>;

    /// The role stored for `user_id` right now, or `None` if the account is
    /// gone. Sessions carry the role they were issued with, so admin routes
    /// ask again.
    async fn current_role(&self, user_id: &str) -> Result<Option<Role>>;
}

pub struct PgIdentity {
    db: PgPool,
}

impl PgIdentity {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<Principal> {
        let hashed = pw::hash_new(password);
        let principal = Principal {
            id: new_id(),
            email: email.trim().to_lowercase(),
            name: name.to_string(),
            role,
        };
        query(
            "insert into users (id, email, name, role, salt, digest)
            values ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&principal.id)
        .bind(&principal.email)
        .bind(&principal.name)
        .bind(role.as_str())
        .bind(&hashed.salt)
        .bind(&hashed.digest)
        .execute(&self.db)
        .await?;

        Ok(principal)
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    role: String,
    salt: String,
    digest: String,
}

#[async_trait]
impl IdentityProvider for PgIdentity {
    async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>> {
        let user = query_as::<_, UserRow>(
            "select id, email, name, role, salt, digest
            from users where email = $1",
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.db)
        .await?;
        let Some(user) = user else {
            return Ok(None);
        };
        let truth = pw::HashedPw {
            salt: user.salt,
            digest: user.digest,
        };
        if pw::check(password, &truth).is_err() {
            return Ok(None);
        }

        Ok(Some(Principal {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role.parse().map_err(|e: String| anyhow!(e))?,
        }))
    }

    async fn current_role(&self, user_id: &str) -> Result<Option<Role>> {
        let role: Option<(String,)> =
            query_as("select role from users where id = $1")
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;
        role.map(|(role,)| role.parse().map_err(|e: String| anyhow!(e)))
            .transpose()
    }
}

/// Sign-in with the configured provider. Empty fields never reach it.
pub async fn authenticate(
    identity: &dyn IdentityProvider,
    email: &str,
    password: &str,
) -> Result<Option<Principal>> {
    if email.trim().is_empty() || password.is_empty() {
        return Ok(None);
    }
    let principal = identity.verify(email.trim(), password).await?;
    match &principal {
        Some(p) => tracing::info!(user = %p.id, role = p.role.as_str(), "signed in"),
        None => tracing::info!("rejected sign-in attempt"),
    }

    Ok(principal)
}
