//! In-memory stand-ins for the record stores and the identity provider,
//! used to drive handlers in tests without a database.

use super::{
    auth::IdentityProvider,
    db_ops::{new_id, BlogStore, PageStore, PropertyStore, StoreResult},
    errors::StoreError,
    listing::models::ListingQuery,
    models::{
        BlogPost, BlogPostFields, ContentPage, Principal, Property,
        PropertyFields, Role,
    },
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Never earlier than `prev`, so `updated_at` only moves forward.
fn stamp(prev: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match prev {
        Some(prev) if prev > now => prev,
        _ => now,
    }
}

fn unavailable() -> StoreError {
    StoreError::Backend(sqlx::Error::PoolTimedOut)
}

#[derive(Default)]
pub struct MemoryPropertyStore {
    rows: RwLock<Vec<Property>>,
    /// Flip on to make every call fail like an unreachable backend
    pub failing: AtomicBool,
    /// Flip on to make only writes fail
    pub failing_writes: AtomicBool,
}

impl MemoryPropertyStore {
    pub fn with_rows(rows: Vec<Property>) -> Self {
        Self {
            rows: RwLock::new(rows),
            ..Default::default()
        }
    }

    fn check(&self, write: bool) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst)
            || (write && self.failing_writes.load(Ordering::SeqCst))
        {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PropertyStore for MemoryPropertyStore {
    async fn list(&self, query: &ListingQuery) -> StoreResult<Vec<Property>> {
        self.check(false)?;
        let rows = self.rows.read().await;
        let mut matching: Vec<Property> =
            rows.iter().filter(|p| query.matches(p)).cloned().collect();
        matching.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
        });

        Ok(matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Property>> {
        self.check(false)?;
        Ok(self.rows.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, fields: PropertyFields) -> StoreResult<Property> {
        self.check(true)?;
        let now = stamp(None);
        let property = Property {
            id: new_id(),
            fields,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(property.clone());
        Ok(property)
    }

    async fn update(
        &self,
        id: &str,
        fields: PropertyFields,
    ) -> StoreResult<Property> {
        self.check(true)?;
        let mut rows = self.rows.write().await;
        let existing = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        existing.fields = fields;
        existing.updated_at = stamp(Some(existing.updated_at));
        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.check(true)?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct MemoryBlogStore {
    rows: RwLock<Vec<BlogPost>>,
    pub failing: AtomicBool,
}

impl MemoryBlogStore {
    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

fn slug_taken(rows: &[BlogPost], slug: &str, except_id: Option<&str>) -> bool {
    rows.iter()
        .any(|p| p.fields.slug == slug && Some(p.id.as_str()) != except_id)
}

#[async_trait]
impl BlogStore for MemoryBlogStore {
    async fn list(&self) -> StoreResult<Vec<BlogPost>> {
        self.check()?;
        let mut rows = self.rows.read().await.clone();
        rows.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<BlogPost>> {
        self.check()?;
        Ok(self.rows.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> StoreResult<Option<BlogPost>> {
        self.check()?;
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|p| p.fields.slug == slug)
            .cloned())
    }

    async fn create(&self, fields: BlogPostFields) -> StoreResult<BlogPost> {
        self.check()?;
        let mut rows = self.rows.write().await;
        if slug_taken(&rows, &fields.slug, None) {
            return Err(StoreError::Conflict { field: "slug" });
        }
        let now = stamp(None);
        let post = BlogPost {
            id: new_id(),
            fields,
            created_at: now,
            updated_at: now,
        };
        rows.push(post.clone());
        Ok(post)
    }

    async fn update(
        &self,
        id: &str,
        fields: BlogPostFields,
    ) -> StoreResult<BlogPost> {
        self.check()?;
        let mut rows = self.rows.write().await;
        if slug_taken(&rows, &fields.slug, Some(id)) {
            return Err(StoreError::Conflict { field: "slug" });
        }
        let existing = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        existing.fields = fields;
        existing.updated_at = stamp(Some(existing.updated_at));
        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.check()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct MemoryPageStore {
    pub rows: RwLock<Vec<ContentPage>>,
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn get_by_slug(
        &self,
        slug: &str,
    ) -> StoreResult<Option<ContentPage>> {
        Ok(self.rows.read().await.iter().find(|p| p.slug == slug).cloned())
    }
}

/// Accepts `(email, password)` pairs registered up front. A user's id is
/// the local part of their email.
#[derive(Default)]
pub struct MemoryIdentity {
    users: RwLock<Vec<(Principal, String)>>,
}

impl MemoryIdentity {
    pub fn with_user(mut self, email: &str, password: &str, role: Role) -> Self {
        self.users.get_mut().push((
            Principal {
                id: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                name: email.split('@').next().unwrap_or(email).to_string(),
                role,
            },
            password.to_string(),
        ));
        self
    }

    pub async fn set_role(&self, user_id: &str, role: Role) {
        if let Some((p, _)) =
            self.users.write().await.iter_mut().find(|(p, _)| p.id == user_id)
        {
            p.role = role;
        }
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|(p, pw)| p.email == email && pw == password)
            .map(|(p, _)| p.clone()))
    }

    async fn current_role(&self, user_id: &str) -> Result<Option<Role>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|(p, _)| p.id == user_id)
            .map(|(p, _)| p.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{listing::models::fixtures, models::PropertyType, seed};

    fn fields() -> PropertyFields {
        PropertyFields {
            title: "Harbor View".into(),
            location: "Seattle, WA".into(),
            price: 799_000.0,
            r#type: PropertyType::Condo,
            bedrooms: 2,
            bathrooms: 2,
            area: 1100.5,
            description: "Water views".into(),
            image_url: "https://img.test/1.jpg".into(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_fields() {
        let store = MemoryPropertyStore::default();
        let created = store.create(fields()).await.unwrap();
        let fetched = store.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.fields, fields());
        assert_eq!(fetched.created_at, created.created_at);
        assert!(!fetched.id.is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = MemoryPropertyStore::default();
        let created = store.create(fields()).await.unwrap();
        store.delete(&created.id).await.unwrap();
        assert!(store.get(&created.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(&created.id).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_moves_updated_at_forward() {
        let store = MemoryPropertyStore::default();
        let created = store.create(fields()).await.unwrap();
        let mut changed = fields();
        changed.price = 750_000.0;
        let updated = store.update(&created.id, changed.clone()).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.fields, changed);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_listing_is_newest_first_and_capped() {
        let store = MemoryPropertyStore::with_rows(fixtures::properties());
        let featured = store.list(&ListingQuery::featured()).await.unwrap();
        let ids: Vec<_> = featured.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p11", "p10", "p09", "p08", "p07", "p06"]);
    }

    #[tokio::test]
    async fn test_no_filters_returns_whole_collection() {
        let store = MemoryPropertyStore::with_rows(fixtures::properties());
        let all = store.list(&ListingQuery::default()).await.unwrap();
        assert_eq!(all.len(), 12);
    }

    #[tokio::test]
    async fn test_seed_condo_band_is_empty_not_an_error() {
        let store = MemoryPropertyStore::default();
        for fields in seed::sample_properties() {
            store.create(fields).await.unwrap();
        }
        let query = ListingQuery {
            r#type: Some(PropertyType::Condo),
            min_price: Some(2_000_000.0),
            max_price: Some(4_000_000.0),
            ..Default::default()
        };
        assert_eq!(store.list(&query).await.unwrap(), vec![]);

        store.failing.store(true, Ordering::SeqCst);
        assert!(store.list(&query).await.is_err());
    }

    #[tokio::test]
    async fn test_blog_slug_lookup_and_uniqueness() {
        let store = MemoryBlogStore::default();
        let post = store
            .create(BlogPostFields {
                title: "Buying your first home".into(),
                content: "Step one.\nStep two.".into(),
                slug: "first-home".into(),
                image_url: String::new(),
                author: "Jack".into(),
            })
            .await
            .unwrap();
        let found = store.get_by_slug("first-home").await.unwrap().unwrap();
        assert_eq!(found.id, post.id);
        assert!(store.get_by_slug("second-home").await.unwrap().is_none());

        let dupe = store.create(post.fields.clone()).await;
        assert!(matches!(dupe, Err(StoreError::Conflict { field: "slug" })));
        // Saving a post with its own slug is not a conflict
        assert!(store.update(&post.id, post.fields.clone()).await.is_ok());
    }
}
