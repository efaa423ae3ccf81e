//! Record stores. Each collection gets a trait so handlers can be driven by
//! the Postgres implementations below in production and by the in-memory
//! fakes in [crate::memory] under test.
//!
//! `get`-style lookups return `Result<Option<T>>`: `Ok(None)` is "no such
//! record", `Err` is the backend failing. Mutations on a missing record
//! return [StoreError::NotFound].

use super::{
    errors::StoreError,
    listing::models::ListingQuery,
    models::{
        BlogPost, BlogPostFields, ContentPage, Property, PropertyFields,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPool, query, query_as, FromRow, Postgres, QueryBuilder};

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn list(&self, query: &ListingQuery) -> StoreResult<Vec<Property>>;
    async fn get(&self, id: &str) -> StoreResult<Option<Property>>;
    async fn create(&self, fields: PropertyFields) -> StoreResult<Property>;
    async fn update(
        &self,
        id: &str,
        fields: PropertyFields,
    ) -> StoreResult<Property>;
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

#[async_trait]
pub trait BlogStore: Send + Sync {
    /// All posts, newest first
    async fn list(&self) -> StoreResult<Vec<BlogPost>>;
    async fn get(&self, id: &str) -> StoreResult<Option<BlogPost>>;
    async fn get_by_slug(&self, slug: &str) -> StoreResult<Option<BlogPost>>;
    async fn create(&self, fields: BlogPostFields) -> StoreResult<BlogPost>;
    async fn update(
        &self,
        id: &str,
        fields: BlogPostFields,
    ) -> StoreResult<BlogPost>;
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

#[async_trait]
pub trait PageStore: Send + Sync {
    async fn get_by_slug(&self, slug: &str)
        -> StoreResult<Option<ContentPage>>;
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Unique-violation on one of our `unique` indexes
fn map_unique(err: sqlx::Error, field: &'static str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some("23505") =>
        {
            StoreError::Conflict { field }
        }
        _ => StoreError::Backend(err),
    }
}

#[derive(FromRow)]
struct PropertyRow {
    id: String,
    title: String,
    location: String,
    price: f64,
    #[sqlx(rename = "type")]
    property_type: String,
    bedrooms: i32,
    bathrooms: i32,
    area: f64,
    description: String,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PropertyRow> for Property {
    type Error = StoreError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        Ok(Property {
            fields: PropertyFields {
                r#type: row.property_type.parse().map_err(StoreError::Corrupt)?,
                title: row.title,
                location: row.location,
                price: row.price,
                bedrooms: row.bedrooms,
                bathrooms: row.bathrooms,
                area: row.area,
                description: row.description,
                image_url: row.image_url,
            },
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PROPERTY_COLUMNS: &str = "id, title, location, price, type, bedrooms, \
    bathrooms, area, description, image_url, created_at, updated_at";

pub struct PgPropertyStore {
    db: PgPool,
}

impl PgPropertyStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Translate a [ListingQuery] into SQL. Only predicates that are present
/// are pushed, all of them joined with `and`.
fn build_listing_query(query: &ListingQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<'static, Postgres> = QueryBuilder::new(format!(
        "select {PROPERTY_COLUMNS} from properties where true"
    ));
    if let Some(t) = query.r#type {
        builder.push(" and type = ").push_bind(t.as_str());
    }
    if let Some(min) = query.min_price {
        builder.push(" and price >= ").push_bind(min);
    }
    if let Some(max) = query.max_price {
        builder.push(" and price <= ").push_bind(max);
    }
    if let Some(bedrooms) = query.bedrooms {
        builder.push(" and bedrooms = ").push_bind(bedrooms);
    }
    builder.push(" order by created_at desc, id desc");
    if let Some(limit) = query.limit {
        builder.push(" limit ").push_bind(limit as i64);
    }
    match i64::try_from(query.offset) {
        Ok(0) => {}
        Ok(offset) => {
            builder.push(" offset ").push_bind(offset);
        }
        Err(_) => {
            tracing::warn!(offset = query.offset, "offset out of range; ignored");
        }
    }

    builder
}

#[async_trait]
impl PropertyStore for PgPropertyStore {
    async fn list(&self, query: &ListingQuery) -> StoreResult<Vec<Property>> {
        let mut builder = build_listing_query(query);
        let rows = builder
            .build_query_as::<PropertyRow>()
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(Property::try_from).collect()
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Property>> {
        let row = query_as::<_, PropertyRow>(&format!(
            "select {PROPERTY_COLUMNS} from properties where id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(Property::try_from).transpose()
    }

    async fn create(&self, fields: PropertyFields) -> StoreResult<Property> {
        let row = query_as::<_, PropertyRow>(&format!(
            "insert into properties
                (id, title, location, price, type, bedrooms, bathrooms,
                 area, description, image_url)
            values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            returning {PROPERTY_COLUMNS}"
        ))
        .bind(new_id())
        .bind(&fields.title)
        .bind(&fields.location)
        .bind(fields.price)
        .bind(fields.r#type.as_str())
        .bind(fields.bedrooms)
        .bind(fields.bathrooms)
        .bind(fields.area)
        .bind(&fields.description)
        .bind(&fields.image_url)
        .fetch_one(&self.db)
        .await?;

        Property::try_from(row)
    }

    async fn update(
        &self,
        id: &str,
        fields: PropertyFields,
    ) -> StoreResult<Property> {
        // greatest() keeps updated_at monotonic even if the clock steps back
        let row = query_as::<_, PropertyRow>(&format!(
            "update properties
            set
                title = $1,
                location = $2,
                price = $3,
                type = $4,
                bedrooms = $5,
                bathrooms = $6,
                area = $7,
                description = $8,
                image_url = $9,
                updated_at = greatest(now(), updated_at)
            where id = $10
            returning {PROPERTY_COLUMNS}"
        ))
        .bind(&fields.title)
        .bind(&fields.location)
        .bind(fields.price)
        .bind(fields.r#type.as_str())
        .bind(fields.bedrooms)
        .bind(fields.bathrooms)
        .bind(fields.area)
        .bind(&fields.description)
        .bind(&fields.image_url)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => Property::try_from(row),
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let res = query("delete from properties where id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[derive(FromRow)]
struct BlogPostRow {
    id: String,
    title: String,
    content: String,
    slug: String,
    image_url: String,
    author: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogPostRow> for BlogPost {
    fn from(row: BlogPostRow) -> Self {
        BlogPost {
            id: row.id,
            fields: BlogPostFields {
                title: row.title,
                content: row.content,
                slug: row.slug,
                image_url: row.image_url,
                author: row.author,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const POST_COLUMNS: &str =
    "id, title, content, slug, image_url, author, created_at, updated_at";

pub struct PgBlogStore {
    db: PgPool,
}

impl PgBlogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BlogStore for PgBlogStore {
    async fn list(&self) -> StoreResult<Vec<BlogPost>> {
        let rows = query_as::<_, BlogPostRow>(&format!(
            "select {POST_COLUMNS} from blog_posts
            order by created_at desc, id desc"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(BlogPost::from).collect())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<BlogPost>> {
        let row = query_as::<_, BlogPostRow>(&format!(
            "select {POST_COLUMNS} from blog_posts where id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(BlogPost::from))
    }

    async fn get_by_slug(&self, slug: &str) -> StoreResult<Option<BlogPost>> {
        let row = query_as::<_, BlogPostRow>(&format!(
            "select {POST_COLUMNS} from blog_posts where slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(BlogPost::from))
    }

    async fn create(&self, fields: BlogPostFields) -> StoreResult<BlogPost> {
        let row = query_as::<_, BlogPostRow>(&format!(
            "insert into blog_posts (id, title, content, slug, image_url, author)
            values ($1, $2, $3, $4, $5, $6)
            returning {POST_COLUMNS}"
        ))
        .bind(new_id())
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(&fields.slug)
        .bind(&fields.image_url)
        .bind(&fields.author)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique(e, "slug"))?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: &str,
        fields: BlogPostFields,
    ) -> StoreResult<BlogPost> {
        let row = query_as::<_, BlogPostRow>(&format!(
            "update blog_posts
            set
                title = $1,
                content = $2,
                slug = $3,
                image_url = $4,
                author = $5,
                updated_at = greatest(now(), updated_at)
            where id = $6
            returning {POST_COLUMNS}"
        ))
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(&fields.slug)
        .bind(&fields.image_url)
        .bind(&fields.author)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_unique(e, "slug"))?;

        row.map(BlogPost::from).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let res = query("delete from blog_posts where id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[derive(FromRow)]
struct ContentPageRow {
    id: String,
    title: String,
    content: String,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub struct PgPageStore {
    db: PgPool,
}

impl PgPageStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PageStore for PgPageStore {
    async fn get_by_slug(
        &self,
        slug: &str,
    ) -> StoreResult<Option<ContentPage>> {
        let row = query_as::<_, ContentPageRow>(
            "select id, title, content, slug, created_at, updated_at
            from pages where slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|r| ContentPage {
            id: r.id,
            title: r.title,
            content: r.content,
            slug: r.slug,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }))
    }
}
