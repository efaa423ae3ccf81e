use super::{
    assets::AssetStore, auth::IdentityProvider, config::Config,
    db_ops::{BlogStore, PageStore, PropertyStore},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

/// Every backend client is constructed once in `main` (or in a test) and
/// handed to the router here; nothing reaches for a global.
#[derive(Clone)]
pub struct AppState {
    pub properties: Arc<dyn PropertyStore>,
    pub posts: Arc<dyn BlogStore>,
    pub pages: Arc<dyn PageStore>,
    pub assets: Arc<dyn AssetStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub config: Arc<Config>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
    Condo,
}

impl PropertyType {
    pub const ALL: [PropertyType; 3] =
        [PropertyType::House, PropertyType::Apartment, PropertyType::Condo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Apartment => "apartment",
            Self::Condo => "condo",
        }
    }

    pub fn get_display_name(&self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Apartment => "Apartment",
            Self::Condo => "Condo",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "house" => Ok(Self::House),
            "apartment" => Ok(Self::Apartment),
            "condo" => Ok(Self::Condo),
            other => Err(format!("{other} is not a property type")),
        }
    }
}

/// The caller-editable part of a property. The store owns `id` and the
/// timestamps.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFields {
    pub title: String,
    pub location: String,
    pub price: f64,
    pub r#type: PropertyType,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: f64,
    pub description: String,
    pub image_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    #[serde(flatten)]
    pub fields: PropertyFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlogPostFields {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub image_url: String,
    pub author: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlogPost {
    pub id: String,
    pub fields: BlogPostFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Plain-text teaser used for listing cards and meta descriptions.
    pub fn excerpt(&self, max_chars: usize) -> String {
        excerpt(&self.fields.content, max_chars)
    }
}

/// Static copy kept in the `pages` collection, such as the about page.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentPage {
    pub id: String,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            other => Err(format!("{other} is not a role")),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Create, edit and delete properties and blog posts.
    ManageRecords,
}

/// The signed-in user. This is what lives inside the session cookie, so
/// keep it small.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl Principal {
    pub fn can(&self, capability: Capability) -> bool {
        match capability {
            Capability::ManageRecords => self.role == Role::Admin,
        }
    }
}

/// Collapse whitespace and cut at a char boundary, adding an ellipsis when
/// anything was dropped.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}
