//! Server-side checks for the admin forms. Browsers enforce `required`
//! and `type="number"`, but nothing stops a hand-made request, so every
//! field is checked again here before it reaches a store.

use super::models::{
    BlogPost, BlogPostFields, Property, PropertyFields, PropertyType,
};
use regex::Regex;
use std::{collections::HashMap, sync::OnceLock};

/// Per-field messages, in form order.
#[derive(Debug, Default, Clone, PartialEq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FieldErrors(pub Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn text(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    value: &str,
    max_len: usize,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, format!("{label} is required"));
    } else if value.chars().count() > max_len {
        errors.push(field, format!("{label} must be at most {max_len} characters"));
    }
    value.to_string()
}

fn decimal(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    value: &str,
    allow_zero: bool,
) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, format!("{label} is required"));
        return 0.0;
    }
    match value.parse::<f64>() {
        Ok(v) if !v.is_finite() => {
            errors.push(field, format!("{label} must be a number"));
            0.0
        }
        Ok(v) if v < 0.0 || (!allow_zero && v == 0.0) => {
            let bound = if allow_zero { "zero or more" } else { "more than zero" };
            errors.push(field, format!("{label} must be {bound}"));
            0.0
        }
        Ok(v) => v,
        Err(_) => {
            errors.push(field, format!("{label} must be a number"));
            0.0
        }
    }
}

fn count(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    value: &str,
) -> i32 {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, format!("{label} is required"));
        return 0;
    }
    match value.parse::<i32>() {
        Ok(v) if v >= 0 => v,
        Ok(_) => {
            errors.push(field, format!("{label} must be zero or more"));
            0
        }
        Err(_) => {
            errors.push(field, format!("{label} must be a whole number"));
            0
        }
    }
}

fn field(fields: &HashMap<String, String>, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

/// The property form exactly as submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyForm {
    pub title: String,
    pub location: String,
    pub price: String,
    pub r#type: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub area: String,
    pub description: String,
}

impl Default for PropertyForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            location: String::new(),
            price: String::new(),
            r#type: PropertyType::House.as_str().to_string(),
            bedrooms: String::new(),
            bathrooms: String::new(),
            area: String::new(),
            description: String::new(),
        }
    }
}

impl PropertyForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        Self {
            title: field(fields, "title"),
            location: field(fields, "location"),
            price: field(fields, "price"),
            r#type: field(fields, "type"),
            bedrooms: field(fields, "bedrooms"),
            bathrooms: field(fields, "bathrooms"),
            area: field(fields, "area"),
            description: field(fields, "description"),
        }
    }

    pub fn from_property(property: &Property) -> Self {
        let f = &property.fields;
        Self {
            title: f.title.clone(),
            location: f.location.clone(),
            price: f.price.to_string(),
            r#type: f.r#type.as_str().to_string(),
            bedrooms: f.bedrooms.to_string(),
            bathrooms: f.bathrooms.to_string(),
            area: f.area.to_string(),
            description: f.description.clone(),
        }
    }

    /// Check every field. `image_url` is whatever the record should point
    /// at; it is filled in after the upload step, so it is not validated
    /// here.
    pub fn validate(
        &self,
        image_url: String,
    ) -> Result<PropertyFields, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = text(&mut errors, "title", "Title", &self.title, 255);
        let location =
            text(&mut errors, "location", "Location", &self.location, 255);
        let price = decimal(&mut errors, "price", "Price", &self.price, true);
        let r#type = match self.r#type.parse::<PropertyType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.push("type", "Type must be house, apartment or condo");
                None
            }
        };
        let bedrooms =
            count(&mut errors, "bedrooms", "Bedrooms", &self.bedrooms);
        let bathrooms =
            count(&mut errors, "bathrooms", "Bathrooms", &self.bathrooms);
        let area = decimal(&mut errors, "area", "Area", &self.area, false);
        let description = text(
            &mut errors,
            "description",
            "Description",
            &self.description,
            10_000,
        );

        match r#type {
            Some(r#type) if errors.is_empty() => Ok(PropertyFields {
                title,
                location,
                price,
                r#type,
                bedrooms,
                bathrooms,
                area,
                description,
                image_url,
            }),
            _ => Err(errors),
        }
    }
}

fn slug_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex")
    })
}

/// Lower-case, hyphen-separated suggestion for a slug, derived from a title.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BlogPostForm {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub author: String,
}

impl BlogPostForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        Self {
            title: field(fields, "title"),
            content: field(fields, "content"),
            slug: field(fields, "slug"),
            author: field(fields, "author"),
        }
    }

    pub fn from_post(post: &BlogPost) -> Self {
        let f = &post.fields;
        Self {
            title: f.title.clone(),
            content: f.content.clone(),
            slug: f.slug.clone(),
            author: f.author.clone(),
        }
    }

    /// A blank slug is derived from the title.
    pub fn validate(
        &self,
        image_url: String,
    ) -> Result<BlogPostFields, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = text(&mut errors, "title", "Title", &self.title, 255);
        let content =
            text(&mut errors, "content", "Content", &self.content, 50_000);
        let slug = match self.slug.trim() {
            "" => slugify(&title),
            s => s.to_string(),
        };
        if slug.is_empty() {
            errors.push("slug", "Slug is required");
        } else if slug.len() > 255 || !slug_pattern().is_match(&slug) {
            errors.push(
                "slug",
                "Slug may only contain lower-case letters, digits and single hyphens",
            );
        }
        let author = text(&mut errors, "author", "Author", &self.author, 255);

        if errors.is_empty() {
            Ok(BlogPostFields {
                title,
                content: content.replace("\r\n", "\n"),
                slug,
                image_url,
                author,
            })
        } else {
            Err(errors)
        }
    }
}
