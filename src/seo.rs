//! Search/social metadata for pages: description, canonical URL,
//! OpenGraph and Twitter tags, and schema.org JSON-LD.

use super::{
    config::{Config, SITE_NAME},
    models::{excerpt, BlogPost, Property},
};
use ammonia::clean_text;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

pub const DEFAULT_DESCRIPTION: &str = "Discover your perfect property with \
    Real Market. Browse through our extensive collection of houses, \
    apartments, and condos.";

#[derive(Debug, Clone)]
pub struct PageMeta {
    pub description: String,
    pub canonical_url: String,
    /// OpenGraph type: `website` or `article`
    pub og_type: &'static str,
    pub image: Option<String>,
    pub published_time: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub json_ld: Option<Value>,
}

impl PageMeta {
    pub fn site(config: &Config, path: &str, description: &str) -> Self {
        Self {
            description: description.to_string(),
            canonical_url: format!("{}{}", config.site_url, path),
            og_type: "website",
            image: None,
            published_time: None,
            author: None,
            json_ld: None,
        }
    }

    pub fn for_property(config: &Config, property: &Property) -> Self {
        Self {
            description: property_description(property),
            canonical_url: property_url(config, property),
            og_type: "website",
            image: non_empty(&property.fields.image_url),
            published_time: None,
            author: None,
            json_ld: Some(property_json_ld(config, property)),
        }
    }

    pub fn for_post(config: &Config, post: &BlogPost) -> Self {
        Self {
            description: post.excerpt(160),
            canonical_url: post_url(config, post),
            og_type: "article",
            image: non_empty(&post.fields.image_url),
            published_time: Some(post.created_at),
            author: Some(post.fields.author.clone()),
            json_ld: Some(post_json_ld(config, post)),
        }
    }

    /// `<meta>`/`<link>`/`<script>` tags for the document head.
    pub fn render(&self, title: &str) -> String {
        let title = clean_text(title);
        let description = clean_text(&self.description);
        let url = clean_text(&self.canonical_url);
        let og_type = self.og_type;
        let site = clean_text(SITE_NAME);
        let mut tags = vec![
            format!(r#"<meta name="description" content="{description}" />"#),
            format!(r#"<link rel="canonical" href="{url}" />"#),
            format!(r#"<meta property="og:type" content="{og_type}" />"#),
            format!(r#"<meta property="og:site_name" content="{site}" />"#),
            r#"<meta property="og:locale" content="en_US" />"#.to_string(),
            format!(r#"<meta property="og:title" content="{title}" />"#),
            format!(r#"<meta property="og:description" content="{description}" />"#),
            format!(r#"<meta property="og:url" content="{url}" />"#),
            format!(r#"<meta name="twitter:title" content="{title}" />"#),
            format!(r#"<meta name="twitter:description" content="{description}" />"#),
        ];
        match &self.image {
            Some(image) => {
                let image = clean_text(image);
                tags.push(format!(r#"<meta property="og:image" content="{image}" />"#));
                tags.push(r#"<meta property="og:image:width" content="1200" />"#.to_string());
                tags.push(r#"<meta property="og:image:height" content="630" />"#.to_string());
                tags.push(format!(r#"<meta property="og:image:alt" content="{title}" />"#));
                tags.push(r#"<meta name="twitter:card" content="summary_large_image" />"#.to_string());
                tags.push(format!(r#"<meta name="twitter:image" content="{image}" />"#));
            }
            None => {
                tags.push(r#"<meta name="twitter:card" content="summary" />"#.to_string());
            }
        }
        if let Some(published) = self.published_time {
            tags.push(format!(
                r#"<meta property="article:published_time" content="{}" />"#,
                published.to_rfc3339()
            ));
        }
        if let Some(author) = &self.author {
            tags.push(format!(
                r#"<meta property="article:author" content="{}" />"#,
                clean_text(author)
            ));
        }
        if let Some(json_ld) = &self.json_ld {
            tags.push(format!(
                r#"<script type="application/ld+json">{}</script>"#,
                script_safe_json(json_ld)
            ));
        }

        tags.join("\n")
    }
}

fn non_empty(val: &str) -> Option<String> {
    (!val.is_empty()).then(|| val.to_string())
}

/// Serialized JSON that cannot close the surrounding `<script>`.
fn script_safe_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

pub fn property_url(config: &Config, property: &Property) -> String {
    format!("{}/properties/{}", config.site_url, property.id)
}

pub fn post_url(config: &Config, post: &BlogPost) -> String {
    format!("{}/{}", config.blog_url, post.fields.slug)
}

/// `$1,200,000`, or with cents when there are any.
pub fn format_price(price: f64) -> String {
    let cents = (price * 100.0).round() as u64;
    let whole = cents / 100;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    match cents % 100 {
        0 => format!("${grouped}"),
        frac => format!("${grouped}.{frac:02}"),
    }
}

pub fn property_description(property: &Property) -> String {
    let f = &property.fields;
    format!(
        "{} - {} bed, {} bath, {} sqft {} in {}. Price: {}",
        f.title,
        f.bedrooms,
        f.bathrooms,
        f.area,
        f.r#type,
        f.location,
        format_price(f.price)
    )
}

pub fn property_json_ld(config: &Config, property: &Property) -> Value {
    let f = &property.fields;
    json!({
        "@context": "https://schema.org",
        "@type": "RealEstateListing",
        "name": f.title,
        "description": f.description,
        "image": f.image_url,
        "url": property_url(config, property),
        "datePosted": property.created_at.to_rfc3339(),
        "address": {
            "@type": "PostalAddress",
            "addressLocality": f.location,
        },
        "offers": {
            "@type": "Offer",
            "price": f.price,
            "priceCurrency": "USD",
            "availability": "https://schema.org/InStock",
        },
        "numberOfRooms": f.bedrooms,
        "numberOfBathroomsTotal": f.bathrooms,
        "floorSize": {
            "@type": "QuantitativeValue",
            "value": f.area,
            "unitCode": "FTK",
        },
    })
}

pub fn post_json_ld(config: &Config, post: &BlogPost) -> Value {
    let f = &post.fields;
    let url = post_url(config, post);
    json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": f.title,
        "description": excerpt(&f.content, 160),
        "image": f.image_url,
        "url": url,
        "datePublished": post.created_at.to_rfc3339(),
        "dateModified": post.updated_at.to_rfc3339(),
        "author": {
            "@type": "Person",
            "name": f.author,
        },
        "publisher": {
            "@type": "Organization",
            "name": SITE_NAME,
            "logo": {
                "@type": "ImageObject",
                "url": format!("{}/logo.png", config.site_url),
            },
        },
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": url,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::test_config, listing::models::fixtures};

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "$0");
        assert_eq!(format_price(999.0), "$999");
        assert_eq!(format_price(1_200_000.0), "$1,200,000");
        assert_eq!(format_price(450_000.5), "$450,000.50");
    }

    #[test]
    fn test_property_meta() {
        let config = test_config();
        let property = &fixtures::properties()[2];
        let meta = PageMeta::for_property(&config, property);
        assert_eq!(
            meta.description,
            "Harbor Condo - 2 bed, 2 bath, 1500 sqft condo in Somewhere, USA. Price: $610,000"
        );
        assert_eq!(meta.canonical_url, "https://real.example.com/properties/p02");
        let ld = meta.json_ld.unwrap();
        assert_eq!(ld["@type"], "RealEstateListing");
        assert_eq!(ld["offers"]["price"], 610_000.0);
    }

    #[test]
    fn test_json_ld_cannot_close_script() {
        let value = json!({ "name": "</script><script>alert(1)</script>" });
        assert!(!script_safe_json(&value).contains("</script>"));
    }

    #[test]
    fn test_render_escapes_attributes() {
        let config = test_config();
        let meta = PageMeta::site(&config, "/", "say \"hi\" <b>");
        let html = meta.render("Home");
        assert!(!html.contains("\"hi\""));
        assert!(!html.contains("<b>"));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary" />"#));
    }
}
