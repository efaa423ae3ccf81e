//! `/sitemap.xml` and `/robots.txt`.

use super::{
    config::Config,
    models::{BlogPost, Property},
    seo::{post_url, property_url},
};
use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Static routes first, then one entry per property and per post.
pub fn entries(
    config: &Config,
    now: DateTime<Utc>,
    properties: &[Property],
    posts: &[BlogPost],
) -> Vec<SitemapEntry> {
    use ChangeFrequency::*;
    let site = &config.site_url;
    let fixed: [(String, ChangeFrequency, f32); 4] = [
        (site.to_string(), Daily, 1.0),
        (format!("{site}/properties"), Daily, 0.9),
        (config.blog_url.clone(), Daily, 0.8),
        (format!("{site}/about"), Monthly, 0.5),
    ];

    let mut entries: Vec<SitemapEntry> = fixed
        .into_iter()
        .map(|(url, change_frequency, priority)| SitemapEntry {
            url,
            last_modified: now,
            change_frequency,
            priority,
        })
        .collect();
    entries.extend(properties.iter().map(|p| SitemapEntry {
        url: property_url(config, p),
        last_modified: p.updated_at,
        change_frequency: Weekly,
        priority: 0.7,
    }));
    entries.extend(posts.iter().map(|p| SitemapEntry {
        url: post_url(config, p),
        last_modified: p.updated_at,
        change_frequency: Monthly,
        priority: 0.6,
    }));

    entries
}

fn escape_xml(val: &str) -> String {
    let mut out = String::with_capacity(val.len());
    for c in val.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

pub fn render_xml(entries: &[SitemapEntry]) -> String {
    let urls = entries
        .iter()
        .map(|e| {
            format!(
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    \
                <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>",
                escape_xml(&e.url),
                e.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
                e.change_frequency.as_str(),
                e.priority
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
        <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
        {urls}\n</urlset>\n"
    )
}

pub fn robots_txt(config: &Config) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /auth\n\n\
        Sitemap: {}/sitemap.xml\n",
        config.site_url
    )
}
