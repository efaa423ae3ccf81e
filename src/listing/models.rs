use crate::{
    config::{FEATURED_LIMIT, PAGE_SIZE},
    models::{Property, PropertyType},
};
use serde::Deserialize;

/// Filter values exactly as they arrive in the query string. Everything is
/// a string because the browser will happily send `minPrice=` or
/// `bedrooms=lots`; [ListingQuery::from_raw] decides what survives.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawListingFilters {
    #[serde(rename = "type")]
    pub r#type: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
    pub bedrooms: Option<String>,
    pub page: Option<String>,
}

/// A validated set of predicates over `properties`. Every `Some` field is
/// a constraint; all constraints must hold (conjunction). Results are always
/// newest first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListingQuery {
    pub r#type: Option<PropertyType>,
    /// Inclusive lower bound on price
    pub min_price: Option<f64>,
    /// Inclusive upper bound on price
    pub max_price: Option<f64>,
    pub bedrooms: Option<i32>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl ListingQuery {
    /// The home page's "featured" strip: the newest few listings.
    pub fn featured() -> Self {
        Self {
            limit: Some(FEATURED_LIMIT),
            ..Default::default()
        }
    }

    /// Parse user input. Malformed values are dropped, so a typo in one
    /// field never turns into `price >= 0` or a `NaN` sent to the database.
    pub fn from_raw(raw: &RawListingFilters) -> Self {
        let r#type = non_empty(&raw.r#type).and_then(|t| {
            t.parse::<PropertyType>()
                .map_err(|e| tracing::debug!(filter = "type", "{e}"))
                .ok()
        });
        let page = non_empty(&raw.page)
            .and_then(|p| p.parse::<usize>().ok())
            .unwrap_or(0);

        Self {
            r#type,
            min_price: parse_price(&raw.min_price, "minPrice"),
            max_price: parse_price(&raw.max_price, "maxPrice"),
            bedrooms: parse_count(&raw.bedrooms, "bedrooms"),
            limit: None,
            offset: 0,
        }
        .page(page, PAGE_SIZE)
    }

    /// Restrict to page `page` (zero-based) of `size` results. The limit is
    /// one larger than the page so callers can tell whether another page
    /// exists; see [ListingPage::from_rows]. A page whose offset would not
    /// fit in a database bigint is treated as the first page.
    pub fn page(mut self, page: usize, size: usize) -> Self {
        self.offset = page
            .checked_mul(size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .unwrap_or_else(|| {
                tracing::debug!(page, "ignoring out of range page");
                0
            });
        self.limit = Some(size + 1);
        self
    }

    pub fn has_predicates(&self) -> bool {
        self.r#type.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.bedrooms.is_some()
    }

    /// Does `property` satisfy every supplied predicate? Stores that cannot
    /// push the predicates down to their backend filter with this.
    pub fn matches(&self, property: &Property) -> bool {
        let f = &property.fields;
        self.r#type.map_or(true, |t| f.r#type == t)
            && self.min_price.map_or(true, |min| f.price >= min)
            && self.max_price.map_or(true, |max| f.price <= max)
            && self.bedrooms.map_or(true, |b| f.bedrooms == b)
    }

    /// Query-string form of the predicates, for pagination links.
    pub fn to_query_string(&self, page: usize) -> String {
        let mut parts = vec![];
        if let Some(t) = self.r#type {
            parts.push(format!("type={t}"));
        }
        if let Some(min) = self.min_price {
            parts.push(format!("minPrice={min}"));
        }
        if let Some(max) = self.max_price {
            parts.push(format!("maxPrice={max}"));
        }
        if let Some(b) = self.bedrooms {
            parts.push(format!("bedrooms={b}"));
        }
        parts.push(format!("page={page}"));
        parts.join("&")
    }
}

/// One page of results from a paged [ListingQuery].
#[derive(Debug)]
pub struct ListingPage {
    pub properties: Vec<Property>,
    pub next_page: Option<usize>,
}

impl ListingPage {
    pub fn from_rows(
        mut rows: Vec<Property>,
        page: usize,
        size: usize,
    ) -> Self {
        let next_page = if rows.len() > size {
            rows.truncate(size);
            Some(page + 1)
        } else {
            None
        };
        Self {
            properties: rows,
            next_page,
        }
    }
}

fn non_empty(val: &Option<String>) -> Option<&str> {
    val.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(val: &Option<String>, name: &'static str) -> Option<f64> {
    let raw = non_empty(val)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => {
            tracing::debug!(filter = name, value = raw, "ignoring bad price");
            None
        }
    }
}

fn parse_count(val: &Option<String>, name: &'static str) -> Option<i32> {
    let raw = non_empty(val)?;
    match raw.parse::<i32>() {
        Ok(v) if v >= 0 => Some(v),
        _ => {
            tracing::debug!(filter = name, value = raw, "ignoring bad count");
            None
        }
    }
}
