//! Property browsing. User-selected filters (type, price range, bedroom
//! count) become a [models::ListingQuery], which stores evaluate either by
//! pushing predicates into SQL or with [models::ListingQuery::matches].

pub mod components;
pub mod models;
