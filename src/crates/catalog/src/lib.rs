//! Menu catalog for meal-agent.
//!
//! The catalog is a fixed, ordered list of [`MenuItem`]s loaded once at start
//! up and never mutated afterwards. Share it as `Arc<Catalog>`; every query
//! takes `&self`.
//!
//! Queries:
//! - [`Catalog::search`] evaluates a [`SearchFilter`] (budget, required tags,
//!   excluded tags, keyword hints) and returns up to [`MAX_RESULTS`] items
//!   sorted by price.
//! - [`Catalog::cheapest`] / [`Catalog::most_expensive`] return the extreme
//!   item, first in catalog order on ties.
//! - [`Catalog::price_range`] summarizes prices.
//! - [`extract_tags`] lists the tag vocabulary actually present.
//!
//! An empty catalog is a normal state: searches return nothing, extremes
//! return `None` and the price range is all zeros.

pub mod error;
pub mod filter;
pub mod item;
pub mod query;
pub mod store;
pub mod tags;

pub use error::{CatalogError, Result};
pub use filter::{SearchFilter, MAX_RESULTS};
pub use item::MenuItem;
pub use query::PriceRangeSummary;
pub use store::Catalog;
pub use tags::{extract_tags, extract_tags_from_path};
