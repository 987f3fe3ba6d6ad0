//! Filter engine.
//!
//! A [`SearchFilter`] combines four independent clauses. An item survives
//! when it passes every clause that is set:
//!
//! | clause              | semantics                                          |
//! |---------------------|----------------------------------------------------|
//! | `budget`            | `price <= budget`                                  |
//! | `include_tags`      | item has **all** of them                           |
//! | `exclude_tags`      | item has **none** of them                          |
//! | `required_keywords` | **any** keyword occurs in name + description       |
//!
//! Keyword hints are OR-ed: the model emits lists such as
//! `["frango", "carne", "peixe", "tofu"]` for "protein" and expects any of
//! them to qualify a dish.

use crate::error::{CatalogError, Result};
use crate::item::MenuItem;
use crate::store::Catalog;
use serde::{Deserialize, Serialize};

/// Maximum number of items a search returns.
pub const MAX_RESULTS: usize = 10;

/// Structured search constraints. The default filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Inclusive upper bound on price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,

    /// Tags an item must all carry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_tags: Vec<String>,

    /// Tags that disqualify an item.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_tags: Vec<String>,

    /// Ingredient hints; at least one must appear in name or description.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_keywords: Vec<String>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn include_tag(mut self, tag: impl Into<String>) -> Self {
        self.include_tags.push(tag.into());
        self
    }

    pub fn exclude_tag(mut self, tag: impl Into<String>) -> Self {
        self.exclude_tags.push(tag.into());
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.required_keywords.push(keyword.into());
        self
    }

    /// True when no clause is set.
    pub fn is_empty(&self) -> bool {
        self.budget.is_none()
            && self.include_tags.is_empty()
            && self.exclude_tags.is_empty()
            && self.required_keywords.is_empty()
    }

    /// Check that the filter can be evaluated.
    pub fn validate(&self) -> Result<()> {
        if let Some(budget) = self.budget {
            if !budget.is_finite() {
                return Err(CatalogError::InvalidFilter(format!(
                    "budget must be a finite number, got {}",
                    budget
                )));
            }
            if budget < 0.0 {
                return Err(CatalogError::InvalidFilter(format!(
                    "budget must not be negative, got {}",
                    budget
                )));
            }
        }
        Ok(())
    }

    /// Whether `item` passes every set clause.
    pub fn matches(&self, item: &MenuItem) -> bool {
        if let Some(budget) = self.budget {
            if item.price() > budget {
                return false;
            }
        }

        if !self.include_tags.iter().all(|tag| item.has_tag(tag)) {
            return false;
        }

        if self.exclude_tags.iter().any(|tag| item.has_tag(tag)) {
            return false;
        }

        if !self.required_keywords.is_empty() {
            let text = item.searchable_text();
            if !self
                .required_keywords
                .iter()
                .any(|keyword| text.contains(&keyword.to_lowercase()))
            {
                return false;
            }
        }

        true
    }
}

impl Catalog {
    /// Items passing `filter`, cheapest first, at most [`MAX_RESULTS`].
    ///
    /// Ties on price keep catalog order.
    pub fn search(&self, filter: &SearchFilter) -> Vec<&MenuItem> {
        let mut results: Vec<&MenuItem> = self.iter().filter(|item| filter.matches(item)).collect();

        // sort_by is stable
        results.sort_by(|a, b| a.price().total_cmp(&b.price()));
        results.truncate(MAX_RESULTS);
        results
    }

    /// [`Catalog::search`] after validating the filter.
    pub fn try_search(&self, filter: &SearchFilter) -> Result<Vec<&MenuItem>> {
        filter.validate()?;
        Ok(self.search(filter))
    }
}
