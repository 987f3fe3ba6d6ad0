//! Outcome of running a decision against the catalog.

use crate::decision::Action;
use catalog::{Catalog, MenuItem, PriceRangeSummary, SearchFilter};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

/// Data handed to the summarization call.
///
/// Failures are data too: a query that could not run becomes
/// [`FunctionResult::Failure`] and still reaches the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FunctionResult {
    Search { results: Vec<MenuItem>, count: usize },
    Item { result: Option<MenuItem> },
    PriceRange { result: PriceRangeSummary },
    Failure { error: String },
}

impl FunctionResult {
    pub fn search(items: Vec<&MenuItem>) -> Self {
        let results: Vec<MenuItem> = items.into_iter().cloned().collect();
        let count = results.len();
        FunctionResult::Search { results, count }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        FunctionResult::Failure {
            error: error.into(),
        }
    }

    /// Number of matches; zero for failures.
    pub fn count(&self) -> usize {
        match self {
            FunctionResult::Search { count, .. } => *count,
            FunctionResult::Item { result } => usize::from(result.is_some()),
            FunctionResult::PriceRange { result } => result.total_items,
            FunctionResult::Failure { .. } => 0,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, FunctionResult::Failure { .. })
    }

    /// Wire shape: `{"success": bool, ...payload}`.
    pub fn to_json(&self) -> Value {
        let mut value = match serde_json::to_value(self) {
            Ok(value) => value,
            Err(e) => json!({ "error": e.to_string() }),
        };
        if let Value::Object(map) = &mut value {
            map.insert("success".to_string(), Value::Bool(self.is_success()));
        }
        value
    }
}

/// Run `action` against `catalog`.
///
/// `filter` is only consulted for [`Action::SearchCatalog`].
pub fn execute(catalog: &Catalog, action: Action, filter: &SearchFilter) -> FunctionResult {
    match action {
        Action::SearchCatalog => match catalog.try_search(filter) {
            Ok(items) => FunctionResult::search(items),
            Err(e) => {
                warn!(error = %e, "Search could not run");
                FunctionResult::failure(e.to_string())
            }
        },
        Action::GetCheapestItem => FunctionResult::Item {
            result: catalog.cheapest().cloned(),
        },
        Action::GetMostExpensiveItem => FunctionResult::Item {
            result: catalog.most_expensive().cloned(),
        },
        Action::GetPriceRange => FunctionResult::PriceRange {
            result: catalog.price_range(),
        },
    }
}
