//! One-shot loosening of a search that came back empty.

use crate::decision::Action;
use catalog::SearchFilter;

/// Factor applied to the budget when relaxing.
pub const BUDGET_HEADROOM: f64 = 1.2;

/// Relaxed copy of `filter`.
///
/// Keeps only the first keyword, drops every exclusion and raises the budget
/// by [`BUDGET_HEADROOM`]. Required tags are left alone.
pub fn relax(filter: &SearchFilter) -> SearchFilter {
    let mut relaxed = filter.clone();

    relaxed.required_keywords.truncate(1);
    relaxed.exclude_tags.clear();
    relaxed.budget = filter.budget.map(raise_budget);

    relaxed
}

/// A finite budget stays finite; invalid budgets are passed through untouched.
fn raise_budget(budget: f64) -> f64 {
    if budget.is_finite() {
        (budget * BUDGET_HEADROOM).clamp(f64::MIN, f64::MAX)
    } else {
        budget
    }
}

/// Whether an empty search qualifies for a relaxed retry.
pub fn should_relax(action: Action, filter: &SearchFilter, count: usize) -> bool {
    action == Action::SearchCatalog && !filter.is_empty() && count == 0
}

/// The relaxed filter, or `None` when relaxing changes nothing.
pub fn relaxed_retry(filter: &SearchFilter) -> Option<SearchFilter> {
    let relaxed = relax(filter);
    (relaxed != *filter).then_some(relaxed)
}
