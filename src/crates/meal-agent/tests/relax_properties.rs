//! Property tests for the one-shot relaxation.

use catalog::{Catalog, MenuItem, SearchFilter};
use meal_agent::relax::{relax, relaxed_retry, should_relax, BUDGET_HEADROOM};
use meal_agent::Action;
use proptest::prelude::*;

const TAGS: &[&str] = &["vegano", "sem lactose", "picante", "sem gluten"];
const WORDS: &[&str] = &["frango", "arroz", "tofu", "legumes", "peixe"];

fn filter_strategy() -> impl Strategy<Value = SearchFilter> {
    (
        proptest::option::of(0u32..10_000),
        proptest::sample::subsequence(TAGS.to_vec(), 0..=2),
        proptest::sample::subsequence(TAGS.to_vec(), 0..=2),
        proptest::sample::subsequence(WORDS.to_vec(), 0..=4),
    )
        .prop_map(|(budget, include, exclude, keywords)| SearchFilter {
            budget: budget.map(|cents| f64::from(cents) / 100.0),
            include_tags: include.into_iter().map(String::from).collect(),
            exclude_tags: exclude.into_iter().map(String::from).collect(),
            required_keywords: keywords.into_iter().map(String::from).collect(),
        })
}

fn catalog_strategy() -> impl Strategy<Value = Catalog> {
    proptest::collection::vec(
        (
            proptest::sample::select(WORDS.to_vec()),
            0u32..10_000,
            proptest::sample::subsequence(TAGS.to_vec(), 0..=3),
        ),
        0..20,
    )
    .prop_map(|rows| {
        Catalog::from_items(
            rows.into_iter()
                .map(|(word, cents, tags)| {
                    MenuItem::new(format!("Prato com {word}"), "", f64::from(cents) / 100.0, tags)
                        .unwrap()
                })
                .collect(),
        )
    })
}

proptest! {
    #[test]
    fn prop_relaxed_filter_is_weaker(filter in filter_strategy()) {
        let relaxed = relax(&filter);

        prop_assert!(relaxed.exclude_tags.is_empty());
        prop_assert!(relaxed.required_keywords.len() <= 1);
        prop_assert_eq!(&relaxed.include_tags, &filter.include_tags);
        prop_assert_eq!(relaxed.required_keywords.first(), filter.required_keywords.first());

        match (filter.budget, relaxed.budget) {
            (Some(before), Some(after)) => {
                prop_assert!((after - before * BUDGET_HEADROOM).abs() < 1e-9);
            }
            (None, None) => {}
            other => prop_assert!(false, "budget presence changed: {:?}", other),
        }
    }

    #[test]
    fn prop_relaxed_search_never_loses_matches(catalog in catalog_strategy(), filter in filter_strategy()) {
        // Keyword hints are OR-ed, so dropping all but the first can lose matches.
        prop_assume!(filter.required_keywords.len() <= 1);
        let relaxed = relax(&filter);
        for item in catalog.iter().filter(|item| filter.matches(item)) {
            prop_assert!(relaxed.matches(item));
        }
    }

    #[test]
    fn prop_retry_only_when_something_changes(filter in filter_strategy()) {
        match relaxed_retry(&filter) {
            Some(relaxed) => prop_assert_ne!(relaxed, filter),
            None => prop_assert_eq!(relax(&filter), filter),
        }
    }

    #[test]
    fn prop_only_empty_searches_relax(filter in filter_strategy(), count in 0usize..5) {
        let expected = count == 0 && !filter.is_empty();
        prop_assert_eq!(should_relax(Action::SearchCatalog, &filter, count), expected);
        prop_assert!(!should_relax(Action::GetPriceRange, &filter, count));
    }
}
