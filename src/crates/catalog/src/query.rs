//! Single-item and aggregate catalog queries.

use crate::item::MenuItem;
use crate::store::Catalog;
use serde::{Deserialize, Serialize};

/// Price statistics over the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRangeSummary {
    pub min_price: f64,
    pub max_price: f64,
    /// Mean price rounded to 2 decimals.
    pub avg_price: f64,
    pub total_items: usize,
}

impl Catalog {
    /// The cheapest item; the first one in catalog order on ties.
    pub fn cheapest(&self) -> Option<&MenuItem> {
        self.iter().fold(None, |best, item| match best {
            Some(current) if item.price() >= current.price() => Some(current),
            _ => Some(item),
        })
    }

    /// The most expensive item; the first one in catalog order on ties.
    ///
    /// `Iterator::max_by` keeps the *last* maximum, so the fold is explicit.
    pub fn most_expensive(&self) -> Option<&MenuItem> {
        self.iter().fold(None, |best, item| match best {
            Some(current) if item.price() <= current.price() => Some(current),
            _ => Some(item),
        })
    }

    /// Min, max, rounded mean and count; all zeros for an empty catalog.
    pub fn price_range(&self) -> PriceRangeSummary {
        if self.is_empty() {
            return PriceRangeSummary::default();
        }

        let (min_price, max_price, sum) = self.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), item| (min.min(item.price()), max.max(item.price()), sum + item.price()),
        );

        let avg = sum / self.len() as f64;

        PriceRangeSummary {
            min_price,
            max_price,
            avg_price: round2(avg),
            total_items: self.len(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
