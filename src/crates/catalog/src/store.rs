//! Catalog storage and loading.

use crate::error::{CatalogError, Result};
use crate::item::MenuItem;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Ordered, read-only collection of menu items.
///
/// An item's identity is its index; indices are stable for the lifetime of
/// the value because there is no mutation API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<MenuItem>,
}

impl Catalog {
    /// The empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from already-validated items.
    pub fn from_items(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// Load a catalog file, degrading to an empty catalog on any failure.
    ///
    /// Missing files and files that are not a JSON array are logged and
    /// produce [`Catalog::empty`]. Entries that fail validation are skipped.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(catalog) => {
                info!(path = %path.display(), items = catalog.len(), "Catalog loaded");
                catalog
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Catalog unavailable, using empty catalog");
                Self::empty()
            }
        }
    }

    /// Load a catalog file, reporting file-level failures.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&content).map_err(|e| match e {
            CatalogError::Malformed { message, .. } => CatalogError::Malformed {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse catalog JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).map_err(|e| CatalogError::Malformed {
            path: Default::default(),
            message: e.to_string(),
        })?;

        let Value::Array(entries) = value else {
            return Err(CatalogError::Malformed {
                path: Default::default(),
                message: "expected a JSON array of items".to_string(),
            });
        };

        let mut items = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<MenuItem>(entry) {
                Ok(item) => items.push(item),
                Err(e) => warn!(index, error = %e, "Skipping invalid catalog entry"),
            }
        }

        debug!(items = items.len(), "Parsed catalog entries");
        Ok(Self { items })
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MenuItem> {
        self.items.iter()
    }

    /// Item at catalog position `index`.
    pub fn get(&self, index: usize) -> Option<&MenuItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a MenuItem;
    type IntoIter = std::slice::Iter<'a, MenuItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
