//! Menu item model.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single orderable dish.
///
/// Serialized with the catalog file's field names (`nome`, `descricao`,
/// `preco`, `tags`); the English names are accepted on input as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMenuItem")]
pub struct MenuItem {
    #[serde(rename = "nome")]
    name: String,

    #[serde(rename = "descricao")]
    description: String,

    #[serde(rename = "preco")]
    price: f64,

    tags: BTreeSet<String>,
}

impl MenuItem {
    /// Create an item, normalizing its tags.
    ///
    /// Fails if `price` is negative or not finite.
    pub fn new<I, S>(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        tags: I,
    ) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        if !price.is_finite() || price < 0.0 {
            return Err(CatalogError::InvalidItem(format!(
                "'{}' has invalid price {}",
                name, price
            )));
        }

        Ok(Self {
            name,
            description: description.into(),
            price,
            tags: tags
                .into_iter()
                .map(|t| normalize_tag(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Lowercased `name + " " + description`, the text keyword hints match against.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.name, self.description).to_lowercase()
    }
}

/// Canonical form of a tag: trimmed and lowercased.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// On-disk shape of an entry.
#[derive(Debug, Deserialize)]
struct RawMenuItem {
    #[serde(alias = "name")]
    nome: String,

    #[serde(default, alias = "description")]
    descricao: String,

    #[serde(alias = "price")]
    preco: f64,

    #[serde(default)]
    tags: Vec<String>,
}

impl TryFrom<RawMenuItem> for MenuItem {
    type Error = CatalogError;

    fn try_from(raw: RawMenuItem) -> Result<Self, Self::Error> {
        MenuItem::new(raw.nome, raw.descricao, raw.preco, raw.tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_normalizes_tags() {
        let item = MenuItem::new("Curry", "Grão-de-bico", 32.0, ["  Vegano ", "PICANTE", ""]).unwrap();

        assert!(item.has_tag("vegano"));
        assert!(item.has_tag("picante"));
        assert_eq!(item.tags().len(), 2);
    }

    #[test]
    fn test_rejects_negative_price() {
        let err = MenuItem::new("Erro", "", -1.0, Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidItem(_)));
    }

    #[test]
    fn test_rejects_nan_price() {
        assert!(MenuItem::new("Erro", "", f64::NAN, Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_deserialize_portuguese_fields() {
        let item: MenuItem = serde_json::from_value(json!({
            "nome": "Salada Vegana",
            "descricao": "Folhas e tofu",
            "preco": 25,
            "tags": ["vegano"]
        }))
        .unwrap();

        assert_eq!(item.name(), "Salada Vegana");
        assert_eq!(item.price(), 25.0);
        assert!(item.has_tag("vegano"));
    }

    #[test]
    fn test_deserialize_english_aliases_and_defaults() {
        let item: MenuItem = serde_json::from_value(json!({
            "name": "Arroz",
            "price": 12.5
        }))
        .unwrap();

        assert_eq!(item.description(), "");
        assert!(item.tags().is_empty());
    }

    #[test]
    fn test_deserialize_negative_price_fails() {
        let result: Result<MenuItem, _> = serde_json::from_value(json!({
            "nome": "Erro",
            "preco": -3
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_with_catalog_field_names() {
        let item = MenuItem::new("Frango", "Grelhado", 30.0, ["sem gluten"]).unwrap();
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["nome"], "Frango");
        assert_eq!(value["descricao"], "Grelhado");
        assert_eq!(value["preco"], 30.0);
        assert_eq!(value["tags"], json!(["sem gluten"]));
    }

    #[test]
    fn test_searchable_text_is_lowercase() {
        let item = MenuItem::new("Frango Grelhado", "Com ARROZ", 30.0, Vec::<String>::new()).unwrap();
        assert_eq!(item.searchable_text(), "frango grelhado com arroz");
    }
}
