//! Tag vocabulary extraction.

use crate::store::Catalog;
use std::collections::BTreeSet;
use std::path::Path;

/// Every tag used by at least one item, sorted.
pub fn extract_tags(catalog: &Catalog) -> BTreeSet<String> {
    catalog
        .iter()
        .flat_map(|item| item.tags().iter().cloned())
        .collect()
}

/// [`extract_tags`] over a catalog file; unreadable files yield no tags.
pub fn extract_tags_from_path(path: impl AsRef<Path>) -> BTreeSet<String> {
    extract_tags(&Catalog::load(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::MenuItem;
    use std::io::Write;

    #[test]
    fn test_union_of_tags() {
        let catalog = Catalog::from_items(vec![
            MenuItem::new("A", "", 1.0, ["vegano", "picante"]).unwrap(),
            MenuItem::new("B", "", 2.0, ["sem lactose", "vegano"]).unwrap(),
            MenuItem::new("C", "", 3.0, Vec::<String>::new()).unwrap(),
        ]);

        let tags: Vec<_> = extract_tags(&catalog).into_iter().collect();
        assert_eq!(tags, vec!["picante", "sem lactose", "vegano"]);
    }

    #[test]
    fn test_empty_catalog_has_no_tags() {
        assert!(extract_tags(&Catalog::empty()).is_empty());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"nome": "A", "preco": 1, "tags": ["Sem Gluten"]}}]"#
        )
        .unwrap();

        let tags = extract_tags_from_path(file.path());
        assert!(tags.contains("sem gluten"));
        assert!(extract_tags_from_path("/missing/catalogo.json").is_empty());
    }
}
