//! Catalog commands.

use std::path::Path;

use tracing::info;

use goodstock_storefront::catalog::{Catalog, CatalogError};

/// Log every category and its subcategories.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or is invalid.
pub fn list(path: Option<&Path>) -> Result<(), CatalogError> {
    let catalog = load(path)?;
    for entry in catalog.list() {
        info!(
            key = %entry.key,
            name = %entry.name,
            image = %entry.image_url,
            subcategories = %entry.subcategories.join(", "),
            "Category"
        );
    }
    info!(categories = catalog.len(), "Catalog listed");
    Ok(())
}

/// Validate a catalog file.
///
/// # Errors
///
/// Returns the first problem found in the file.
pub fn check(path: &Path) -> Result<(), CatalogError> {
    let catalog = Catalog::from_path(path)?;
    let subcategories: usize = catalog
        .list()
        .iter()
        .map(|entry| entry.subcategories.len())
        .sum();
    info!(
        path = %path.display(),
        categories = catalog.len(),
        subcategories,
        "Catalog is valid"
    );
    Ok(())
}

fn load(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    match path {
        Some(path) => Catalog::from_path(path),
        None => Ok(Catalog::builtin()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_check_accepts_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"key": "sneakers", "name": "Sneakers", "subcategories": ["Running"], "image_url": "/s.jpg"}}]"#
        )
        .unwrap();
        assert!(check(file.path()).is_ok());
    }

    #[test]
    fn test_check_rejects_duplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"key": "bags", "name": "Bags", "image_url": "/b.jpg"}},
                {{"key": "bags", "name": "More Bags", "image_url": "/b2.jpg"}}]"#
        )
        .unwrap();
        assert!(matches!(
            check(file.path()),
            Err(CatalogError::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_list_builtin() {
        assert!(list(None).is_ok());
    }
}
