use std::fs::{self, File};
use std::path::Path;

use tracing::info;

use super::errors::{InfraError, InfraResult};
use crate::domain::{Menu, MenuItem};

/// Reads menu catalogs from disk.
///
/// The format is picked from the file extension: `.json` holds an array of
/// items, `.csv` a table with an `id,name,description,price,category` header.
pub struct MenuRepository;

impl MenuRepository {
    pub fn load_menu(path: &Path) -> InfraResult<Menu> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let items = match extension.as_deref() {
            Some("json") => Self::read_json(path)?,
            Some("csv") => Self::read_csv(path)?,
            _ => return Err(InfraError::UnsupportedFormat(path.to_path_buf())),
        };

        let menu = Menu::new(items)?;
        info!(path = %path.display(), items = menu.len(), "menu loaded");
        Ok(menu)
    }

    fn read_json(path: &Path) -> InfraResult<Vec<MenuItem>> {
        let content = fs::read_to_string(path).map_err(|source| InfraError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| InfraError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read_csv(path: &Path) -> InfraResult<Vec<MenuItem>> {
        let file = File::open(path).map_err(|source| InfraError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = csv::Reader::from_reader(file);
        reader
            .deserialize()
            .collect::<Result<Vec<MenuItem>, csv::Error>>()
            .map_err(|source| InfraError::Csv {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, ItemId};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_json_menu() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "menu.json",
            r#"[
                {"id": 1, "name": "Dal", "price": 9.5, "category": "Vegetarian"},
                {"id": 2, "name": "Naan", "description": "Tandoor bread", "price": 4}
            ]"#,
        );

        let menu = MenuRepository::load_menu(&path).unwrap();
        assert_eq!(menu.len(), 2);
        let naan = menu.get(ItemId(2)).unwrap();
        assert_eq!(naan.price.to_string(), "$4.00");
        assert_eq!(naan.description, "Tandoor bread");
        assert!(naan.category.is_empty());
    }

    #[test]
    fn test_load_csv_menu() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "menu.CSV",
            "id,name,description,price,category\n\
             31,Hyderabadi Chai,Spiced tea,2.99,Beverages\n\
             32,Lassi,,4.99,Beverages\n",
        );

        let menu = MenuRepository::load_menu(&path).unwrap();
        assert_eq!(menu.len(), 2);
        assert_eq!(menu.get(ItemId(31)).unwrap().price.cents(), 299);
        assert_eq!(menu.get(ItemId(32)).unwrap().name, "Lassi");
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "menu.json",
            r#"[{"id": 1, "name": "Dal", "price": 9.5}, {"id": 1, "name": "Naan", "price": 4}]"#,
        );

        let err = MenuRepository::load_menu(&path).unwrap_err();
        assert!(matches!(err, InfraError::Domain(DomainError::DuplicateItem(ItemId(1)))));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "menu.json", r#"[{"id": 1, "name": "Dal", "price": -2}]"#);

        let err = MenuRepository::load_menu(&path).unwrap_err();
        assert!(matches!(err, InfraError::Json { .. }));
        assert!(err.to_string().contains("Invalid price"));
    }

    #[test]
    fn test_huge_price_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "menu.json", r#"[{"id": 1, "name": "Dal", "price": 1e30}]"#);

        let err = MenuRepository::load_menu(&path).unwrap_err();
        assert!(matches!(err, InfraError::Json { .. }));
        assert!(err.to_string().contains("Invalid price"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = MenuRepository::load_menu(Path::new("menu.yaml")).unwrap_err();
        assert!(matches!(err, InfraError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = MenuRepository::load_menu(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, InfraError::Io { .. }));
    }
}
