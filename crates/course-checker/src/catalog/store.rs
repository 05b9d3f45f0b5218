use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use super::family::ProgrammeFamily;
use crate::config::CatalogConfig;

/// Backing store the catalog cache refreshes from.
pub trait CatalogStore: Send + Sync {
    /// Cheap reachability probe run before any category is touched.
    fn ping(&self) -> Result<(), CatalogStoreError>;

    /// Raw programme documents of one category.
    fn load_category(
        &self,
        family: ProgrammeFamily,
        category: &str,
    ) -> Result<Vec<Value>, CatalogStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogStoreError {
    #[error("catalog store unreachable: {0}")]
    Unreachable(String),
    #[error("category {category} missing from catalog store")]
    MissingCategory { category: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog data in {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Catalog laid out on disk as `<root>/<family database>/<category>.json`.
///
/// Each category file holds a JSON array of programme documents.
#[derive(Debug, Clone)]
pub struct JsonDirectoryStore {
    root: PathBuf,
    databases: BTreeMap<ProgrammeFamily, String>,
}

impl JsonDirectoryStore {
    pub fn new(root: impl Into<PathBuf>, databases: BTreeMap<ProgrammeFamily, String>) -> Self {
        Self {
            root: root.into(),
            databases,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        let databases = ProgrammeFamily::ordered()
            .into_iter()
            .map(|family| (family, config.database_for(family).to_string()))
            .collect();
        Self::new(config.root.clone(), databases)
    }

    pub fn category_path(&self, family: ProgrammeFamily, category: &str) -> PathBuf {
        let database = self
            .databases
            .get(&family)
            .map(String::as_str)
            .unwrap_or_else(|| family.label());
        self.root.join(database).join(format!("{category}.json"))
    }
}

impl CatalogStore for JsonDirectoryStore {
    fn ping(&self) -> Result<(), CatalogStoreError> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(CatalogStoreError::Unreachable(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            Err(err) => Err(CatalogStoreError::Unreachable(format!(
                "{}: {err}",
                self.root.display()
            ))),
        }
    }

    fn load_category(
        &self,
        family: ProgrammeFamily,
        category: &str,
    ) -> Result<Vec<Value>, CatalogStoreError> {
        let path = self.category_path(family, category);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogStoreError::MissingCategory {
                    category: category.to_string(),
                })
            }
            Err(source) => return Err(CatalogStoreError::Io { path, source }),
        };

        serde_json::from_slice(&raw).map_err(|source| CatalogStoreError::Decode { path, source })
    }
}
