//! Read-only lookup of geo data files on disk.
//!
//! Resolves logical names ("world", a country key) to files under the data
//! directory and reads them. Failures are split into "not found" and
//! "unreadable" so the HTTP layer can answer 404 vs 500.

mod error;

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::de::IgnoredAny;
use serde_json::Value;
use tracing::debug;

pub use error::{DataError, Result};

/// World boundary file names, in lookup order
pub const WORLD_CANDIDATES: &[&str] = &[
    "world-110m.json",
    "world-110m.topojson",
    "world-110m.geojson",
];

/// Subdirectory holding per-country admin boundary files
pub const ADMIN_DIR: &str = "admin-by-country";

/// File name suffix of admin boundary files: `<country>-admin.json`
pub const ADMIN_SUFFIX: &str = "-admin.json";

/// Handle on the data directory
#[derive(Debug, Clone)]
pub struct DataStore {
    base_dir: PathBuf,
}

impl DataStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Locate the world boundary file
    pub async fn world_file_path(&self) -> Result<PathBuf> {
        for name in WORLD_CANDIDATES {
            let path = self.base_dir.join(name);
            if exists(&path).await {
                return Ok(path);
            }
        }
        Err(DataError::NotFound("world geo file not found".to_string()))
    }

    /// Locate the admin boundary file for a country key
    pub async fn admin_file_path(&self, country: &str) -> Result<PathBuf> {
        let not_found = || DataError::NotFound("admin geo file not found".to_string());

        let key = normalize_country_key(country).ok_or_else(not_found)?;
        let path = self
            .base_dir
            .join(ADMIN_DIR)
            .join(format!("{key}{ADMIN_SUFFIX}"));

        if exists(&path).await {
            Ok(path)
        } else {
            debug!("No admin file for country '{}' at {}", country, path.display());
            Err(not_found())
        }
    }

    /// Country keys that have an admin boundary file, sorted
    pub async fn list_admin_countries(&self) -> Result<Vec<String>> {
        let dir = self.base_dir.join(ADMIN_DIR);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DataError::io(&dir, e)),
        };

        let mut countries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DataError::io(&dir, e))?
        {
            let name = entry.file_name();
            if let Some(key) = name.to_str().and_then(|n| n.strip_suffix(ADMIN_SUFFIX)) {
                countries.push(key.to_string());
            }
        }

        countries.sort();
        Ok(countries)
    }

    /// Pre-compressed `<path>.gz` next to a data file, if present
    pub async fn gzip_sibling(&self, path: &Path) -> Option<PathBuf> {
        let mut name = path.as_os_str().to_owned();
        name.push(".gz");
        let gz = PathBuf::from(name);
        exists(&gz).await.then_some(gz)
    }

    pub async fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| DataError::io(path, e))
    }

    /// Read and parse a JSON document
    pub async fn read_json(&self, path: &Path) -> Result<Value> {
        let bytes = self.read_bytes(path).await?;
        serde_json::from_slice(&bytes).map_err(|e| DataError::json(path, e))
    }

    /// Read a file, checking that it is well-formed JSON without building a tree
    pub async fn read_validated_json(&self, path: &Path) -> Result<Vec<u8>> {
        let bytes = self.read_bytes(path).await?;
        serde_json::from_slice::<IgnoredAny>(&bytes).map_err(|e| DataError::json(path, e))?;
        Ok(bytes)
    }

    pub async fn file_size(&self, path: &Path) -> Result<u64> {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.len())
            .map_err(|e| DataError::io(path, e))
    }

    /// Path relative to the data directory, with `/` separators
    pub fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.base_dir).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Strip `..` sequences from a country key.
///
/// Returns `None` for keys that are empty afterwards or still contain a path
/// separator.
pub fn normalize_country_key(country: &str) -> Option<String> {
    let key = country.replace("..", "");
    if key.is_empty() || key.contains(|c: char| c == '/' || c == '\\') {
        return None;
    }
    Some(key)
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
