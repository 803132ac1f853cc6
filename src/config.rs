// Settings, loaded from a JSON file
use crate::attributes::{AttributeClassification, ClassificationLists};
use crate::dispatcher::RecordFormatDispatcher;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "br-formatter.json";
pub const DEFAULT_DATABASE_PATH: &str = "records.db";

/// Per-table classification lists plus where the record store lives.
///
/// ```json
/// {
///   "database": "records.db",
///   "tables": {
///     "products": { "money_attributes": ["price"], "boolean_attributes": ["active"] }
///   }
/// }
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub database: PathBuf,
    pub tables: HashMap<String, ClassificationLists>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database: PathBuf::from(DEFAULT_DATABASE_PATH),
            tables: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Missing file means default settings
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Classification for a table; unknown tables classify nothing
    pub fn classification(&self, table: &str) -> Result<AttributeClassification> {
        match self.tables.get(table) {
            Some(lists) => AttributeClassification::try_from(lists)
                .with_context(|| format!("Invalid classification for table '{}'", table)),
            None => Ok(AttributeClassification::new()),
        }
    }

    pub fn dispatcher(&self, table: &str) -> Result<RecordFormatDispatcher> {
        Ok(RecordFormatDispatcher::new(self.classification(table)?))
    }
}
