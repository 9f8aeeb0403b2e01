use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{EsgData, EsgError, StoredEsgData, StoredStrategySelection, StrategySelection};

const ESG_DATA_FILE: &str = "esg-data.json";
const STRATEGY_FILE: &str = "selected-strategy.json";

/// A single JSON document on disk. Every `put` replaces the whole file.
#[derive(Debug, Clone)]
pub struct JsonSlot<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonSlot<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Read the current value. A missing file is `Ok(None)`, not an error.
    pub fn get(&self) -> Result<Option<T>, EsgError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // The dashboard wrote a literal `null` when nothing was saved yet.
        let value: Option<T> = serde_json::from_str(&raw)?;
        Ok(value)
    }

    /// Replace the stored value.
    ///
    /// Each call writes its own hidden temp file next to the target and
    /// renames it into place. Readers never observe a half-written document
    /// and concurrent writers resolve to the last rename.
    pub fn put(&self, value: &T) -> Result<(), EsgError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| EsgError::Storage(format!("invalid slot path {}", self.path.display())))?;
        let json = serde_json::to_string_pretty(value)?;
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{file_name}."))
            .suffix(".tmp")
            .tempfile_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| EsgError::from(e.error))?;
        Ok(())
    }
}

/// The service's two independent single-record collections.
#[derive(Debug, Clone)]
pub struct EsgStore {
    esg_data: JsonSlot<StoredEsgData>,
    strategy: JsonSlot<StoredStrategySelection>,
}

impl EsgStore {
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            esg_data: JsonSlot::new(dir.join(ESG_DATA_FILE)),
            strategy: JsonSlot::new(dir.join(STRATEGY_FILE)),
        }
    }

    pub fn get_esg_data(&self) -> Result<Option<StoredEsgData>, EsgError> {
        self.esg_data.get()
    }

    /// Store a record, replacing the previous one. Each save is given a fresh
    /// id; ids from earlier saves are not carried over.
    pub fn put_esg_data(&self, data: EsgData) -> Result<StoredEsgData, EsgError> {
        let now = Utc::now();
        let stored = StoredEsgData {
            data,
            id: now.timestamp_millis().to_string(),
            updated_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        self.esg_data.put(&stored)?;
        tracing::info!(
            target: "esg_store",
            company = %stored.data.company_name,
            year = stored.data.reporting_year,
            id = %stored.id,
            "saved esg data"
        );
        Ok(stored)
    }

    pub fn get_selected_strategy(&self) -> Result<Option<StoredStrategySelection>, EsgError> {
        self.strategy.get()
    }

    pub fn put_selected_strategy(
        &self,
        selection: StrategySelection,
    ) -> Result<StoredStrategySelection, EsgError> {
        let stored = StoredStrategySelection {
            selection,
            saved_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        self.strategy.put(&stored)?;
        tracing::info!(
            target: "esg_store",
            variant = stored.selection.variant.as_str(),
            "saved strategy selection"
        );
        Ok(stored)
    }
}
