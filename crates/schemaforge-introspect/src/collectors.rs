use std::path::{Path, PathBuf};

use async_trait::async_trait;

use schemaforge_core::{Error, RawColumn, Result};

use crate::adapter::Collector;

/// Collector over rows that are already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCollector {
    columns: Vec<RawColumn>,
}

impl StaticCollector {
    pub fn new(columns: Vec<RawColumn>) -> Self {
        Self { columns }
    }
}

#[async_trait]
impl Collector for StaticCollector {
    fn source(&self) -> &str {
        "static"
    }

    async fn collect(&self) -> Result<Vec<RawColumn>> {
        Ok(self.columns.clone())
    }
}

/// Collector reading a JSON array of raw columns exported by an external tool.
#[derive(Debug, Clone)]
pub struct JsonFileCollector {
    path: PathBuf,
}

impl JsonFileCollector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Collector for JsonFileCollector {
    fn source(&self) -> &str {
        "json"
    }

    async fn collect(&self) -> Result<Vec<RawColumn>> {
        let content = std::fs::read_to_string(&self.path).map_err(|err| {
            Error::Collector(format!("reading {}: {err}", self.path.display()))
        })?;
        let columns = parse_raw_columns(&content)?;
        tracing::debug!(
            event = "raw_columns_loaded",
            path = %self.path.display(),
            columns = columns.len()
        );
        Ok(columns)
    }
}

/// Parse a JSON array of raw columns.
pub fn parse_raw_columns(content: &str) -> Result<Vec<RawColumn>> {
    serde_json::from_str(content).map_err(Error::from)
}
