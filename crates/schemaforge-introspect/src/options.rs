use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use schemaforge_core::{Error, Result};

/// Table selector for include/exclude rules.
///
/// A single string is a regular expression tested against the table name;
/// a list holds exact table names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableFilter {
    Pattern(String),
    Names(Vec<String>),
}

impl TableFilter {
    /// Compile the filter once; an invalid pattern fails the whole run.
    pub fn compile(&self, label: &str) -> Result<CompiledFilter> {
        match self {
            TableFilter::Pattern(pattern) => Regex::new(pattern)
                .map(CompiledFilter::Pattern)
                .map_err(|err| {
                    Error::Configuration(format!("invalid {label} pattern '{pattern}': {err}"))
                }),
            TableFilter::Names(names) => Ok(CompiledFilter::Names(names.iter().cloned().collect())),
        }
    }
}

/// A [`TableFilter`] ready to be tested against table names.
#[derive(Debug, Clone)]
pub enum CompiledFilter {
    Pattern(Regex),
    Names(HashSet<String>),
}

impl CompiledFilter {
    pub fn matches(&self, table: &str) -> bool {
        match self {
            CompiledFilter::Pattern(regex) => regex.is_match(table),
            CompiledFilter::Names(names) => names.contains(table),
        }
    }
}

/// Options that control how raw columns are normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Namespace every table is assigned to; must not be empty.
    pub schema_name: String,
    pub include: Option<TableFilter>,
    pub exclude: Option<TableFilter>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            schema_name: "public".to_string(),
            include: None,
            exclude: None,
        }
    }
}
