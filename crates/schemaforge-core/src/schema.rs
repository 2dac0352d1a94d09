use std::fmt;

use serde::{Deserialize, Serialize};

/// Column description exactly as a source collector reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    pub table: String,
    pub name: String,
    /// Declared type as the engine spells it (e.g. `character varying(255)`, `_text`).
    pub data_type: String,
    pub is_nullable: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw CHECK clauses, already unescaped, in the engine's own grammar.
    #[serde(default)]
    pub check_constraints: Vec<String>,
    #[serde(default)]
    pub table_kind: TableKind,
    /// `GENERATED ... AS IDENTITY` or `AUTO_INCREMENT`.
    #[serde(default)]
    pub is_identity: bool,
    /// Namespace the collector read the column from, when it knows.
    #[serde(default)]
    pub schema: Option<String>,
}

/// Kind of relation a column belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TableKind {
    #[default]
    Table,
    View,
    MaterializedView,
    ForeignTable,
    Unknown,
}

impl TableKind {
    /// Stable snake_case label, also used as the primary sort key.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Table => "table",
            TableKind::View => "view",
            TableKind::MaterializedView => "materialized_view",
            TableKind::ForeignTable => "foreign_table",
            TableKind::Unknown => "unknown",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "table" | "base_table" | "partitioned_table" => TableKind::Table,
            "view" => TableKind::View,
            "materialized_view" | "matview" => TableKind::MaterializedView,
            "foreign_table" | "foreign" => TableKind::ForeignTable,
            _ => TableKind::Unknown,
        }
    }
}

impl From<String> for TableKind {
    fn from(value: String) -> Self {
        TableKind::from_label(&value)
    }
}

impl From<TableKind> for String {
    fn from(value: TableKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of abstract column types, independent of any engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    String,
    Int,
    Number,
    Boolean,
    Date,
    Uuid,
    Email,
    Url,
    Json,
    #[default]
    Unknown,
    Any,
}

impl SemanticType {
    /// Types whose values are strings and accept length bounds.
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            SemanticType::String | SemanticType::Email | SemanticType::Url | SemanticType::Uuid
        )
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, SemanticType::Int | SemanticType::Number)
    }
}

/// Write-side transform hints, applied in the fixed order of the fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteHints {
    pub trim: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    pub normalize: bool,
    pub nonnegative: bool,
}

impl WriteHints {
    pub fn is_empty(&self) -> bool {
        *self == WriteHints::default()
    }
}

/// Normalized column owned by exactly one [`Table`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub semantic_type: SemanticType,
    pub is_nullable: bool,
    pub is_array: bool,
    pub is_enum: bool,
    pub enum_values: Vec<String>,
    pub is_serial: bool,
    pub is_writable: bool,
    pub is_read_optional: bool,
    pub is_write_optional: bool,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub default_value: Option<String>,
    pub description: Option<String>,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
    pub write_hints: WriteHints,
}

impl Column {
    /// Writable, required column of the given type; mostly useful in tests and hooks.
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            is_writable: true,
            ..Self::default()
        }
    }

    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }

    /// Recompute both optionality flags from nullability and the default value.
    pub fn sync_optionality(&mut self) {
        self.is_read_optional = self.is_nullable;
        self.is_write_optional = self.is_nullable || self.has_default();
    }
}

/// A table-like relation with its columns in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub schema: String,
    pub kind: TableKind,
    pub columns: Vec<Column>,
}

/// Root of one generation run: every table, sorted by kind then name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub tables: Vec<Table>,
}

impl Schema {
    /// Build a schema, establishing the table ordering invariant.
    pub fn new(name: impl Into<String>, mut tables: Vec<Table>) -> Self {
        sort_tables(&mut tables);
        Self {
            name: name.into(),
            tables,
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }
}

/// Sort tables by `(kind label, name)` using ordinal string comparison.
pub fn sort_tables(tables: &mut [Table]) {
    tables.sort_by(|left, right| {
        left.kind
            .as_str()
            .cmp(right.kind.as_str())
            .then_with(|| left.name.cmp(&right.name))
    });
}
