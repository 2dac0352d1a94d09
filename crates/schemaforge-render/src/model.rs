use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use schemaforge_core::{Column, Schema, TableKind};

use crate::naming::TableIdentifiers;

/// One column as the template stage sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRenderModel {
    pub column: Column,
    pub property_name: String,
    pub read_expression: String,
    pub write_expression: String,
    /// Exported constant holding the enumeration values (`USER_STATUS`).
    pub enum_name: Option<String>,
    pub enum_type_name: Option<String>,
    pub json_schema_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDefinition {
    pub constant_name: String,
    pub type_name: String,
    pub values: Vec<String>,
}

/// Hand-written JSON sub-schema imported by the generated module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSchemaImport {
    pub name: String,
    pub location: String,
}

/// One table as the template stage sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRenderModel {
    pub name: String,
    pub schema: String,
    pub kind: TableKind,
    pub identifiers: TableIdentifiers,
    pub columns: Vec<ColumnRenderModel>,
    /// Subset of `columns` accepted by insert/update schemas.
    pub write_columns: Vec<ColumnRenderModel>,
    pub enums: Vec<EnumDefinition>,
    pub json_imports: Vec<JsonSchemaImport>,
}

/// Table names grouped by kind label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSummary {
    pub name: String,
    pub tables: BTreeMap<String, Vec<String>>,
}

impl SchemaSummary {
    pub fn from_schema(schema: &Schema) -> Self {
        let mut tables: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for table in &schema.tables {
            tables
                .entry(table.kind.as_str().to_string())
                .or_default()
                .push(table.name.clone());
        }
        Self {
            name: schema.name.clone(),
            tables,
        }
    }

    pub fn table_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }
}

/// Everything one run hands to the template stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub contract_version: String,
    pub summary: SchemaSummary,
    pub tables: Vec<TableRenderModel>,
}

impl RenderOutput {
    pub fn table(&self, name: &str) -> Option<&TableRenderModel> {
        self.tables.iter().find(|table| table.name == name)
    }
}
