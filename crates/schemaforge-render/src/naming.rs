//! Identifier derivation for tables and columns.
//!
//! Every name is a pure function of the table kind, the table and column
//! names and the casing options, composed through
//! [`compose_identifier`](schemaforge_core::compose_identifier).

use serde::{Deserialize, Serialize};

use schemaforge_core::{
    Casing, Column, Configuration, SemanticType, Table, TableKind, apply_casing,
    compose_identifier, singularize, to_constant_case,
};

use crate::renderer::ColumnIdentifiers;

const VIEW_PREFIXES: &[&str] = &["v_", "vw_", "view_"];
const MATERIALIZED_VIEW_PREFIXES: &[&str] = &["mv_", "mview_"];

/// Generated names for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableIdentifiers {
    /// Kind token prepended to every name; empty when omitted.
    pub kind_token: String,
    pub entity_name: String,
    pub record_type: String,
    pub base_type: String,
    pub read_schema: String,
    /// Insert/update names only exist for writable relations.
    pub insert_schema: Option<String>,
    pub update_schema: Option<String>,
    pub insert_type: Option<String>,
    pub update_type: Option<String>,
    /// Transform function names, only when case transformation is enabled.
    pub transform_base: Option<String>,
    pub transform_insert: Option<String>,
    pub transform_update: Option<String>,
}

/// Token for the relation kind, or `None` when the name already says it.
pub fn kind_token(kind: TableKind, table_name: &str) -> Option<&'static str> {
    let lower = table_name.to_ascii_lowercase();
    let has_prefix = |prefixes: &[&str]| prefixes.iter().any(|prefix| lower.starts_with(prefix));
    match kind {
        TableKind::Table => Some("table"),
        TableKind::View if has_prefix(VIEW_PREFIXES) => None,
        TableKind::View => Some("view"),
        TableKind::MaterializedView if has_prefix(MATERIALIZED_VIEW_PREFIXES) => None,
        TableKind::MaterializedView => Some("mv"),
        TableKind::ForeignTable => Some("foreign"),
        TableKind::Unknown => None,
    }
}

/// Singular entity name used as the stem of every table-derived identifier.
pub fn entity_name(table_name: &str, config: &Configuration) -> String {
    if config.singularization_enabled {
        singularize(table_name)
    } else {
        table_name.to_string()
    }
}

pub fn table_identifiers(table: &Table, config: &Configuration) -> TableIdentifiers {
    let token = kind_token(table.kind, &table.name).unwrap_or_default();
    let entity = entity_name(&table.name, config);
    let object = |suffix: &[&str]| {
        let mut parts = vec![token, entity.as_str()];
        parts.extend_from_slice(suffix);
        compose_identifier(&parts, config.object_name_casing)
    };
    let transform = |operation: &str| {
        config.case_transform_enabled.then(|| {
            compose_identifier(
                &["transform", token, entity.as_str(), operation, "record"],
                config.field_name_casing,
            )
        })
    };
    let writable = table.kind == TableKind::Table;

    TableIdentifiers {
        kind_token: token.to_string(),
        entity_name: entity.clone(),
        record_type: object(&[]),
        base_type: object(&["base"]),
        read_schema: object(&["schema"]),
        insert_schema: writable.then(|| object(&["insert", "schema"])),
        update_schema: writable.then(|| object(&["update", "schema"])),
        insert_type: writable.then(|| object(&["insert"])),
        update_type: writable.then(|| object(&["update"])),
        transform_base: transform("base"),
        transform_insert: writable.then(|| transform("insert")).flatten(),
        transform_update: writable.then(|| transform("update")).flatten(),
    }
}

/// Property name for a column in generated records.
pub fn property_name(column: &Column, config: &Configuration) -> String {
    if config.case_transform_enabled {
        apply_casing(&column.name, config.field_name_casing)
    } else {
        column.name.clone()
    }
}

/// `USER_STATUS` for `users.status`.
pub fn enum_constant_name(table_name: &str, column_name: &str, config: &Configuration) -> String {
    let entity = entity_name(table_name, config);
    to_constant_case(&compose_identifier(&[&entity, column_name], Casing::SnakeCase))
}

/// `UserStatus` for `users.status` with pascal object casing.
pub fn enum_type_name(table_name: &str, column_name: &str, config: &Configuration) -> String {
    let entity = entity_name(table_name, config);
    compose_identifier(&[&entity, column_name], config.object_name_casing)
}

/// Name of the hand-written sub-schema a json column refers to.
pub fn json_schema_name(table_name: &str, column_name: &str, config: &Configuration) -> String {
    let entity = entity_name(table_name, config);
    compose_identifier(&[&entity, column_name, "schema"], config.object_name_casing)
}

/// Identifiers the renderer needs for `column`.
///
/// The JSON sub-schema name is only derived when an import location is
/// configured; otherwise json columns fall back to the generic leaf.
pub fn column_identifiers(table: &Table, column: &Column, config: &Configuration) -> ColumnIdentifiers {
    ColumnIdentifiers {
        enum_constant: column
            .is_enum
            .then(|| enum_constant_name(&table.name, &column.name, config)),
        json_schema: (column.semantic_type == SemanticType::Json
            && !column.is_enum
            && config.json_schema_import_location.is_some())
        .then(|| json_schema_name(&table.name, &column.name, config)),
    }
}
