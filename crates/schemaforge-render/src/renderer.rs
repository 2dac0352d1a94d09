//! Type-directed rendering of one column into a validator expression.

use serde::{Deserialize, Serialize};

use schemaforge_core::{Column, Configuration, SemanticType};

use crate::dialect::{Check, Dialect, dialect};

/// Which facet of a column is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Validates rows read from the source; stays permissive.
    Read,
    /// Validates values about to be written; strict leaves and write hints.
    Write,
}

/// Identifiers computed by the builder that the renderer may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIdentifiers {
    pub enum_constant: Option<String>,
    pub json_schema: Option<String>,
}

/// Render `column` for `mode`.
///
/// Pure and deterministic. Unknown types degrade to the permissive leaf and
/// nothing here can fail. Write checks are attached to the element leaf,
/// before array and null wrappers; transforms come last.
pub fn render(
    column: &Column,
    config: &Configuration,
    identifiers: &ColumnIdentifiers,
    mode: RenderMode,
) -> String {
    let dialect = dialect(config.dialect_variant);
    let write = mode == RenderMode::Write;

    let mut expr = dialect.leaf(column.semantic_type, mode, config);
    if column.is_enum {
        if let Some(enumeration) = enum_expression(dialect, column, identifiers) {
            expr = enumeration;
        }
    } else if let Some(reference) = json_reference(column, config, identifiers) {
        expr = reference.to_string();
    }

    if write && !column.is_enum {
        expr = dialect.checks(&expr, &write_checks(column));
    }

    if column.is_array {
        expr = dialect.array_of(&expr);
    }
    if column.is_nullable {
        expr = dialect.nullable(&expr);
    }

    let optional = match mode {
        RenderMode::Read => column.is_read_optional,
        RenderMode::Write => column.is_write_optional,
    };
    if optional {
        expr = dialect.optional(&expr);
        if let Some(body) = default_transform(column, config) {
            expr = dialect.transform(&expr, body);
        }
    }

    if write && let Some(body) = stringify_transform(column, config, optional) {
        expr = dialect.transform(&expr, &body);
    }

    expr
}

fn enum_expression(
    dialect: &dyn Dialect,
    column: &Column,
    identifiers: &ColumnIdentifiers,
) -> Option<String> {
    if let Some(constant) = identifiers.enum_constant.as_deref() {
        return Some(dialect.enum_of(constant));
    }
    if column.enum_values.is_empty() {
        return None;
    }
    serde_json::to_string(&column.enum_values)
        .ok()
        .map(|literal| dialect.enum_of(&literal))
}

fn json_reference<'a>(
    column: &Column,
    config: &Configuration,
    identifiers: &'a ColumnIdentifiers,
) -> Option<&'a str> {
    if column.semantic_type != SemanticType::Json || config.json_schema_import_location.is_none() {
        return None;
    }
    identifiers.json_schema.as_deref()
}

/// Write-mode refinements in application order.
fn write_checks(column: &Column) -> Vec<Check> {
    let mut checks = Vec::new();
    let hints = column.write_hints;

    if column.semantic_type == SemanticType::String {
        if hints.trim {
            checks.push(Check::Trim);
        }
        if hints.lowercase {
            checks.push(Check::LowerCase);
        }
        if hints.uppercase {
            checks.push(Check::UpperCase);
        }
        if hints.normalize {
            checks.push(Check::Normalize);
        }
    }

    if column.semantic_type.is_numeric() && hints.nonnegative {
        checks.push(Check::NonNegative);
    }

    if column.semantic_type.is_textual() {
        checks.extend(column.min_length.map(Check::MinLength));
        checks.extend(column.max_length.map(Check::MaxLength));
    } else if column.semantic_type.is_numeric() {
        checks.extend(column.min_value.map(Check::Minimum));
        checks.extend(column.max_value.map(Check::Maximum));
    }

    checks
}

fn default_transform(column: &Column, config: &Configuration) -> Option<&'static str> {
    if !column.is_nullable {
        return None;
    }
    if column.is_array && config.default_empty_array_on_nullable_array {
        Some("(value) => value ?? []")
    } else if config.default_undefined_on_nullable {
        Some("(value) => value ?? undefined")
    } else {
        None
    }
}

fn stringify_transform(column: &Column, config: &Configuration, optional: bool) -> Option<String> {
    let inner = match column.semantic_type {
        SemanticType::Json if config.stringify_json_on_write => "JSON.stringify(value)",
        SemanticType::Date if config.stringify_dates_on_write && column.is_array => {
            "value.map((item) => item.toISOString())"
        }
        SemanticType::Date if config.stringify_dates_on_write => "value.toISOString()",
        _ => return None,
    };

    if column.is_nullable || optional {
        Some(format!("(value) => value == null ? value : {inner}"))
    } else {
        Some(format!("(value) => {inner}"))
    }
}
