use schemaforge_core::{Column, Configuration, Diagnostics, RawColumn, TableKind, WriteHints};

use crate::constraints::extract_enum;
use crate::types::map_data_type;

/// Build one normalized column from a raw collector row.
pub fn build_column(raw: &RawColumn, config: &Configuration, diagnostics: &dyn Diagnostics) -> Column {
    let mapped = map_data_type(&raw.data_type, config.unknown_type_fallback);
    if !mapped.recognized {
        diagnostics.debug(
            "type_unmapped",
            &format!(
                "{}.{}: '{}' mapped to {:?}",
                raw.table, raw.name, raw.data_type, mapped.semantic_type
            ),
        );
    }

    let enum_values = extract_enum(&raw.name, &raw.check_constraints);
    if enum_values.is_empty() && !raw.check_constraints.is_empty() {
        diagnostics.debug(
            "constraint_unrecognized",
            &format!(
                "{}.{}: no enumeration in {} check clause(s)",
                raw.table,
                raw.name,
                raw.check_constraints.len()
            ),
        );
    }

    let default_value = raw
        .default_value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    let is_serial = mapped.is_serial
        || raw.is_identity
        || default_value.as_deref().is_some_and(is_generated_default);
    let annotations = parse_annotations(raw.description.as_deref().unwrap_or_default());

    let (mut min_length, mut min_value) = (annotations.min_length, None);
    let (mut max_length, mut max_value) = (annotations.max_length.or(raw.max_length), None);
    if let Some(min) = annotations.min {
        if mapped.semantic_type.is_textual() {
            min_length = min_length.or(as_length(min));
        } else {
            min_value = Some(min);
        }
    }
    if let Some(max) = annotations.max {
        if mapped.semantic_type.is_textual() {
            max_length = annotations.max_length.or(as_length(max)).or(raw.max_length);
        } else {
            max_value = Some(max);
        }
    }

    let mut column = Column {
        name: raw.name.clone(),
        data_type: raw.data_type.clone(),
        semantic_type: mapped.semantic_type,
        is_nullable: raw.is_nullable,
        is_array: mapped.is_array,
        is_enum: !enum_values.is_empty(),
        enum_values,
        is_serial,
        is_writable: !is_serial && raw.table_kind == TableKind::Table,
        is_read_optional: false,
        is_write_optional: false,
        min_length,
        max_length,
        min_value,
        max_value,
        default_value,
        description: raw.description.clone(),
        is_deprecated: annotations.deprecated.is_some(),
        deprecation_reason: annotations.deprecated.flatten(),
        write_hints: annotations.hints,
    };
    column.sync_optionality();
    column
}

fn is_generated_default(default: &str) -> bool {
    let lower = default.to_ascii_lowercase();
    lower.starts_with("nextval(") || lower.contains("auto_increment")
}

fn as_length(value: f64) -> Option<u32> {
    (value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX)).then_some(value as u32)
}

/// Tags recognized in column descriptions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// `Some(reason)` when `@deprecated` is present; the reason is optional.
    pub deprecated: Option<Option<String>>,
    pub hints: WriteHints,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Parse `@tag` annotations out of a free-text description.
///
/// Recognized: `@deprecated [reason]`, `@trim`, `@lowercase`, `@uppercase`,
/// `@normalize`, `@nonnegative`, `@minLength N`, `@maxLength N`, `@min N`,
/// `@max N`. Unknown tags and malformed numbers are ignored.
pub fn parse_annotations(description: &str) -> Annotations {
    let mut annotations = Annotations::default();

    for line in description.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut index = 0;
        while index < tokens.len() {
            let Some(tag) = tokens[index].strip_prefix('@') else {
                index += 1;
                continue;
            };
            let argument = tokens.get(index + 1).copied();
            match tag.to_ascii_lowercase().as_str() {
                "deprecated" => {
                    let reason: Vec<&str> = tokens[index + 1..]
                        .iter()
                        .take_while(|token| !token.starts_with('@'))
                        .copied()
                        .collect();
                    index += reason.len();
                    annotations.deprecated =
                        Some((!reason.is_empty()).then(|| reason.join(" ")));
                }
                "trim" => annotations.hints.trim = true,
                "lowercase" => annotations.hints.lowercase = true,
                "uppercase" => annotations.hints.uppercase = true,
                "normalize" => annotations.hints.normalize = true,
                "nonnegative" => annotations.hints.nonnegative = true,
                "minlength" => {
                    annotations.min_length = argument.and_then(|value| value.parse().ok());
                }
                "maxlength" => {
                    annotations.max_length = argument.and_then(|value| value.parse().ok());
                }
                "min" => annotations.min = argument.and_then(|value| value.parse().ok()),
                "max" => annotations.max = argument.and_then(|value| value.parse().ok()),
                _ => {}
            }
            index += 1;
        }
    }

    annotations
}
