use schemaforge_core::{SemanticType, UnknownTypeFallback};

/// Result of mapping a source-native type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedType {
    pub semantic_type: SemanticType,
    pub is_array: bool,
    /// The type itself implies an auto-generated value (`serial`, `bigserial`).
    pub is_serial: bool,
    /// False when the type fell back to `unknown`/`any`.
    pub recognized: bool,
}

/// Map a declared data type to a semantic type.
///
/// Lookup is case-insensitive, ignores precision/length suffixes and schema
/// qualifiers, and detects arrays from a leading `_` (`_text`) or trailing
/// `[]` (`text[]`).
pub fn map_data_type(data_type: &str, fallback: Option<UnknownTypeFallback>) -> MappedType {
    let (base, is_array) = strip_array(&normalize_type_name(data_type));

    let is_serial = matches!(
        base.as_str(),
        "serial" | "serial2" | "serial4" | "serial8" | "smallserial" | "bigserial"
    );

    let semantic_type = match base.as_str() {
        "text" | "varchar" | "character varying" | "char" | "character" | "bpchar" | "nchar"
        | "nvarchar" | "ntext" | "citext" | "name" | "string" | "tinytext" | "mediumtext"
        | "longtext" | "clob" | "xml" | "inet" | "cidr" | "macaddr" | "macaddr8" | "time"
        | "timetz" | "time without time zone" | "time with time zone" | "interval"
        | "tsvector" | "tsquery" => Some(SemanticType::String),
        "int" | "int2" | "int4" | "int8" | "integer" | "smallint" | "bigint" | "tinyint"
        | "mediumint" | "oid" => Some(SemanticType::Int),
        _ if is_serial => Some(SemanticType::Int),
        "numeric" | "decimal" | "real" | "float" | "float4" | "float8" | "double"
        | "double precision" | "money" | "smallmoney" | "number" => Some(SemanticType::Number),
        "bool" | "boolean" | "bit" => Some(SemanticType::Boolean),
        "date" | "timestamp" | "timestamptz" | "timestamp without time zone"
        | "timestamp with time zone" | "datetime" | "datetime2" | "smalldatetime"
        | "datetimeoffset" => Some(SemanticType::Date),
        "uuid" | "uniqueidentifier" => Some(SemanticType::Uuid),
        "email" => Some(SemanticType::Email),
        "url" | "uri" => Some(SemanticType::Url),
        "json" | "jsonb" => Some(SemanticType::Json),
        _ => None,
    };

    MappedType {
        semantic_type: semantic_type.unwrap_or(match fallback {
            Some(UnknownTypeFallback::Any) => SemanticType::Any,
            Some(UnknownTypeFallback::Unknown) | None => SemanticType::Unknown,
        }),
        is_array,
        is_serial,
        recognized: semantic_type.is_some(),
    }
}

/// Lowercase, drop quotes, schema qualifiers and `(n)` / `(p, s)` suffixes.
fn normalize_type_name(data_type: &str) -> String {
    let lower = data_type.trim().to_lowercase().replace('"', "");
    let mut stripped = String::with_capacity(lower.len());
    let mut depth = 0_u32;
    for ch in lower.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(ch),
            _ => {}
        }
    }

    let unqualified = match stripped.rsplit_once('.') {
        Some((_, name)) => name,
        None => stripped.as_str(),
    };
    unqualified.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_array(name: &str) -> (String, bool) {
    if let Some(element) = name.strip_prefix('_') {
        return (element.to_string(), true);
    }
    let mut base = name;
    let mut is_array = false;
    while let Some(element) = base.strip_suffix("[]") {
        base = element.trim_end();
        is_array = true;
    }
    if base == "array" {
        return (String::new(), true);
    }
    (base.to_string(), is_array)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semantic(data_type: &str) -> SemanticType {
        map_data_type(data_type, None).semantic_type
    }

    #[test]
    fn maps_common_engine_types() {
        assert_eq!(semantic("VARCHAR(255)"), SemanticType::String);
        assert_eq!(semantic("character varying(64)"), SemanticType::String);
        assert_eq!(semantic("int4"), SemanticType::Int);
        assert_eq!(semantic("numeric(10, 2)"), SemanticType::Number);
        assert_eq!(semantic("timestamp(6) with time zone"), SemanticType::Date);
        assert_eq!(semantic("pg_catalog.uuid"), SemanticType::Uuid);
        assert_eq!(semantic("jsonb"), SemanticType::Json);
        assert_eq!(semantic("Boolean"), SemanticType::Boolean);
    }

    #[test]
    fn detects_arrays() {
        let underscore = map_data_type("_text", None);
        assert!(underscore.is_array);
        assert_eq!(underscore.semantic_type, SemanticType::String);

        let brackets = map_data_type("integer[]", None);
        assert!(brackets.is_array);
        assert_eq!(brackets.semantic_type, SemanticType::Int);

        let opaque = map_data_type("ARRAY", None);
        assert!(opaque.is_array);
        assert_eq!(opaque.semantic_type, SemanticType::Unknown);
    }

    #[test]
    fn serial_types_are_generated_ints() {
        let mapped = map_data_type("bigserial", None);
        assert_eq!(mapped.semantic_type, SemanticType::Int);
        assert!(mapped.is_serial);
    }

    #[test]
    fn unmapped_types_use_configured_fallback() {
        let unknown = map_data_type("geometry", None);
        assert_eq!(unknown.semantic_type, SemanticType::Unknown);
        assert!(!unknown.recognized);

        let any = map_data_type("geometry", Some(UnknownTypeFallback::Any));
        assert_eq!(any.semantic_type, SemanticType::Any);
    }
}
