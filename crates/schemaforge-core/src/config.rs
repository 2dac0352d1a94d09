use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Output syntax targeted by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DialectVariant {
    /// Method chaining with refinement-style format leaves.
    #[serde(rename = "v1")]
    V1,
    /// Method chaining with top-level format leaves.
    #[default]
    #[serde(rename = "v2")]
    V2,
    /// Function composition with grouped checks.
    #[serde(rename = "v2-lite")]
    V2Lite,
}

impl DialectVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialectVariant::V1 => "v1",
            DialectVariant::V2 => "v2",
            DialectVariant::V2Lite => "v2-lite",
        }
    }
}

impl FromStr for DialectVariant {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "v1" => Ok(DialectVariant::V1),
            "v2" => Ok(DialectVariant::V2),
            "v2-lite" | "v2_lite" | "v2lite" => Ok(DialectVariant::V2Lite),
            other => Err(Error::Configuration(format!(
                "unknown dialect variant '{other}' (expected v1, v2 or v2-lite)"
            ))),
        }
    }
}

impl fmt::Display for DialectVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Casing applied to generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Casing {
    CamelCase,
    SnakeCase,
    PascalCase,
    /// Keep the source spelling untouched.
    Passthrough,
}

impl FromStr for Casing {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "camel_case" | "camel" | "camelcase" => Ok(Casing::CamelCase),
            "snake_case" | "snake" => Ok(Casing::SnakeCase),
            "pascal_case" | "pascal" | "pascalcase" => Ok(Casing::PascalCase),
            "passthrough" | "none" | "keep" => Ok(Casing::Passthrough),
            other => Err(Error::Configuration(format!("unknown casing '{other}'"))),
        }
    }
}

/// Leaf rendered for data types the type mapper does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTypeFallback {
    Unknown,
    Any,
}

impl FromStr for UnknownTypeFallback {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unknown" => Ok(UnknownTypeFallback::Unknown),
            "any" => Ok(UnknownTypeFallback::Any),
            other => Err(Error::Configuration(format!(
                "unknown type fallback '{other}' (expected unknown or any)"
            ))),
        }
    }
}

/// Every option that influences rendering. Immutable for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Configuration {
    pub dialect_variant: DialectVariant,
    /// Casing of generated property names.
    pub field_name_casing: Casing,
    /// Casing of generated schema, type and enum type names.
    pub object_name_casing: Casing,
    /// Rename properties with `field_name_casing` and emit transform functions.
    pub case_transform_enabled: bool,
    pub singularization_enabled: bool,
    pub coerce_dates_on_read: bool,
    pub stringify_dates_on_write: bool,
    pub stringify_json_on_write: bool,
    pub default_empty_array_on_nullable_array: bool,
    pub default_undefined_on_nullable: bool,
    pub unknown_type_fallback: Option<UnknownTypeFallback>,
    /// Module that exports hand-written JSON sub-schemas for json columns.
    pub json_schema_import_location: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            dialect_variant: DialectVariant::V2,
            field_name_casing: Casing::CamelCase,
            object_name_casing: Casing::PascalCase,
            case_transform_enabled: false,
            singularization_enabled: true,
            coerce_dates_on_read: true,
            stringify_dates_on_write: false,
            stringify_json_on_write: false,
            default_empty_array_on_nullable_array: false,
            default_undefined_on_nullable: false,
            unknown_type_fallback: None,
            json_schema_import_location: None,
        }
    }
}
