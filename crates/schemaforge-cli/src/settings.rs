//! Layered generation settings: defaults < TOML file < `SCHEMAFORGE_*`
//! environment < command-line flags.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use schemaforge_core::{Casing, Configuration, DialectVariant, UnknownTypeFallback};
use schemaforge_introspect::TableFilter;
use schemaforge_render::GenerateRequest;

pub const ENV_PREFIX: &str = "SCHEMAFORGE_";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// Settings file layout.
///
/// ```toml
/// [generator]
/// dialect_variant = "v2-lite"
/// case_transform_enabled = true
///
/// [filters]
/// schema_name = "app"
/// exclude = ["schema_migrations"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub generator: Configuration,
    pub filters: FilterSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub schema_name: Option<String>,
    pub include: Option<TableFilter>,
    pub exclude: Option<TableFilter>,
}

impl FileSettings {
    pub fn into_request(self) -> GenerateRequest {
        let mut request = GenerateRequest {
            config: self.generator,
            ..GenerateRequest::default()
        };
        if let Some(schema_name) = self.filters.schema_name {
            request.options.schema_name = schema_name;
        }
        request.options.include = self.filters.include;
        request.options.exclude = self.filters.exclude;
        request
    }
}

pub fn parse_file_settings(content: &str) -> SettingsResult<FileSettings> {
    toml::from_str(content).map_err(SettingsError::from)
}

pub fn load_file_settings(path: &Path) -> SettingsResult<FileSettings> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_file_settings(&content)
}

/// Values set explicitly by one layer; `None` keeps the lower layer's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub dialect_variant: Option<DialectVariant>,
    pub field_name_casing: Option<Casing>,
    pub object_name_casing: Option<Casing>,
    pub case_transform_enabled: Option<bool>,
    pub singularization_enabled: Option<bool>,
    pub coerce_dates_on_read: Option<bool>,
    pub stringify_dates_on_write: Option<bool>,
    pub stringify_json_on_write: Option<bool>,
    pub default_empty_array_on_nullable_array: Option<bool>,
    pub default_undefined_on_nullable: Option<bool>,
    pub unknown_type_fallback: Option<UnknownTypeFallback>,
    pub json_schema_import_location: Option<String>,
    pub schema_name: Option<String>,
    pub include: Option<TableFilter>,
    pub exclude: Option<TableFilter>,
}

impl Overrides {
    /// Read `SCHEMAFORGE_*` variables; names are the option names upper-cased.
    ///
    /// `SCHEMAFORGE_INCLUDE`/`SCHEMAFORGE_EXCLUDE` hold a pattern,
    /// `SCHEMAFORGE_INCLUDE_TABLES`/`SCHEMAFORGE_EXCLUDE_TABLES` a comma
    /// separated list of table names. Unknown variables are ignored.
    pub fn from_env<I, K, V>(vars: I) -> SettingsResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut overrides = Overrides::default();
        for (key, value) in vars {
            let key = key.as_ref();
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref().trim();
            match name {
                "DIALECT_VARIANT" => overrides.dialect_variant = Some(parse_value(key, value)?),
                "FIELD_NAME_CASING" => overrides.field_name_casing = Some(parse_value(key, value)?),
                "OBJECT_NAME_CASING" => {
                    overrides.object_name_casing = Some(parse_value(key, value)?)
                }
                "CASE_TRANSFORM_ENABLED" => {
                    overrides.case_transform_enabled = Some(parse_bool(key, value)?)
                }
                "SINGULARIZATION_ENABLED" => {
                    overrides.singularization_enabled = Some(parse_bool(key, value)?)
                }
                "COERCE_DATES_ON_READ" => {
                    overrides.coerce_dates_on_read = Some(parse_bool(key, value)?)
                }
                "STRINGIFY_DATES_ON_WRITE" => {
                    overrides.stringify_dates_on_write = Some(parse_bool(key, value)?)
                }
                "STRINGIFY_JSON_ON_WRITE" => {
                    overrides.stringify_json_on_write = Some(parse_bool(key, value)?)
                }
                "DEFAULT_EMPTY_ARRAY_ON_NULLABLE_ARRAY" => {
                    overrides.default_empty_array_on_nullable_array = Some(parse_bool(key, value)?)
                }
                "DEFAULT_UNDEFINED_ON_NULLABLE" => {
                    overrides.default_undefined_on_nullable = Some(parse_bool(key, value)?)
                }
                "UNKNOWN_TYPE_FALLBACK" => {
                    overrides.unknown_type_fallback = Some(parse_value(key, value)?)
                }
                "JSON_SCHEMA_IMPORT_LOCATION" => {
                    overrides.json_schema_import_location = Some(value.to_string())
                }
                "SCHEMA_NAME" => overrides.schema_name = Some(value.to_string()),
                "INCLUDE" => overrides.include = Some(TableFilter::Pattern(value.to_string())),
                "EXCLUDE" => overrides.exclude = Some(TableFilter::Pattern(value.to_string())),
                "INCLUDE_TABLES" => overrides.include = Some(TableFilter::Names(split_names(value))),
                "EXCLUDE_TABLES" => overrides.exclude = Some(TableFilter::Names(split_names(value))),
                _ => {}
            }
        }
        Ok(overrides)
    }

    pub fn apply(self, request: &mut GenerateRequest) {
        let config = &mut request.config;
        set(&mut config.dialect_variant, self.dialect_variant);
        set(&mut config.field_name_casing, self.field_name_casing);
        set(&mut config.object_name_casing, self.object_name_casing);
        set(&mut config.case_transform_enabled, self.case_transform_enabled);
        set(&mut config.singularization_enabled, self.singularization_enabled);
        set(&mut config.coerce_dates_on_read, self.coerce_dates_on_read);
        set(&mut config.stringify_dates_on_write, self.stringify_dates_on_write);
        set(&mut config.stringify_json_on_write, self.stringify_json_on_write);
        set(
            &mut config.default_empty_array_on_nullable_array,
            self.default_empty_array_on_nullable_array,
        );
        set(&mut config.default_undefined_on_nullable, self.default_undefined_on_nullable);
        if self.unknown_type_fallback.is_some() {
            config.unknown_type_fallback = self.unknown_type_fallback;
        }
        if self.json_schema_import_location.is_some() {
            config.json_schema_import_location = self.json_schema_import_location;
        }

        let options = &mut request.options;
        set(&mut options.schema_name, self.schema_name);
        if self.include.is_some() {
            options.include = self.include;
        }
        if self.exclude.is_some() {
            options.exclude = self.exclude;
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn parse_value<T>(key: &str, value: &str) -> SettingsResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|err: T::Err| SettingsError::InvalidValue {
        key: key.to_string(),
        message: err.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> SettingsResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}

fn split_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve the effective request for one run.
pub fn resolve<I, K, V>(
    config_path: Option<&Path>,
    env: I,
    flags: Overrides,
) -> SettingsResult<GenerateRequest>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut request = match config_path {
        Some(path) => load_file_settings(path)?.into_request(),
        None => GenerateRequest::default(),
    };
    Overrides::from_env(env)?.apply(&mut request);
    flags.apply(&mut request);
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = r#"
[generator]
dialect_variant = "v1"
case_transform_enabled = true
field_name_casing = "snake_case"

[filters]
schema_name = "app"
exclude = ["schema_migrations"]
"#;

    #[test]
    fn file_layer_keeps_unset_defaults() {
        let request = parse_file_settings(FILE).expect("parse").into_request();

        assert_eq!(request.config.dialect_variant, DialectVariant::V1);
        assert!(request.config.case_transform_enabled);
        assert_eq!(request.config.field_name_casing, Casing::SnakeCase);
        assert_eq!(request.config.object_name_casing, Casing::PascalCase);
        assert!(request.config.singularization_enabled);
        assert_eq!(request.options.schema_name, "app");
        assert_eq!(
            request.options.exclude,
            Some(TableFilter::Names(vec!["schema_migrations".to_string()]))
        );
    }

    #[test]
    fn env_overrides_file_and_flags_override_env() {
        let mut request = parse_file_settings(FILE).expect("parse").into_request();
        let env = [
            ("SCHEMAFORGE_DIALECT_VARIANT", "v2-lite"),
            ("SCHEMAFORGE_CASE_TRANSFORM_ENABLED", "false"),
            ("SCHEMAFORGE_INCLUDE", "^app_"),
            ("PATH", "/usr/bin"),
        ];
        Overrides::from_env(env).expect("env").apply(&mut request);

        assert_eq!(request.config.dialect_variant, DialectVariant::V2Lite);
        assert!(!request.config.case_transform_enabled);
        assert_eq!(request.options.include, Some(TableFilter::Pattern("^app_".to_string())));

        let flags = Overrides {
            dialect_variant: Some(DialectVariant::V2),
            schema_name: Some("public".to_string()),
            ..Overrides::default()
        };
        flags.apply(&mut request);
        assert_eq!(request.config.dialect_variant, DialectVariant::V2);
        assert_eq!(request.options.schema_name, "public");
        assert!(!request.config.case_transform_enabled);
    }

    #[test]
    fn table_lists_come_from_comma_separated_env() {
        let overrides =
            Overrides::from_env([("SCHEMAFORGE_EXCLUDE_TABLES", "audit_log, ,sessions")])
                .expect("env");
        assert_eq!(
            overrides.exclude,
            Some(TableFilter::Names(vec!["audit_log".to_string(), "sessions".to_string()]))
        );
    }

    #[test]
    fn invalid_env_values_are_rejected() {
        let err = Overrides::from_env([("SCHEMAFORGE_STRINGIFY_JSON_ON_WRITE", "maybe")])
            .expect_err("invalid bool");
        assert!(matches!(err, SettingsError::InvalidValue { ref key, .. } if key == "SCHEMAFORGE_STRINGIFY_JSON_ON_WRITE"));

        let err = Overrides::from_env([("SCHEMAFORGE_DIALECT_VARIANT", "v3")])
            .expect_err("invalid dialect");
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
    }

    #[test]
    fn resolve_without_file_uses_defaults() {
        let request = resolve(None, Vec::<(String, String)>::new(), Overrides::default())
            .expect("resolve");
        assert_eq!(request, GenerateRequest::default());
    }
}
