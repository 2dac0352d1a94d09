use schemaforge_core::{Configuration, RawColumn, Schema, TableKind};
use schemars::schema_for;

#[test]
fn serializes_empty_schema_deterministically() {
    let schema = Schema::new("public", Vec::new());

    let json = serde_json::to_string_pretty(&schema).expect("serialize schema");
    let expected = r#"{
  "name": "public",
  "tables": []
}"#;
    assert_eq!(json, expected);
}

#[test]
fn raw_columns_fill_optional_fields_with_defaults() {
    let raw: RawColumn = serde_json::from_str(
        r#"{
            "table": "active_users",
            "name": "email",
            "data_type": "citext",
            "is_nullable": true,
            "table_kind": "VIEW"
        }"#,
    )
    .expect("parse raw column");

    assert_eq!(raw.table_kind, TableKind::View);
    assert!(raw.check_constraints.is_empty());
    assert!(!raw.is_identity);
    assert_eq!(raw.default_value, None);

    let encoded = serde_json::to_value(&raw).expect("serialize raw column");
    assert_eq!(encoded["table_kind"], "view");
}

#[test]
fn configuration_json_schema_lists_every_option() {
    let generated = schema_for!(Configuration);
    let value = serde_json::to_value(&generated).expect("serialize json schema");
    let properties = value["properties"]
        .as_object()
        .expect("configuration schema has properties");

    for key in [
        "dialect_variant",
        "field_name_casing",
        "object_name_casing",
        "case_transform_enabled",
        "singularization_enabled",
        "coerce_dates_on_read",
        "stringify_dates_on_write",
        "stringify_json_on_write",
        "default_empty_array_on_nullable_array",
        "default_undefined_on_nullable",
        "unknown_type_fallback",
        "json_schema_import_location",
    ] {
        assert!(properties.contains_key(key), "missing {key}");
    }
}
