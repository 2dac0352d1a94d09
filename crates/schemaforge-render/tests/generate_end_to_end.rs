use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use schemaforge_core::{
    Configuration, DialectVariant, Error, MemoryDiagnostics, NoopDiagnostics, Result,
};
use schemaforge_introspect::{StaticCollector, parse_raw_columns};
use schemaforge_render::{
    ColumnRenderModel, GenerateRequest, PipelineHooks, RenderHooks, RenderOutput,
    TableRenderModel, generate,
};

const EXPORT: &str = r#"[
  {"table": "users", "name": "id", "data_type": "uuid", "is_nullable": false,
   "default_value": "gen_random_uuid()"},
  {"table": "users", "name": "status", "data_type": "text", "is_nullable": false,
   "check_constraints": ["CHECK ((status = ANY (ARRAY['active'::text, 'banned'::text])))"]},
  {"table": "users", "name": "display_name", "data_type": "character varying(80)",
   "is_nullable": true, "max_length": 80, "description": "@trim"},
  {"table": "users", "name": "email", "data_type": "email", "is_nullable": false},
  {"table": "users", "name": "login_count", "data_type": "int4", "is_nullable": false,
   "default_value": "0"},
  {"table": "active_users", "name": "user_id", "data_type": "uuid", "is_nullable": true,
   "table_kind": "VIEW"}
]"#;

fn collector() -> StaticCollector {
    StaticCollector::new(parse_raw_columns(EXPORT).expect("parse export"))
}

fn request(config: Configuration) -> GenerateRequest {
    GenerateRequest {
        config,
        ..GenerateRequest::default()
    }
}

async fn run(config: Configuration) -> RenderOutput {
    generate(&collector(), &request(config), PipelineHooks::default(), &NoopDiagnostics)
        .await
        .expect("generate")
}

#[tokio::test]
async fn users_status_becomes_a_named_enum() {
    let output = run(Configuration::default()).await;
    let users = output.table("users").expect("users");

    let status = &users.columns[1];
    assert_eq!(status.enum_name.as_deref(), Some("USER_STATUS"));
    assert_eq!(status.read_expression, "z.enum(USER_STATUS)");
    assert_eq!(status.write_expression, "z.enum(USER_STATUS)");
    assert_eq!(users.enums.len(), 1);
    assert_eq!(users.enums[0].values, vec!["active", "banned"]);
    assert_eq!(users.identifiers.read_schema, "TableUserSchema");
}

#[tokio::test]
async fn summary_groups_tables_by_kind() {
    let output = run(Configuration::default()).await;
    assert_eq!(output.summary.name, "public");
    assert_eq!(output.summary.tables["table"], vec!["users"]);
    assert_eq!(output.summary.tables["view"], vec!["active_users"]);
    assert_eq!(output.summary.table_count(), 2);

    let names: Vec<&str> = output.tables.iter().map(|table| table.name.as_str()).collect();
    assert_eq!(names, vec!["users", "active_users"]);

    let view = output.table("active_users").expect("view");
    assert!(view.write_columns.is_empty());
    assert_eq!(view.identifiers.insert_schema, None);
}

#[tokio::test]
async fn each_dialect_renders_its_own_syntax() {
    let expected = [
        (
            DialectVariant::V1,
            "z.string().trim().max(80).nullable().optional()",
            "z.number().int().optional()",
        ),
        (
            DialectVariant::V2,
            "z.string().trim().max(80).nullable().optional()",
            "z.int().optional()",
        ),
        (
            DialectVariant::V2Lite,
            "z.optional(z.nullable(z.string().check(z.trim(), z.maxLength(80))))",
            "z.optional(z.int())",
        ),
    ];

    for (variant, display_name, login_count) in expected {
        let output = run(Configuration {
            dialect_variant: variant,
            ..Configuration::default()
        })
        .await;
        let users = output.table("users").expect("users");
        assert_eq!(users.columns[2].write_expression, display_name, "{variant}");
        assert_eq!(users.columns[4].write_expression, login_count, "{variant}");
        assert_eq!(users.columns[3].read_expression, "z.string()", "{variant}");
    }
}

#[tokio::test]
async fn case_transform_only_touches_names() {
    let plain = run(Configuration::default()).await;
    let transformed = run(Configuration {
        case_transform_enabled: true,
        ..Configuration::default()
    })
    .await;

    let plain_users = plain.table("users").expect("users");
    let transformed_users = transformed.table("users").expect("users");

    assert_eq!(plain_users.identifiers.transform_base, None);
    assert_eq!(plain_users.identifiers.transform_insert, None);
    assert_eq!(plain_users.columns[2].property_name, "display_name");
    assert_eq!(
        transformed_users.identifiers.transform_base.as_deref(),
        Some("transformTableUserBaseRecord")
    );
    assert_eq!(transformed_users.columns[2].property_name, "displayName");

    for (left, right) in plain_users.columns.iter().zip(&transformed_users.columns) {
        assert_eq!(left.read_expression, right.read_expression);
        assert_eq!(left.write_expression, right.write_expression);
    }
}

#[derive(Default)]
struct RewritingHooks {
    tables: AtomicUsize,
}

#[async_trait]
impl RenderHooks for RewritingHooks {
    async fn on_column_model_created(
        &self,
        _table: &str,
        mut model: ColumnRenderModel,
    ) -> Result<ColumnRenderModel> {
        if model.column.name == "display_name" {
            // Change the column; leave both expressions for the builder.
            model.column.is_nullable = false;
            model.column.sync_optionality();
        }
        if model.column.name == "email" {
            model.write_expression = "z.email().endsWith(\"@example.com\")".to_string();
            model.column.is_nullable = true;
            model.column.sync_optionality();
        }
        Ok(model)
    }

    async fn on_table_model_created(&self, model: TableRenderModel) -> Result<TableRenderModel> {
        self.tables.fetch_add(1, Ordering::SeqCst);
        Ok(model)
    }
}

#[tokio::test]
async fn hooks_keep_overrides_and_rerender_the_rest() {
    let hooks = RewritingHooks::default();
    let output = generate(
        &collector(),
        &request(Configuration::default()),
        PipelineHooks {
            normalize: None,
            render: Some(&hooks),
        },
        &NoopDiagnostics,
    )
    .await
    .expect("generate");

    let users = output.table("users").expect("users");
    assert_eq!(users.columns[2].write_expression, "z.string().trim().max(80)");
    assert_eq!(users.columns[2].read_expression, "z.string()");

    assert_eq!(
        users.columns[3].write_expression,
        "z.email().endsWith(\"@example.com\")"
    );
    assert_eq!(users.columns[3].read_expression, "z.string().nullable().optional()");
    assert_eq!(hooks.tables.load(Ordering::SeqCst), 2);
}

struct FailingHooks;

#[async_trait]
impl RenderHooks for FailingHooks {
    async fn on_table_model_created(&self, model: TableRenderModel) -> Result<TableRenderModel> {
        Err(Error::hook(model.name, "template rejected table"))
    }
}

#[tokio::test]
async fn hook_failure_aborts_the_run() {
    let diagnostics = MemoryDiagnostics::new();
    let err = generate(
        &collector(),
        &request(Configuration::default()),
        PipelineHooks {
            normalize: None,
            render: Some(&FailingHooks),
        },
        &diagnostics,
    )
    .await
    .expect_err("hook failure");

    assert!(matches!(err, Error::Hook { ref entity, .. } if entity == "users"));
    assert!(diagnostics.events("generate_finished").is_empty());
}

#[tokio::test]
async fn render_output_serializes_for_templates() {
    let output = run(Configuration::default()).await;
    let json = serde_json::to_value(&output).expect("serialize");

    assert_eq!(json["contract_version"], "0.1");
    assert_eq!(json["tables"][0]["kind"], "table");
    assert_eq!(json["tables"][0]["columns"][1]["enum_name"], "USER_STATUS");
}
