use std::time::Instant;

use serde::{Deserialize, Serialize};

use schemaforge_core::{Configuration, Diagnostics, RENDER_CONTRACT_VERSION, Result, Schema};
use schemaforge_introspect::{Collector, NormalizeHooks, NormalizeOptions, normalize};

use crate::builder::build_table_model;
use crate::hooks::RenderHooks;
use crate::model::{RenderOutput, SchemaSummary};

/// Inputs of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub options: NormalizeOptions,
    #[serde(default)]
    pub config: Configuration,
}

/// Optional hooks for both stages of a run.
#[derive(Clone, Copy, Default)]
pub struct PipelineHooks<'a> {
    pub normalize: Option<&'a dyn NormalizeHooks>,
    pub render: Option<&'a dyn RenderHooks>,
}

/// Render every table of an already normalized schema, in schema order.
pub async fn render_schema(
    schema: &Schema,
    config: &Configuration,
    hooks: Option<&dyn RenderHooks>,
    diagnostics: &dyn Diagnostics,
) -> Result<RenderOutput> {
    let mut tables = Vec::with_capacity(schema.tables.len());
    for table in &schema.tables {
        tables.push(build_table_model(table, config, hooks, diagnostics).await?);
    }

    Ok(RenderOutput {
        contract_version: RENDER_CONTRACT_VERSION.to_string(),
        summary: SchemaSummary::from_schema(schema),
        tables,
    })
}

/// Collect, normalize and render one schema.
///
/// Any failure aborts the run; no partial output is returned.
pub async fn generate(
    collector: &dyn Collector,
    request: &GenerateRequest,
    hooks: PipelineHooks<'_>,
    diagnostics: &dyn Diagnostics,
) -> Result<RenderOutput> {
    let started = Instant::now();

    let raw = collector.collect().await?;
    diagnostics.info(
        "columns_collected",
        &format!("{} raw column(s) from {}", raw.len(), collector.source()),
    );

    let schema = normalize(
        raw,
        &request.options,
        &request.config,
        hooks.normalize,
        diagnostics,
    )
    .await?;
    let output = render_schema(&schema, &request.config, hooks.render, diagnostics).await?;

    diagnostics.info(
        "generate_finished",
        &format!(
            "rendered {} table(s) with dialect {} in {} ms",
            output.tables.len(),
            request.config.dialect_variant,
            started.elapsed().as_millis()
        ),
    );
    Ok(output)
}
