mod registry;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use schemaforge_core::{
    Casing, Configuration, DialectVariant, Error as CoreError, RENDER_CONTRACT_VERSION,
    TracingDiagnostics, UnknownTypeFallback,
};
use schemaforge_introspect::{Collector, JsonFileCollector, TableFilter};
use schemaforge_render::{PipelineHooks, generate};
use registry::{RunContext, init_run_logging, start_run, write_json, write_render};
use settings::{Overrides, SettingsError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "schemaforge", version, about = "Schema to validator render models")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a raw column export and write render models.
    Generate(GenerateArgs),
    /// Print the JSON Schema of the generator configuration.
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// JSON array of raw columns exported by a collector.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// TOML settings file with [generator] and [filters] tables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    /// Optional extra output path for render.json.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Schema name assigned to every table.
    #[arg(long, value_name = "SCHEMA")]
    schema: Option<String>,
    /// Regular expression selecting tables to keep.
    #[arg(long, value_name = "REGEX", conflicts_with = "include_table")]
    include: Option<String>,
    /// Exact table name to keep (repeatable).
    #[arg(long, value_name = "TABLE")]
    include_table: Vec<String>,
    /// Regular expression selecting tables to drop.
    #[arg(long, value_name = "REGEX", conflicts_with = "exclude_table")]
    exclude: Option<String>,
    /// Exact table name to drop (repeatable).
    #[arg(long, value_name = "TABLE")]
    exclude_table: Vec<String>,
    /// Output dialect: v1, v2 or v2-lite.
    #[arg(long)]
    dialect: Option<DialectVariant>,
    /// Property name casing (camel_case, snake_case, pascal_case, passthrough).
    #[arg(long)]
    field_casing: Option<Casing>,
    /// Schema and type name casing.
    #[arg(long)]
    object_casing: Option<Casing>,
    #[arg(long, value_name = "BOOL")]
    case_transform: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    singularize: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    coerce_dates_on_read: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    stringify_dates: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    stringify_json: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    default_empty_array: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    default_undefined: Option<bool>,
    /// Leaf for unrecognized types: unknown or any.
    #[arg(long)]
    unknown_type_fallback: Option<UnknownTypeFallback>,
    /// Module exporting hand-written schemas for json columns.
    #[arg(long, value_name = "MODULE")]
    json_schema_import: Option<String>,
}

impl GenerateArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            dialect_variant: self.dialect,
            field_name_casing: self.field_casing,
            object_name_casing: self.object_casing,
            case_transform_enabled: self.case_transform,
            singularization_enabled: self.singularize,
            coerce_dates_on_read: self.coerce_dates_on_read,
            stringify_dates_on_write: self.stringify_dates,
            stringify_json_on_write: self.stringify_json,
            default_empty_array_on_nullable_array: self.default_empty_array,
            default_undefined_on_nullable: self.default_undefined,
            unknown_type_fallback: self.unknown_type_fallback,
            json_schema_import_location: self.json_schema_import.clone(),
            schema_name: self.schema.clone(),
            include: table_filter(self.include.as_ref(), &self.include_table),
            exclude: table_filter(self.exclude.as_ref(), &self.exclude_table),
        }
    }
}

fn table_filter(pattern: Option<&String>, names: &[String]) -> Option<TableFilter> {
    match pattern {
        Some(pattern) => Some(TableFilter::Pattern(pattern.clone())),
        None if !names.is_empty() => Some(TableFilter::Names(names.to_vec())),
        None => None,
    }
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Write the schema to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args).await,
        Command::Schema(args) => run_schema(args),
    }
}

async fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let request = settings::resolve(args.config.as_deref(), std::env::vars(), args.overrides())?;

    let collector = JsonFileCollector::new(&args.input);
    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        source: collector.path().display().to_string(),
        contract_version: RENDER_CONTRACT_VERSION.to_string(),
        run_dir: args.run_dir,
        out: args.out,
        request,
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        source = collector.source(),
        input = %run_ctx.source,
        dialect = %run_ctx.request.config.dialect_variant,
        run_path = %run_paths.root.display()
    );

    let timer = Instant::now();

    let output = match generate(
        &collector,
        &run_ctx.request,
        PipelineHooks::default(),
        &TracingDiagnostics,
    )
    .await
    {
        Ok(output) => output,
        Err(err) => {
            tracing::error!(event = "run_failed", error = %err);
            return Err(err.into());
        }
    };

    write_render(&run_paths, &output, run_ctx.out.as_deref())?;
    tracing::info!(event = "render_written", path = %run_paths.render_path.display());

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(
        event = "run_finished",
        status = "success",
        tables = output.tables.len(),
        duration_ms = duration_ms
    );

    Ok(())
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let schema = schemars::schema_for!(Configuration);
    match args.out {
        Some(path) => write_json(&path, &schema)?,
        None => println!("{}", serde_json::to_string_pretty(&schema)?),
    }
    Ok(())
}
