//! Render models for generated validator modules.
//!
//! The renderer turns one normalized column into read and write validator
//! expressions for a [`DialectVariant`](schemaforge_core::DialectVariant);
//! the builder assembles per-table models with their identifiers, and the
//! pipeline runs collect, normalize and render end to end.

pub mod builder;
pub mod dialect;
pub mod hooks;
pub mod model;
pub mod naming;
pub mod pipeline;
pub mod renderer;

pub use builder::{build_column_model, build_table_model};
pub use dialect::{Check, ChainedV1, ChainedV2, ComposedV2Lite, Dialect, dialect};
pub use hooks::RenderHooks;
pub use model::{
    ColumnRenderModel, EnumDefinition, JsonSchemaImport, RenderOutput, SchemaSummary,
    TableRenderModel,
};
pub use naming::{
    TableIdentifiers, column_identifiers, entity_name, enum_constant_name, enum_type_name,
    json_schema_name, kind_token, property_name, table_identifiers,
};
pub use pipeline::{GenerateRequest, PipelineHooks, generate, render_schema};
pub use renderer::{ColumnIdentifiers, RenderMode, render};
