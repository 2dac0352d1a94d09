//! Core contracts and helpers for schemaforge.
//!
//! This crate defines the canonical schema model, the generation
//! configuration, the casing engine and the diagnostics capability shared
//! by the normalizer, the renderer and the CLI.

pub mod casing;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod schema;

pub use casing::{
    apply_casing, compose_identifier, singularize, to_camel_case, to_constant_case,
    to_pascal_case, to_snake_case,
};
pub use config::{Casing, Configuration, DialectVariant, UnknownTypeFallback};
pub use diagnostics::{
    Diagnostic, Diagnostics, Level, MemoryDiagnostics, NoopDiagnostics, TracingDiagnostics,
};
pub use error::{Error, Result};
pub use schema::{
    Column, RawColumn, Schema, SemanticType, Table, TableKind, WriteHints, sort_tables,
};

/// Version of the render output contract consumed by the template stage.
pub const RENDER_CONTRACT_VERSION: &str = "0.1";
