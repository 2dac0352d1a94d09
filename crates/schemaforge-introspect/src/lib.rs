//! Source collection and normalization.
//!
//! Collectors produce [`RawColumn`](schemaforge_core::RawColumn) rows; the
//! normalizer maps types, extracts enumerations from CHECK clauses, infers
//! optionality and groups the rows into a sorted schema.

pub mod adapter;
pub mod collectors;
pub mod constraints;
pub mod hooks;
pub mod mapper;
pub mod normalize;
pub mod options;
pub mod types;

pub use adapter::Collector;
pub use collectors::{JsonFileCollector, StaticCollector, parse_raw_columns};
pub use constraints::{Grammar, extract_enum, matching_grammars, normalize_identifier};
pub use hooks::NormalizeHooks;
pub use mapper::{Annotations, build_column, parse_annotations};
pub use normalize::{filter_columns, group_into_tables, normalize};
pub use options::{CompiledFilter, NormalizeOptions, TableFilter};
pub use types::{MappedType, map_data_type};
