use async_trait::async_trait;

use schemaforge_core::{Column, Result, Table};

/// User hooks invoked while the normalizer builds the schema.
///
/// Each hook runs exactly once per entity and is awaited before the
/// normalizer proceeds. Returned entities are taken as-is; an error aborts
/// the run and is propagated unmodified.
#[async_trait]
pub trait NormalizeHooks: Send + Sync {
    /// Called once per column, right after it was grouped into `table`.
    async fn on_column_created(&self, table: &str, column: Column) -> Result<Column> {
        let _ = table;
        Ok(column)
    }

    /// Called once per table, after all of its column hooks ran.
    async fn on_table_created(&self, table: Table) -> Result<Table> {
        Ok(table)
    }
}
