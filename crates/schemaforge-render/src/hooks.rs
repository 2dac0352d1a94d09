use async_trait::async_trait;

use schemaforge_core::Result;

use crate::model::{ColumnRenderModel, TableRenderModel};

/// User hooks over render models.
///
/// A column hook may rewrite `read_expression` or `write_expression`
/// directly; any expression it leaves equal to the pre-hook value is
/// rendered again from the column it returns.
#[async_trait]
pub trait RenderHooks: Send + Sync {
    async fn on_column_model_created(
        &self,
        table: &str,
        model: ColumnRenderModel,
    ) -> Result<ColumnRenderModel> {
        let _ = table;
        Ok(model)
    }

    /// Runs once per table, after every column model is final.
    async fn on_table_model_created(&self, model: TableRenderModel) -> Result<TableRenderModel> {
        Ok(model)
    }
}
