use async_trait::async_trait;

use schemaforge_core::{RawColumn, Result};

/// Trait implemented by source collectors that read column metadata.
///
/// Issuing the actual metadata queries is the collector's business; the
/// normalizer only sees the ordered rows it returns.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Returns the source identifier (e.g. `postgres`, `json`).
    fn source(&self) -> &str;

    /// Read every raw column, in source order.
    async fn collect(&self) -> Result<Vec<RawColumn>>;
}
