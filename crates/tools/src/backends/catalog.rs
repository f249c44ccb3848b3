use crate::catalog::ToolCatalog;
use crate::error::BackendError;
use crate::traits::ToolBackend;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub const LIST_TOOLS: &str = "internal_list_tools";

/// Answers tool discovery from the catalog itself.
pub struct CatalogBackend {
    catalog: Arc<ToolCatalog>,
}

impl CatalogBackend {
    pub fn new(catalog: Arc<ToolCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ToolBackend for CatalogBackend {
    async fn call(&self, operation: &str, _arguments: &Value) -> Result<Value, BackendError> {
        match operation {
            LIST_TOOLS => Ok(self.catalog.summary()),
            other => Err(BackendError::UnsupportedOperation(other.to_string())),
        }
    }

    fn name(&self) -> &str {
        "catalog"
    }
}
