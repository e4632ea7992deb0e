use crate::error::{MatrixError, Result};
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the list_products tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListProductsParams {}

/// Tool for listing the product support tables of the page
#[derive(Default)]
pub struct ListProductsTool;

impl Tool for ListProductsTool {
    type Params = ListProductsParams;

    fn name(&self) -> &str {
        "list_products"
    }

    fn description(&self) -> &str {
        "List the product support tables found on the page"
    }

    fn execute_typed(&self, _params: ListProductsParams, context: &mut ToolContext) -> Result<ToolResult> {
        let products = context.products();
        if products.is_empty() {
            log::warn!("No product tables on the page");
            return Ok(ToolResult::failure(MatrixError::NoProductTables.to_string()));
        }
        log::info!("Found {} product tables", products.len());

        Ok(ToolResult::success_with(serde_json::json!({
            "products": products,
            "count": products.len(),
        })))
    }
}
