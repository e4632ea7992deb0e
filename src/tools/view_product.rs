use crate::error::{MatrixError, Result};
use crate::matrix::interpreter;
use crate::matrix::locator::{self, ProductTable};
use crate::tools::{Tool, ToolContext, ToolResult};
use crate::view::{Filters, MatrixView};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the view_product tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ViewProductParams {
    /// Product name as listed by list_products (case-insensitive)
    #[serde(default)]
    pub product: Option<String>,

    /// Index of the table among all tables of the page
    #[serde(default)]
    pub table_index: Option<usize>,

    /// Filters applied to the records
    #[serde(default)]
    pub filters: Filters,
}

/// Tool for interpreting one product table into support records
#[derive(Default)]
pub struct ViewProductTool;

impl ViewProductTool {
    fn resolve(&self, params: &ViewProductParams, context: &mut ToolContext) -> Result<ProductTable> {
        if let Some(name) = &params.product {
            return locator::resolve_product(context.products(), name);
        }

        if let Some(index) = params.table_index {
            // any table may be viewed, product or not
            let located = context.products().iter().find(|p| p.table_index == index).cloned();
            return Ok(located.unwrap_or_else(|| ProductTable {
                name: format!("Table {}", index),
                table_index: index,
            }));
        }

        Err(MatrixError::InvalidParams {
            tool: "view_product".to_string(),
            reason: "either 'product' or 'table_index' is required".to_string(),
        })
    }
}

impl Tool for ViewProductTool {
    type Params = ViewProductParams;

    fn name(&self) -> &str {
        "view_product"
    }

    fn description(&self) -> &str {
        "Interpret a product support table into per-OS support records"
    }

    fn execute_typed(&self, params: ViewProductParams, context: &mut ToolContext) -> Result<ToolResult> {
        let product = match self.resolve(&params, context) {
            Ok(product) => product,
            Err(e @ MatrixError::NoProductTables) => return Ok(ToolResult::failure(e.to_string())),
            Err(e) => return Err(e),
        };

        let interpretation = match interpreter::interpret_product(context.dom, &product) {
            Ok(interpretation) => interpretation,
            Err(e @ MatrixError::NoSupportData { .. }) => {
                log::warn!("{}", e);
                return Ok(ToolResult::failure(e.to_string()));
            }
            Err(e) => return Err(e),
        };

        let mut view = MatrixView::new(product.name.clone(), interpretation.records.clone());
        view.apply(params.filters);

        Ok(ToolResult::success_with(serde_json::json!({
            "product": product,
            "orientation": interpretation.orientation,
            "path": interpretation.path,
            "records": interpretation.records,
            "diagnostics": interpretation.diagnostics,
            "view": view.to_json(),
        })))
    }
}
