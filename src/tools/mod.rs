//! Tool system
//!
//! The user actions on a loaded page are exposed as named tools taking and
//! returning JSON, so the CLI (or any other front end) can drive them the
//! same way:
//!
//! - `list_products`: product tables found on the page
//! - `view_product`: support records of one product, filtered

pub mod list_products;
pub mod utils;
pub mod view_product;

pub use list_products::{ListProductsParams, ListProductsTool};
pub use view_product::{ViewProductParams, ViewProductTool};

use crate::dom::DomTree;
use crate::error::{MatrixError, Result};
use crate::matrix::locator::{self, ProductTable};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page state shared by the tools of one invocation
pub struct ToolContext<'a> {
    /// DOM snapshot of the page
    pub dom: &'a DomTree,

    products: Option<Vec<ProductTable>>,
}

impl<'a> ToolContext<'a> {
    pub fn new(dom: &'a DomTree) -> Self {
        Self { dom, products: None }
    }

    /// Product tables of the page, located on first use
    pub fn products(&mut self) -> &[ProductTable] {
        let dom = self.dom;
        self.products.get_or_insert_with(|| locator::find_product_tables(dom))
    }
}

/// Outcome of a tool execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success_with(data: Value) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    /// A result carrying a message meant for the user
    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }
}

/// A named operation over the loaded page
pub trait Tool: Send + Sync {
    type Params: DeserializeOwned + JsonSchema;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult>;

    /// JSON schema of [`Tool::Params`]
    fn parameters_schema(&self) -> Value {
        serde_json::to_value(schemars::schema_for!(Self::Params)).unwrap_or_default()
    }
}

/// Object-safe view of a [`Tool`], taking untyped JSON parameters
pub trait DynTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult>;
}

impl<T: Tool> DynTool for T {
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn description(&self) -> &str {
        Tool::description(self)
    }

    fn parameters_schema(&self) -> Value {
        Tool::parameters_schema(self)
    }

    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let params = if params.is_null() { Value::Object(Default::default()) } else { params };
        let typed: T::Params = serde_json::from_value(params).map_err(|e| MatrixError::InvalidParams {
            tool: Tool::name(self).to_string(),
            reason: e.to_string(),
        })?;
        self.execute_typed(typed, context)
    }
}

/// Tools by name, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn DynTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in tool
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ListProductsTool);
        registry.register(ViewProductTool);
        registry
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = Tool::name(&tool).to_string();
        self.tools.insert(name, Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn DynTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Run a tool by name
    pub fn execute(&self, name: &str, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let tool = self.get(name).ok_or_else(|| MatrixError::ToolNotFound(name.to_string()))?;
        log::debug!("Executing tool '{}' with {}", name, params);
        tool.execute(params, context)
    }
}
