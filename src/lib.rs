//! # support-matrix
//!
//! Turns the product support tables of a documentation page into structured,
//! searchable per-OS support records.
//!
//! ## Features
//!
//! - **DOM Snapshots**: Parse static HTML, reload exported JSON snapshots, or
//!   extract a live page through Chrome DevTools Protocol (CDP)
//! - **Table Locator**: Find tables whose rows carry a "Product version" label
//! - **Table Interpreter**: Detect whether operating systems sit in the header
//!   or in the rows, and read support markers, versions and architectures
//! - **View Model**: Search, filter and summarize the resulting records
//! - **Tool System**: `list_products` and `view_product` as JSON-in/JSON-out tools
//!
//! ## Command Line
//!
//! ```bash
//! # List the product tables of a saved page
//! support-matrix --file matrix.html
//!
//! # Show one product, filtered
//! support-matrix --file matrix.html --product "Elastic Agent" --arch aarch64
//!
//! # Render a live page with headless Chrome
//! support-matrix --url https://www.elastic.co/support/matrix --product Beats --format json
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use support_matrix::{DomTree, Filters, MatrixView, matrix};
//!
//! # fn main() -> support_matrix::Result<()> {
//! let html = std::fs::read_to_string("matrix.html")?;
//! let tree = DomTree::from_html(&html);
//!
//! for product in matrix::require_product_tables(&tree)? {
//!     println!("{} (table {})", product.name, product.table_index);
//! }
//!
//! let interpretation = matrix::scrape_product(&tree, "Elastic Agent")?;
//! let mut view = MatrixView::new("Elastic Agent", interpretation.records);
//! view.apply(Filters::new().search("ubuntu"));
//! println!("{}", view.render_text(false));
//! # Ok(())
//! # }
//! ```
//!
//! ### Using the Tool System
//!
//! ```rust,no_run
//! use support_matrix::{DomTree, ToolContext, ToolRegistry};
//!
//! # fn main() -> support_matrix::Result<()> {
//! let tree = DomTree::from_html("<table>...</table>");
//! let registry = ToolRegistry::with_defaults();
//! let mut context = ToolContext::new(&tree);
//!
//! let result = registry.execute(
//!     "view_product",
//!     serde_json::json!({ "product": "Beats", "filters": { "status": "supported" } }),
//!     &mut context,
//! )?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod dom;
pub mod error;
pub mod matrix;
pub mod tools;
pub mod view;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use dom::{DomTree, ElementNode};
pub use error::{MatrixError, Result};
pub use matrix::{Interpretation, Orientation, ProductTable, Status, SupportRecord};
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult};
pub use view::{Filters, MatrixView};
