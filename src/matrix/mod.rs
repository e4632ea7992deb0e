//! Support matrix interpretation
//!
//! This module turns located product tables into per-OS [`SupportRecord`]s:
//!
//! - **locator**: finds product tables and their names
//! - **cell**: decides whether a single cell indicates support
//! - **extract**: version, architecture, status and notes heuristics
//! - **interpreter**: classifies table orientation and runs the matching extraction

pub mod cell;
pub mod extract;
pub mod interpreter;
pub mod locator;
pub mod record;

pub use cell::{CellVerdict, SupportRule, classify, is_supported, is_unsupported};
pub use interpreter::{
    Diagnostics, ExtractionPath, Interpretation, Orientation, classify_orientation, interpret,
    interpret_product,
};
pub use locator::{
    ProductTable, find_product_table, find_product_tables, product_names, require_product_tables,
    resolve_product,
};
pub use record::{Status, SupportRecord};

use crate::dom::DomTree;
use crate::error::Result;

/// Locate a product table by name and interpret it
pub fn scrape_product(tree: &DomTree, name: &str) -> Result<Interpretation> {
    let product = find_product_table(tree, name)?;
    interpret_product(tree, &product)
}

/// Interpret every product table of a page.
///
/// Tables that yield no records are logged and left out.
pub fn scrape_all(tree: &DomTree) -> Result<Vec<(ProductTable, Interpretation)>> {
    let products = require_product_tables(tree)?;
    let mut results = Vec::with_capacity(products.len());

    for product in products {
        match interpret_product(tree, &product) {
            Ok(interpretation) => results.push((product, interpretation)),
            Err(e) => log::warn!("{}", e),
        }
    }

    Ok(results)
}
