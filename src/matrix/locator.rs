//! Finds the product support tables of a page.

use crate::dom::DomTree;
use crate::dom::table::{CellView, TableView};
use crate::error::{MatrixError, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Rows 1..=SAMPLED_ROWS are checked for a product label
pub const SAMPLED_ROWS: usize = 9;

static PRODUCT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s+([\d.]+[x\d.]*)$").expect("valid regex"));

/// A table recognized as a product support table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTable {
    /// Product name inferred from a "Name version" row label
    pub name: String,

    /// Position of the table among all tables of the page
    pub table_index: usize,
}

/// Product name from a row label such as "Elastic Agent 8.1.x".
///
/// The name must be longer than 2 characters and must not start with a digit.
pub fn product_name_from_label(label: &str) -> Option<String> {
    let caps = PRODUCT_LABEL.captures(label.trim())?;
    let name = caps.get(1)?.as_str().trim();

    if name.chars().count() > 2 && !name.starts_with(|c: char| c.is_ascii_digit()) {
        Some(name.to_string())
    } else {
        None
    }
}

/// Product name of a table, from the first matching data row label
pub fn product_name<'a, T: TableView<'a>>(table: &T) -> Option<String> {
    table
        .rows()
        .iter()
        .skip(1)
        .take(SAMPLED_ROWS)
        .filter_map(|row| row.first())
        .find_map(|cell| product_name_from_label(&cell.text()))
}

/// Product tables of `tables`, one per distinct name, first table wins
pub fn locate<'a, T, I>(tables: I) -> Vec<ProductTable>
where
    T: TableView<'a>,
    I: IntoIterator<Item = T>,
{
    let mut found: IndexMap<String, usize> = IndexMap::new();

    for (table_index, table) in tables.into_iter().enumerate() {
        match product_name(&table) {
            Some(name) if found.contains_key(&name) => {
                log::debug!("Table {} repeats product '{}', skipped", table_index, name);
            }
            Some(name) => {
                log::debug!("Table {} holds product '{}'", table_index, name);
                found.insert(name, table_index);
            }
            None => log::trace!("Table {} has no product label", table_index),
        }
    }

    log::debug!("Found {} product tables.", found.len());

    found
        .into_iter()
        .map(|(name, table_index)| ProductTable { name, table_index })
        .collect()
}

/// Product tables of a page
pub fn find_product_tables(tree: &DomTree) -> Vec<ProductTable> {
    locate(tree.tables())
}

/// Product tables of a page, or [`MatrixError::NoProductTables`]
pub fn require_product_tables(tree: &DomTree) -> Result<Vec<ProductTable>> {
    let products = find_product_tables(tree);
    if products.is_empty() {
        return Err(MatrixError::NoProductTables);
    }
    Ok(products)
}

/// Pick a product out of `products` by exact name, then case-insensitively
pub fn resolve_product(products: &[ProductTable], name: &str) -> Result<ProductTable> {
    if products.is_empty() {
        return Err(MatrixError::NoProductTables);
    }
    let wanted = name.trim();

    products
        .iter()
        .find(|p| p.name == wanted)
        .or_else(|| products.iter().find(|p| p.name.eq_ignore_ascii_case(wanted)))
        .cloned()
        .ok_or_else(|| MatrixError::ProductNotFound(wanted.to_string()))
}

/// Resolve a product of a page by name
pub fn find_product_table(tree: &DomTree, name: &str) -> Result<ProductTable> {
    resolve_product(&find_product_tables(tree), name)
}

/// Names of the product tables of a page
pub fn product_names(tree: &DomTree) -> Vec<String> {
    find_product_tables(tree).into_iter().map(|p| p.name).collect()
}
