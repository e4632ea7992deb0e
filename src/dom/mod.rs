//! DOM snapshot module
//!
//! This module provides the page structure the support-matrix heuristics read.
//! It includes:
//! - ElementNode: Serializable representation of DOM elements
//! - DomTree: Snapshot of a page, built from HTML, JSON or a live tab
//! - TableView / CellView: Read-only table interface for the interpreter

pub mod element;
pub mod table;
pub mod tree;

pub use element::ElementNode;
pub use table::{CellView, HtmlTable, TableView, table_from_texts};
pub use tree::DomTree;
