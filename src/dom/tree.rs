use crate::dom::element::{ElementNode, MARKUP_TAGS};
use crate::dom::table::HtmlTable;
use crate::error::{MatrixError, Result};
use headless_chrome::Tab;
use scraper::{ElementRef, Html};
use std::sync::Arc;

/// Snapshot of a page's DOM
#[derive(Debug, Clone, PartialEq)]
pub struct DomTree {
    /// Root element of the DOM tree
    pub root: ElementNode,
}

impl DomTree {
    /// Create a new DomTree
    pub fn new(root: ElementNode) -> Self {
        Self { root }
    }

    /// Build DOM tree from a static HTML document
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let root = Self::convert_element(document.root_element());
        log::debug!("Parsed HTML document ({} bytes)", html.len());
        Self::new(root)
    }

    fn convert_element(element: ElementRef<'_>) -> ElementNode {
        let value = element.value();
        let mut node = ElementNode::new(value.name());

        for (key, val) in value.attrs() {
            node.add_attribute(key, val);
        }

        node.children = element
            .children()
            .filter_map(ElementRef::wrap)
            .map(Self::convert_element)
            .collect();

        let is_cell = MARKUP_TAGS.contains(&value.name());
        if is_cell || node.children.is_empty() {
            node.text_content = Some(element.text().collect());
        }
        if is_cell {
            node.inner_html = Some(element.inner_html());
        }

        node
    }

    /// Load a snapshot previously written by [`DomTree::to_json`]
    pub fn from_json(json: &str) -> Result<Self> {
        let root: ElementNode = serde_json::from_str(json)
            .map_err(|e| MatrixError::DomParseFailed(format!("Failed to parse DOM JSON: {}", e)))?;
        Ok(Self::new(root))
    }

    /// Build DOM tree from a browser tab
    pub fn from_tab(tab: &Arc<Tab>) -> Result<Self> {
        // JavaScript code to extract the DOM structure
        // This returns a JSON string
        let js_code = include_str!("extract_dom.js");

        // Execute JavaScript to extract DOM
        let result = tab
            .evaluate(js_code, false)
            .map_err(|e| MatrixError::EvaluationFailed(format!("DOM extraction script: {}", e)))?;

        // Get the JSON string value
        let json_value = result
            .value
            .ok_or_else(|| MatrixError::DomParseFailed("No value returned from DOM extraction".to_string()))?;

        // The JavaScript returns a JSON string, so we need to parse it as a string first
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| MatrixError::DomParseFailed(format!("Failed to get JSON string: {}", e)))?;

        Self::from_json(&json_str)
    }

    /// Simplify the DOM tree by removing unnecessary elements
    pub fn simplify(&mut self) {
        self.root.simplify();
    }

    /// Convert the DOM tree to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.root)
            .map_err(|e| MatrixError::DomParseFailed(format!("Failed to serialize DOM to JSON: {}", e)))
    }

    /// All `<table>` elements in document order
    pub fn tables(&self) -> Vec<HtmlTable<'_>> {
        let mut tables = Vec::new();
        if self.root.is_tag("table") {
            tables.push(HtmlTable::new(&self.root));
        }
        tables.extend(self.root.find_all("table").into_iter().map(HtmlTable::new));
        tables
    }

    /// The table at `index` among [`DomTree::tables`]
    pub fn table(&self, index: usize) -> Result<HtmlTable<'_>> {
        self.tables()
            .get(index)
            .copied()
            .ok_or(MatrixError::TableNotFound(index))
    }

    /// Count total elements in the tree
    pub fn count_elements(&self) -> usize {
        Self::count_elements_recursive(&self.root)
    }

    fn count_elements_recursive(node: &ElementNode) -> usize {
        1 + node.children.iter().map(Self::count_elements_recursive).sum::<usize>()
    }
}
