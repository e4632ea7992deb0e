//! Read-only table interface used by the locator and the interpreter.
//!
//! The heuristics only ever need rows, cells and a handful of per-cell
//! accessors, so they are written against [`TableView`] and [`CellView`]
//! instead of a concrete DOM binding.

use crate::dom::element::ElementNode;

/// Accessors the heuristics need from a single table cell
pub trait CellView {
    /// Text content, trimmed
    fn text(&self) -> String;

    /// Inner markup, untrimmed
    fn markup(&self) -> String;

    /// Whether the class list contains `class_name`
    fn has_class(&self, class_name: &str) -> bool;

    /// Inline style property value, lowercased
    fn style_value(&self, property: &str) -> Option<String>;

    /// Whether the cell embeds a vector icon
    fn has_icon(&self) -> bool;

    /// Whether the cell embeds a vector icon whose `attribute` contains `needle`
    fn has_icon_with(&self, attribute: &str, needle: &str) -> bool;
}

/// A table as a list of rows, each a list of cells borrowed for `'a`
pub trait TableView<'a> {
    type Cell: CellView + 'a;

    /// All rows in document order; row 0 is the header
    fn rows(&self) -> Vec<Vec<&'a Self::Cell>>;
}

impl CellView for ElementNode {
    fn text(&self) -> String {
        ElementNode::text(self).trim().to_string()
    }

    fn markup(&self) -> String {
        ElementNode::markup(self)
    }

    fn has_class(&self, class_name: &str) -> bool {
        ElementNode::has_class(self, class_name)
    }

    fn style_value(&self, property: &str) -> Option<String> {
        self.style_property(property)
    }

    fn has_icon(&self) -> bool {
        self.has_descendant("svg")
    }

    fn has_icon_with(&self, attribute: &str, needle: &str) -> bool {
        self.find_all("svg")
            .iter()
            .any(|svg| svg.get_attribute(attribute).is_some_and(|v| v.contains(needle)))
    }
}

/// A `<table>` element of a [`crate::dom::DomTree`]
#[derive(Debug, Clone, Copy)]
pub struct HtmlTable<'a> {
    node: &'a ElementNode,
}

impl<'a> HtmlTable<'a> {
    pub fn new(node: &'a ElementNode) -> Self {
        Self { node }
    }

    /// The underlying element
    pub fn element(&self) -> &'a ElementNode {
        self.node
    }
}

impl<'a> TableView<'a> for HtmlTable<'a> {
    type Cell = ElementNode;

    fn rows(&self) -> Vec<Vec<&'a ElementNode>> {
        self.node
            .find_all("tr")
            .into_iter()
            .map(|row| {
                row.children
                    .iter()
                    .filter(|c| c.is_tag("td") || c.is_tag("th"))
                    .collect()
            })
            .collect()
    }
}

/// Build a `<table>` element from rows of cell texts. Row 0 uses `<th>` cells.
pub fn table_from_texts<R, C>(rows: R) -> ElementNode
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = C>,
    C: Into<String>,
{
    let mut body = ElementNode::new("tbody");
    for (index, row) in rows.into_iter().enumerate() {
        let tag = if index == 0 { "th" } else { "td" };
        let cells = row
            .into_iter()
            .map(|text| ElementNode::new(tag).with_text(text))
            .collect();
        body.add_child(ElementNode::new("tr").with_children(cells));
    }
    ElementNode::new("table").with_children(vec![body])
}
