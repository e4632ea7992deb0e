use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tags whose inner markup is captured when a snapshot is taken
pub const MARKUP_TAGS: [&str; 2] = ["td", "th"];

/// Represents a DOM element node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name (e.g., "table", "tr", "td")
    pub tag_name: String,

    /// Element attributes (e.g., id, class, style, etc.)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Text content, descendants included. Snapshots record it on table
    /// cells and leaf elements only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// Inner markup, captured for table cells only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_html: Option<String>,

    /// Child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
            text_content: None,
            inner_html: None,
            children: Vec::new(),
        }
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method: set a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: set captured inner markup
    pub fn with_inner_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = Some(html.into());
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        self.children = children;
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(child);
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Check if element has a specific class
    pub fn has_class(&self, class_name: &str) -> bool {
        if let Some(classes) = self.attributes.get("class") {
            classes.split_whitespace().any(|c| c == class_name)
        } else {
            false
        }
    }

    /// Get element ID
    pub fn id(&self) -> Option<&String> {
        self.attributes.get("id")
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Text content of the element and its descendants.
    ///
    /// Elements without recorded text concatenate their children's text.
    pub fn text(&self) -> String {
        match &self.text_content {
            Some(text) => text.clone(),
            None => self.children.iter().map(|c| c.text()).collect(),
        }
    }

    /// Inner markup of the element.
    ///
    /// Returns the captured markup when present, otherwise renders the
    /// children (attributes in sorted order), or the bare text for leaves.
    pub fn markup(&self) -> String {
        if let Some(html) = &self.inner_html {
            return html.clone();
        }
        if self.children.is_empty() {
            return self.text_content.clone().unwrap_or_default();
        }
        self.children.iter().map(|c| c.outer_markup()).collect()
    }

    fn outer_markup(&self) -> String {
        let mut attrs: Vec<_> = self.attributes.iter().collect();
        attrs.sort();

        let mut out = format!("<{}", self.tag_name);
        for (key, value) in attrs {
            out.push_str(&format!(" {}=\"{}\"", key, value));
        }
        out.push('>');
        out.push_str(&self.markup());
        out.push_str(&format!("</{}>", self.tag_name));
        out
    }

    /// Value of a property in the inline `style` attribute, lowercased and trimmed
    pub fn style_property(&self, property: &str) -> Option<String> {
        let style = self.attributes.get("style")?;
        style.split(';').find_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            if name.trim().eq_ignore_ascii_case(property) {
                Some(value.trim().to_ascii_lowercase())
            } else {
                None
            }
        })
    }

    /// All descendants with the given tag, in document order
    pub fn find_all(&self, tag: &str) -> Vec<&ElementNode> {
        let mut found = Vec::new();
        self.collect_descendants(tag, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, tag: &str, found: &mut Vec<&'a ElementNode>) {
        for child in &self.children {
            if child.is_tag(tag) {
                found.push(child);
            }
            child.collect_descendants(tag, found);
        }
    }

    /// Check whether any descendant has the given tag
    pub fn has_descendant(&self, tag: &str) -> bool {
        self.children
            .iter()
            .any(|c| c.is_tag(tag) || c.has_descendant(tag))
    }

    /// Simplify element by removing unnecessary children (like scripts, styles)
    pub fn simplify(&mut self) {
        // Remove script, style, and noscript elements
        self.children.retain(|child| {
            !matches!(child.tag_name.as_str(), "script" | "style" | "noscript")
        });

        // Recursively simplify children
        for child in &mut self.children {
            child.simplify();
        }
    }
}
