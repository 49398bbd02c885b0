// ABOUTME: Element implementation over a parsed dom_query document.
// ABOUTME: Selector queries go through the compiled Matcher cache; style writes mutate the tree in place.

use std::fmt;

use dom_query::{Document, NodeRef, Selection};

use super::{style, Element};
use crate::extractors::compiled;

/// A handle to an element in a `dom_query::Document`.
#[derive(Clone)]
pub struct HtmlElement<'a> {
    node: NodeRef<'a>,
}

impl<'a> HtmlElement<'a> {
    /// Wraps an existing node.
    pub fn new(node: NodeRef<'a>) -> Self {
        Self { node }
    }

    /// Returns a handle to the document node, the usual scan root.
    pub fn root(doc: &'a Document) -> Self {
        Self::new(doc.root())
    }

    /// Returns the underlying node.
    pub fn node(&self) -> &NodeRef<'a> {
        &self.node
    }
}

impl<'a> From<NodeRef<'a>> for HtmlElement<'a> {
    fn from(node: NodeRef<'a>) -> Self {
        Self::new(node)
    }
}

impl fmt::Debug for HtmlElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlElement")
            .field("name", &self.node.node_name())
            .field("id", &self.node.id)
            .finish()
    }
}

impl<'a> Element for HtmlElement<'a> {
    fn query_all(&self, selector: &str) -> Vec<Self> {
        let Some(matcher) = compiled::global().matcher(selector) else {
            return vec![];
        };
        Selection::from(self.node.clone())
            .select_matcher(&matcher)
            .nodes()
            .iter()
            .cloned()
            .map(Self::new)
            .collect()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.node.attr(name).map(|v| v.to_string())
    }

    fn text(&self) -> String {
        self.node.text().to_string()
    }

    fn parent(&self) -> Option<Self> {
        self.node.parent().map(Self::new)
    }

    fn preceding_siblings(&self) -> usize {
        let mut count = 0;
        let mut current = self.node.prev_element_sibling();
        while let Some(sibling) = current {
            count += 1;
            current = sibling.prev_element_sibling();
        }
        count
    }

    fn same_node(&self, other: &Self) -> bool {
        self.node.id == other.node.id
    }

    fn set_style_property(&self, property: &str, value: &str) {
        let current = self.attr("style").unwrap_or_default();
        let updated = style::set_property(&current, property, value);
        if updated.is_empty() {
            self.node.remove_attr("style");
        } else {
            self.node.set_attr("style", &updated);
        }
    }
}
