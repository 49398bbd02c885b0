// ABOUTME: DOM capability used by the extraction layer, abstracted behind the Element trait.
// ABOUTME: Re-exports the dom_query-backed HtmlElement and the inline style helpers.

//! DOM access for video extraction.
//!
//! Everything the extractor and the video model need from a page is expressed
//! through [`Element`]: scoped selector queries, attribute and text reads,
//! upward traversal, and inline style writes. [`HtmlElement`] implements it
//! over a parsed, mutable `dom_query` document; tests and embedders can
//! provide their own implementations.

pub mod html;
pub mod style;

pub use html::HtmlElement;

/// A handle to one element of a live DOM.
///
/// Handles are cheap to clone and all point at the same underlying node, so
/// style writes through one clone are visible through the others. Mutation
/// goes through `&self` because the page owns the tree, not the handle.
pub trait Element: Clone {
    /// Returns every descendant matching `selector`, in document order.
    ///
    /// Matching is scoped to this element's subtree. An invalid selector
    /// matches nothing.
    fn query_all(&self, selector: &str) -> Vec<Self>;

    /// Returns the first descendant matching `selector`.
    fn query(&self, selector: &str) -> Option<Self> {
        self.query_all(selector).into_iter().next()
    }

    /// Returns the value of attribute `name`, if present.
    fn attr(&self, name: &str) -> Option<String>;

    /// Returns the concatenated text content of the subtree.
    fn text(&self) -> String;

    /// Returns the parent node, or `None` at the top of the tree.
    fn parent(&self) -> Option<Self>;

    /// Returns the topmost ancestor, or this node when it has no parent.
    ///
    /// Two nodes of the same document share a top; a node removed from the
    /// page does not share it with the page any more.
    fn top(&self) -> Self {
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node
    }

    /// Returns how many element siblings precede this node.
    fn preceding_siblings(&self) -> usize;

    /// Returns true if both handles refer to the same node.
    fn same_node(&self, other: &Self) -> bool;

    /// Returns the inline style value of `property`, or an empty string.
    fn style_property(&self, property: &str) -> String {
        self.attr("style")
            .map(|css| style::get_property(&css, property))
            .unwrap_or_default()
    }

    /// Sets the inline style `property`; an empty value removes it.
    fn set_style_property(&self, property: &str, value: &str);
}
