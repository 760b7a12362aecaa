//! Thin element-traversal layer over `scraper`

use crate::error::ExampleError;
use scraper::{ElementRef, Html, Selector};

/// A parsed puzzle page
pub struct Markup {
    html: Html,
}

impl Markup {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn root(&self) -> Node<'_> {
        Node(self.html.root_element())
    }

    /// All elements matching a selector string, in document order
    pub fn select(&self, selector: &str) -> Result<Vec<Node<'_>>, ExampleError> {
        let parsed = parse_selector(selector)?;
        Ok(self.find(&parsed))
    }

    /// Like [`Markup::select`] for an already parsed selector
    pub fn find(&self, selector: &Selector) -> Vec<Node<'_>> {
        self.html.select(selector).map(Node).collect()
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ExampleError> {
    Selector::parse(selector).map_err(|e| ExampleError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Handle to one element of a [`Markup`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    pub fn name(&self) -> &'a str {
        self.0.value().name()
    }

    /// Concatenated text of all descendant text nodes
    pub fn text(&self) -> String {
        self.0.text().collect()
    }

    /// Text where `<br>` elements become newlines
    pub fn text_with_breaks(&self) -> String {
        let mut out = String::new();
        for node in self.0.descendants() {
            if let Some(text) = node.value().as_text() {
                out.push_str(text);
            } else if node.value().as_element().is_some_and(|e| e.name() == "br") {
                out.push('\n');
            }
        }
        out
    }

    pub fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.0.parent().and_then(ElementRef::wrap).map(Node)
    }

    /// Closest preceding sibling element
    pub fn prev_element(&self) -> Option<Node<'a>> {
        self.0.prev_siblings().find_map(ElementRef::wrap).map(Node)
    }

    /// True when any node (element or non-blank text) precedes this one
    /// inside its parent
    pub fn has_preceding_sibling(&self) -> bool {
        self.0.prev_siblings().any(|sibling| match sibling.value().as_text() {
            Some(text) => !text.trim().is_empty(),
            None => sibling.value().is_element(),
        })
    }

    pub fn child_elements(&self) -> impl Iterator<Item = Node<'a>> {
        self.0.children().filter_map(ElementRef::wrap).map(Node)
    }

    pub fn has_child(&self, tag: &str) -> bool {
        self.child_elements().any(|child| child.name() == tag)
    }

    /// Later siblings with the given tag name
    pub fn next_siblings_matching(&self, tag: &str) -> Vec<Node<'a>> {
        self.0
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == tag)
            .map(Node)
            .collect()
    }

    /// Nearest ancestor (excluding self) with the given tag name
    pub fn closest(&self, tag: &str) -> Option<Node<'a>> {
        self.0
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == tag)
            .map(Node)
    }

    /// Descendants of this element matching `selector`
    pub fn find(&self, selector: &Selector) -> Vec<Node<'a>> {
        self.0.select(selector).map(Node).collect()
    }
}
