//! Output document graph.
//!
//! Every export component builds fragments of a single hierarchical
//! document. A node has a name, optional scalar text and an ordered list
//! of child nodes; child order is preserved all the way to serialization
//! so repeated exports of the same scene produce byte-identical output.

pub mod writer;

pub use writer::{write_document, write_document_to};

use std::fmt;

/// A scalar leaf value. Rendered as text, space-joined when a leaf holds
/// more than one value (e.g. a position or an RGB triple).
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "{}", s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i as i64)
    }
}

impl From<usize> for Scalar {
    fn from(i: usize) -> Self {
        Scalar::Int(i as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(v as f64)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// A node in the output document graph.
#[derive(Debug, Clone, PartialEq)]
pub struct DocNode {
    name: String,
    text: Vec<Scalar>,
    children: Vec<DocNode>,
}

impl DocNode {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a leaf element with a single scalar value.
    pub fn scalar(name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            name: name.into(),
            text: vec![value.into()],
            children: Vec::new(),
        }
    }

    /// Create a leaf element with a list of scalar values (space-joined).
    pub fn scalars<S: Into<Scalar>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            text: values.into_iter().map(Into::into).collect(),
            children: Vec::new(),
        }
    }

    /// Append a child node, builder style.
    pub fn child(mut self, node: DocNode) -> Self {
        self.children.push(node);
        self
    }

    /// Append a leaf child with a single scalar value.
    pub fn field(self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.child(DocNode::scalar(name, value))
    }

    /// Append a leaf child with a list of scalar values.
    pub fn field_list<S: Into<Scalar>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.child(DocNode::scalars(name, values))
    }

    /// Append several children in order.
    pub fn extend(mut self, nodes: impl IntoIterator<Item = DocNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Append a child node in place.
    pub fn push(&mut self, node: DocNode) {
        self.children.push(node);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[DocNode] {
        &self.children
    }

    /// Space-joined text of the node, empty for non-leaves.
    pub fn text(&self) -> String {
        self.text
            .iter()
            .map(Scalar::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Find the first direct child with the given name.
    pub fn find(&self, name: &str) -> Option<&DocNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Count direct children with the given name.
    pub fn count(&self, name: &str) -> usize {
        self.children.iter().filter(|c| c.name == name).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::from("abc").to_string(), "abc");
        assert_eq!(Scalar::from(3).to_string(), "3");
        assert_eq!(Scalar::from(1.5).to_string(), "1.5");
        assert_eq!(Scalar::from(true).to_string(), "true");
        assert_eq!(Scalar::from(false).to_string(), "false");
    }

    #[test]
    fn test_leaf_text_joining() {
        let node = DocNode::scalars("pos", [1.0, 2.5, -3.0]);
        assert_eq!(node.text(), "1 2.5 -3");
        assert!(node.is_leaf());
    }

    #[test]
    fn test_child_order_preserved() {
        let node = DocNode::new("model")
            .field("mesh_name", "m1")
            .field("scale", 1.0)
            .field_list("pos", [0.0, 0.0, 0.0]);

        let names: Vec<_> = node.children().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["mesh_name", "scale", "pos"]);
    }

    #[test]
    fn test_find_and_count() {
        let node = DocNode::new("scene")
            .child(DocNode::scalar("material", "a"))
            .child(DocNode::scalar("material", "b"))
            .child(DocNode::scalar("camera", "c"));
        assert_eq!(node.count("material"), 2);
        assert_eq!(node.find("camera").unwrap().text(), "c");
        assert!(node.find("missing").is_none());
    }
}
