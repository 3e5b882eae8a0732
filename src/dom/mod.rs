pub mod parser;
pub mod shell;

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
}

/// Ownership-free reference to a node: the child indices leading to it
/// from the tree root.
///
/// Lexicographic ordering of paths is document (pre-)order, so sorting a
/// set of paths yields the order a reader would meet the nodes in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn child(&self, idx: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(idx);
        Self(indices)
    }

    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Strict ancestry: a path is not its own ancestor.
    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// `other` is this node or lies somewhere below it.
    pub fn contains(&self, other: &NodePath) -> bool {
        other.0.starts_with(&self.0)
    }
}

/// Internal DOM node representation.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub children: Vec<DomNode>,
    pub node_type: NodeType,
}

impl DomNode {
    pub fn document(children: Vec<DomNode>) -> Self {
        Self {
            tag: "#document".into(),
            attributes: HashMap::new(),
            text: String::new(),
            children,
            node_type: NodeType::Document,
        }
    }

    pub fn element(
        tag: impl Into<String>,
        attrs: HashMap<String, String>,
        children: Vec<DomNode>,
    ) -> Self {
        Self {
            tag: tag.into(),
            attributes: attrs,
            text: String::new(),
            children,
            node_type: NodeType::Element,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            tag: String::new(),
            attributes: HashMap::new(),
            text: content.into(),
            children: Vec::new(),
            node_type: NodeType::Text,
        }
    }

    /// Element with attributes given as `(name, value)` pairs.
    pub fn with_attrs(tag: &str, attrs: &[(&str, &str)], children: Vec<DomNode>) -> Self {
        let attributes = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::element(tag, attributes, children)
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Text node consisting only of whitespace.
    pub fn is_blank_text(&self) -> bool {
        self.node_type == NodeType::Text && self.text.trim().is_empty()
    }

    /// Recursively count all nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Concatenated raw text of the subtree, like the browser's `textContent`.
    pub fn text_content(&self) -> String {
        let mut buf = String::new();
        self.text_content_inner(&mut buf);
        buf
    }

    fn text_content_inner(&self, buf: &mut String) {
        if self.node_type == NodeType::Text {
            buf.push_str(&self.text);
            return;
        }
        for child in &self.children {
            child.text_content_inner(buf);
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|token| token == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let kept: Vec<&str> = self
            .attr("class")
            .unwrap_or("")
            .split_whitespace()
            .filter(|token| *token != class)
            .collect();
        let joined = kept.join(" ");
        self.set_attr("class", joined);
    }

    /// Flip `class` on or off. Returns whether the class is now present.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    pub fn node_at(&self, path: &NodePath) -> Option<&DomNode> {
        let mut current = self;
        for &idx in path.indices() {
            current = current.children.get(idx)?;
        }
        Some(current)
    }

    pub fn node_at_mut(&mut self, path: &NodePath) -> Option<&mut DomNode> {
        let mut current = self;
        for &idx in path.indices() {
            current = current.children.get_mut(idx)?;
        }
        Some(current)
    }

    /// First node in document order (this node included) satisfying `pred`.
    pub fn find(&self, pred: &dyn Fn(&DomNode) -> bool) -> Option<NodePath> {
        let mut current = Vec::new();
        find_inner(self, pred, &mut current)
    }

    pub fn find_by_id(&self, id: &str) -> Option<NodePath> {
        self.find(&|n| n.is_element() && n.attr("id") == Some(id))
    }

    /// Append `child` under the node at `parent`. Returns the new child's path.
    pub fn append_child(&mut self, parent: &NodePath, child: DomNode) -> Option<NodePath> {
        let node = self.node_at_mut(parent)?;
        node.children.push(child);
        Some(parent.child(node.children.len() - 1))
    }

    pub fn clear_children(&mut self, path: &NodePath) {
        if let Some(node) = self.node_at_mut(path) {
            node.children.clear();
        }
    }
}

fn find_inner(
    node: &DomNode,
    pred: &dyn Fn(&DomNode) -> bool,
    current: &mut Vec<usize>,
) -> Option<NodePath> {
    if pred(node) {
        return Some(NodePath(current.clone()));
    }
    for (i, child) in node.children.iter().enumerate() {
        current.push(i);
        let found = find_inner(child, pred, current);
        current.pop();
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Parsed DOM tree with metadata
#[derive(Debug, Clone)]
pub struct DomTree {
    pub root: DomNode,
    pub url: String,
    pub title: String,
}

impl DomTree {
    pub fn new(root: DomNode) -> Self {
        Self {
            root,
            url: String::new(),
            title: String::new(),
        }
    }

    pub fn node(&self, path: &NodePath) -> Option<&DomNode> {
        self.root.node_at(path)
    }

    pub fn node_mut(&mut self, path: &NodePath) -> Option<&mut DomNode> {
        self.root.node_at_mut(path)
    }

    pub fn find_by_id(&self, id: &str) -> Option<NodePath> {
        self.root.find_by_id(id)
    }

    /// The `<body>` element, falling back to the root for fragments.
    pub fn body(&self) -> NodePath {
        self.root
            .find(&|n| n.is_element() && n.tag == "body")
            .unwrap_or_else(NodePath::root)
    }
}

/// Minimal tree-inspection interface the outline heuristics run against.
///
/// Nodes are addressed by [`NodePath`] relative to the implementor's root.
/// Only element nodes have a tag; text nodes answer `None`.
pub trait ContentTree {
    fn child_count(&self, node: &NodePath) -> usize;

    fn tag(&self, node: &NodePath) -> Option<&str>;

    fn is_text(&self, node: &NodePath) -> bool;

    fn text_content(&self, node: &NodePath) -> String;

    fn attr(&self, node: &NodePath, name: &str) -> Option<&str>;

    /// Annotate a node. Returns false when the path does not resolve.
    fn set_attr(&mut self, node: &NodePath, name: &str, value: &str) -> bool;

    fn children(&self, node: &NodePath) -> Vec<NodePath> {
        (0..self.child_count(node)).map(|i| node.child(i)).collect()
    }

    /// Every node below `node`, in document order, excluding `node` itself.
    fn descendants(&self, node: &NodePath) -> Vec<NodePath> {
        let mut out = Vec::new();
        let mut stack: Vec<NodePath> = self.children(node).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            let children = self.children(&next);
            out.push(next);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    fn has_class(&self, node: &NodePath, class: &str) -> bool {
        self.attr(node, "class")
            .map(|c| c.split_whitespace().any(|token| token == class))
            .unwrap_or(false)
    }
}

impl ContentTree for DomNode {
    fn child_count(&self, node: &NodePath) -> usize {
        self.node_at(node).map(|n| n.children.len()).unwrap_or(0)
    }

    fn tag(&self, node: &NodePath) -> Option<&str> {
        self.node_at(node)
            .filter(|n| n.is_element())
            .map(|n| n.tag.as_str())
    }

    fn is_text(&self, node: &NodePath) -> bool {
        self.node_at(node)
            .map(|n| n.node_type == NodeType::Text)
            .unwrap_or(false)
    }

    fn text_content(&self, node: &NodePath) -> String {
        self.node_at(node).map(|n| n.text_content()).unwrap_or_default()
    }

    fn attr(&self, node: &NodePath, name: &str) -> Option<&str> {
        self.node_at(node).and_then(|n| n.attr(name))
    }

    fn set_attr(&mut self, node: &NodePath, name: &str, value: &str) -> bool {
        match self.node_at_mut(node) {
            Some(n) => {
                n.set_attr(name, value);
                true
            }
            None => false,
        }
    }
}

impl ContentTree for DomTree {
    fn child_count(&self, node: &NodePath) -> usize {
        self.root.child_count(node)
    }

    fn tag(&self, node: &NodePath) -> Option<&str> {
        self.root.tag(node)
    }

    fn is_text(&self, node: &NodePath) -> bool {
        self.root.is_text(node)
    }

    fn text_content(&self, node: &NodePath) -> String {
        ContentTree::text_content(&self.root, node)
    }

    fn attr(&self, node: &NodePath, name: &str) -> Option<&str> {
        ContentTree::attr(&self.root, node, name)
    }

    fn set_attr(&mut self, node: &NodePath, name: &str, value: &str) -> bool {
        ContentTree::set_attr(&mut self.root, node, name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DomNode {
        DomNode::with_attrs(
            "div",
            &[("id", "outer"), ("class", "flux active")],
            vec![
                DomNode::text("  "),
                DomNode::with_attrs("p", &[], vec![DomNode::text("Hello "), DomNode::text("world")]),
                DomNode::with_attrs("span", &[("id", "inner")], vec![]),
            ],
        )
    }

    #[test]
    fn paths_follow_document_order() {
        let a = NodePath::from_indices(vec![0, 1]);
        let b = NodePath::from_indices(vec![0, 1, 0]);
        let c = NodePath::from_indices(vec![0, 2]);
        assert!(a < b && b < c);
        assert!(a.is_ancestor_of(&b));
        assert!(!a.is_ancestor_of(&a));
        assert!(a.contains(&a));
        assert_eq!(b.parent(), Some(a));
        assert_eq!(NodePath::root().parent(), None);
    }

    #[test]
    fn text_content_concatenates_raw_text() {
        let node = sample();
        assert_eq!(node.text_content(), "  Hello world");
    }

    #[test]
    fn class_helpers_edit_token_list() {
        let mut node = sample();
        assert!(node.has_class("flux"));
        assert!(!node.has_class("flu"));
        node.remove_class("active");
        assert_eq!(node.attr("class"), Some("flux"));
        assert!(node.toggle_class("collapsed"));
        assert_eq!(node.attr("class"), Some("flux collapsed"));
        assert!(!node.toggle_class("collapsed"));
        assert!(!node.has_class("collapsed"));
    }

    #[test]
    fn lookup_and_mutation_by_path() {
        let mut node = sample();
        let inner = node.find_by_id("inner").unwrap();
        assert_eq!(inner, NodePath::from_indices(vec![2]));

        let added = node
            .append_child(&inner, DomNode::text("late"))
            .unwrap();
        assert_eq!(added, NodePath::from_indices(vec![2, 0]));
        assert_eq!(ContentTree::text_content(&node, &inner), "late");

        node.clear_children(&inner);
        assert_eq!(node.child_count(&inner), 0);
    }

    #[test]
    fn descendants_are_preorder() {
        let node = sample();
        let all = node.descendants(&NodePath::root());
        assert_eq!(all.len(), 5);
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
        assert_eq!(node.tag(&all[1]), Some("p"));
        assert!(node.is_text(&all[0]));
        assert_eq!(node.tag(&all[0]), None);
    }
}
