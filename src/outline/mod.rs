//! Outline derivation for the displayed article.
//!
//! `locator` picks the article subtree, the three strategy modules propose
//! candidate items from it, and `cascade` chooses the first viable proposal
//! and gives every item a stable anchor identifier.

pub mod bold_lead;
pub mod cascade;
pub mod headings;
pub mod levels;
pub mod locator;
pub mod numbered;

use crate::dom::NodePath;

/// Shallowest level an item can have.
pub const MIN_LEVEL: u8 = 2;
/// Deepest level an item can have.
pub const MAX_LEVEL: u8 = 6;

/// Which heuristic produced an outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `h1`..`h6` elements
    Headings,
    /// Short blocks starting with a chapter/section number
    Numbered,
    /// Blocks opening with a short bold run
    BoldLead,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Headings => "headings",
            Strategy::Numbered => "numbered",
            Strategy::BoldLead => "bold-lead",
        }
    }
}

/// An item proposed by a strategy, before anchor ids are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub anchor: NodePath,
    pub level: u8,
    pub label: String,
}

/// One navigable point of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    /// Node the item points to. Read and annotated, never owned.
    pub anchor: NodePath,
    /// Identifier written on the anchor node; unique within the outline.
    pub anchor_id: String,
    /// Nesting depth in `[MIN_LEVEL, MAX_LEVEL]`.
    pub level: u8,
    /// Trimmed text captured at extraction time.
    pub label: String,
}

/// Ordered outline, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    items: Vec<OutlineItem>,
    strategy: Option<Strategy>,
}

impl Outline {
    pub fn new(items: Vec<OutlineItem>, strategy: Strategy) -> Self {
        Self {
            items,
            strategy: Some(strategy),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[OutlineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `None` for the empty outline.
    pub fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    pub fn levels(&self) -> Vec<u8> {
        self.items.iter().map(|i| i.level).collect()
    }

    pub fn anchor_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.anchor_id.clone()).collect()
    }

    pub fn get(&self, anchor_id: &str) -> Option<&OutlineItem> {
        self.items.iter().find(|i| i.anchor_id == anchor_id)
    }

    pub fn position(&self, anchor_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.anchor_id == anchor_id)
    }
}

/// Shared predicate: the node is an element whose tag is one of `tags`.
pub(crate) fn tag_in(tree: &impl crate::dom::ContentTree, node: &NodePath, tags: &[&str]) -> bool {
    tree.tag(node)
        .map(|t| tags.iter().any(|want| t.eq_ignore_ascii_case(want)))
        .unwrap_or(false)
}
