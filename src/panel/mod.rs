//! Floating outline panel, kept as nodes inside the host document.
//!
//! ```text
//! body
//! └── div#toc-panel[.collapsed][style="display: none"]
//!     ├── button#toc-toggle          "☰" / "✕"
//!     ├── div.toc-title              "Table of Contents"
//!     └── ol#toc-list
//!         └── li[data-level][data-heading-id][.toc-active]
//!             └── a[href="#<anchor id>"]  label
//! ```

use crate::dom::{DomNode, DomTree, NodePath};
use crate::outline::Outline;

pub const PANEL_ID: &str = "toc-panel";
pub const TOGGLE_ID: &str = "toc-toggle";
pub const LIST_ID: &str = "toc-list";
pub const TITLE_CLASS: &str = "toc-title";
pub const ACTIVE_ITEM_CLASS: &str = "toc-active";
pub const COLLAPSED_CLASS: &str = "collapsed";

pub const TITLE_TEXT: &str = "Table of Contents";
pub const TOGGLE_TOOLTIP: &str = "Toggle TOC";
/// Glyph shown while collapsed (and before the first toggle).
pub const GLYPH_MENU: &str = "\u{2630}";
/// Glyph shown while expanded after a toggle.
pub const GLYPH_CLOSE: &str = "\u{2715}";

const HIDDEN_STYLE: &str = "display: none";
const LEVEL_ATTR: &str = "data-level";
const ANCHOR_ATTR: &str = "data-heading-id";

/// What a pointer click on the panel landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelHit {
    Toggle,
    Entry { anchor_id: String },
}

/// Read-only picture of the panel for hosts that paint it themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub hidden: bool,
    pub collapsed: bool,
    pub glyph: String,
    pub title: String,
    pub toggle: NodePath,
    pub entries: Vec<PanelEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelEntry {
    /// Path of the entry's link, usable as a click target.
    pub link: NodePath,
    pub anchor_id: String,
    pub level: u8,
    pub label: String,
    pub active: bool,
}

/// Creates and updates the panel nodes. Holds no document state itself, so
/// every call re-resolves the panel by id.
#[derive(Debug, Default)]
pub struct PanelController;

impl PanelController {
    pub fn new() -> Self {
        Self
    }

    pub fn exists(&self, doc: &DomTree) -> bool {
        doc.find_by_id(PANEL_ID).is_some()
    }

    /// Append the panel to `<body>` unless it is already there.
    /// Returns true when it was created by this call.
    pub fn ensure(&self, doc: &mut DomTree) -> bool {
        if self.exists(doc) {
            return false;
        }

        let toggle = DomNode::with_attrs(
            "button",
            &[("id", TOGGLE_ID), ("title", TOGGLE_TOOLTIP)],
            vec![DomNode::text(GLYPH_MENU)],
        );
        let title = DomNode::with_attrs(
            "div",
            &[("class", TITLE_CLASS)],
            vec![DomNode::text(TITLE_TEXT)],
        );
        let list = DomNode::with_attrs("ol", &[("id", LIST_ID)], Vec::new());
        let panel = DomNode::with_attrs("div", &[("id", PANEL_ID)], vec![toggle, title, list]);

        let body = doc.body();
        let created = doc.root.append_child(&body, panel).is_some();
        if created {
            log::info!("panel: created #{}", PANEL_ID);
        }
        created
    }

    /// Replace the list with one entry per item; hide the panel when the
    /// outline is empty.
    pub fn render(&self, doc: &mut DomTree, outline: &Outline) {
        let (Some(panel), Some(list)) = (doc.find_by_id(PANEL_ID), doc.find_by_id(LIST_ID)) else {
            return;
        };

        doc.root.clear_children(&list);

        if let Some(node) = doc.node_mut(&panel) {
            if outline.is_empty() {
                node.set_attr("style", HIDDEN_STYLE);
            } else {
                node.remove_attr("style");
            }
        }

        for item in outline.items() {
            let level = item.level.to_string();
            let href = format!("#{}", item.anchor_id);
            let link = DomNode::with_attrs(
                "a",
                &[("href", href.as_str())],
                vec![DomNode::text(item.label.as_str())],
            );
            let entry = DomNode::with_attrs(
                "li",
                &[(LEVEL_ATTR, level.as_str()), (ANCHOR_ATTR, item.anchor_id.as_str())],
                vec![link],
            );
            doc.root.append_child(&list, entry);
        }
    }

    /// Mark the entry for `anchor_id` active and clear every other entry.
    /// `None` clears them all. Returns whether a matching entry exists.
    pub fn set_active(&self, doc: &mut DomTree, anchor_id: Option<&str>) -> bool {
        let Some(list) = doc.find_by_id(LIST_ID) else {
            return false;
        };
        let Some(list_node) = doc.node_mut(&list) else {
            return false;
        };
        let mut found = false;
        for entry in &mut list_node.children {
            let is_target = anchor_id.is_some() && entry.attr(ANCHOR_ATTR) == anchor_id;
            if is_target {
                entry.add_class(ACTIVE_ITEM_CLASS);
                found = true;
            } else {
                entry.remove_class(ACTIVE_ITEM_CLASS);
            }
        }
        found
    }

    /// Flip the collapsed state and update the glyph. Returns the new state.
    pub fn toggle(&self, doc: &mut DomTree) -> bool {
        let Some(panel) = doc.find_by_id(PANEL_ID) else {
            return false;
        };
        let collapsed = match doc.node_mut(&panel) {
            Some(node) => node.toggle_class(COLLAPSED_CLASS),
            None => return false,
        };
        if let Some(toggle) = doc.find_by_id(TOGGLE_ID) {
            if let Some(node) = doc.node_mut(&toggle) {
                node.children = vec![DomNode::text(if collapsed { GLYPH_MENU } else { GLYPH_CLOSE })];
            }
        }
        collapsed
    }

    pub fn is_hidden(&self, doc: &DomTree) -> bool {
        doc.find_by_id(PANEL_ID)
            .and_then(|p| doc.node(&p))
            .map(|n| n.attr("style") == Some(HIDDEN_STYLE))
            .unwrap_or(true)
    }

    /// Classify a click target inside the panel.
    pub fn hit(&self, doc: &DomTree, target: &NodePath) -> Option<PanelHit> {
        let panel = doc.find_by_id(PANEL_ID)?;
        if !panel.contains(target) {
            return None;
        }
        if let Some(toggle) = doc.find_by_id(TOGGLE_ID) {
            if toggle.contains(target) {
                return Some(PanelHit::Toggle);
            }
        }
        let list = doc.find_by_id(LIST_ID)?;
        if !list.is_ancestor_of(target) {
            return None;
        }
        // Entries are the list's direct children.
        let entry = NodePath::from_indices(target.indices()[..list.depth() + 1].to_vec());
        let anchor_id = doc.node(&entry)?.attr(ANCHOR_ATTR)?.to_string();
        Some(PanelHit::Entry { anchor_id })
    }

    pub fn snapshot(&self, doc: &DomTree) -> Option<PanelView> {
        let panel_path = doc.find_by_id(PANEL_ID)?;
        let panel = doc.node(&panel_path)?;
        let toggle = doc.find_by_id(TOGGLE_ID)?;
        let glyph = doc.node(&toggle).map(|n| n.text_content()).unwrap_or_default();
        let title = panel
            .children
            .iter()
            .find(|c| c.has_class(TITLE_CLASS))
            .map(|c| c.text_content())
            .unwrap_or_default();

        let list = doc.find_by_id(LIST_ID)?;
        let entries = doc
            .node(&list)?
            .children
            .iter()
            .enumerate()
            .map(|(i, entry)| PanelEntry {
                link: list.child(i).child(0),
                anchor_id: entry.attr(ANCHOR_ATTR).unwrap_or_default().to_string(),
                level: entry
                    .attr(LEVEL_ATTR)
                    .and_then(|l| l.parse().ok())
                    .unwrap_or(crate::outline::MIN_LEVEL),
                label: entry.text_content(),
                active: entry.has_class(ACTIVE_ITEM_CLASS),
            })
            .collect();

        Some(PanelView {
            hidden: panel.attr("style") == Some(HIDDEN_STYLE),
            collapsed: panel.has_class(COLLAPSED_CLASS),
            glyph,
            title,
            toggle,
            entries,
        })
    }
}
