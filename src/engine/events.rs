//! Messages between the host page and the controller.
//!
//! The host turns its callbacks (document ready, clicks, mutation batches,
//! intersection batches, timer expiry) into [`HostEvent`]s; the controller
//! answers with [`Effect`]s the host carries out.

use std::time::Instant;

use crate::dom::NodePath;
use crate::engine::scroll::{IntersectionBand, IntersectionEntry, SubscriptionId};

/// Loading phase of the host document when the controller is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes { name: String },
    CharacterData,
}

/// One observed change in the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodePath,
    pub kind: MutationKind,
}

impl MutationRecord {
    pub fn child_list(target: NodePath) -> Self {
        Self {
            target,
            kind: MutationKind::ChildList,
        }
    }

    pub fn attribute(target: NodePath, name: &str) -> Self {
        Self {
            target,
            kind: MutationKind::Attributes {
                name: name.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The document finished parsing.
    DomContentLoaded,
    /// A pointer click landed on `target`.
    PointerClick { target: NodePath },
    /// A batch of document mutations.
    Mutations(Vec<MutationRecord>),
    /// Intersection changes reported for a scroll subscription.
    Intersection {
        subscription: SubscriptionId,
        entries: Vec<IntersectionEntry>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Work for the host to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Scroll the main document until the anchor is in view.
    ScrollIntoView {
        anchor_id: String,
        behavior: ScrollBehavior,
    },
    /// Scroll the panel's own list (not the document) so the entry for
    /// `anchor_id` is visible, moving as little as possible.
    RevealInPanel {
        anchor_id: String,
        behavior: ScrollBehavior,
    },
    /// Start reporting intersection changes for `anchors`.
    Observe {
        subscription: SubscriptionId,
        anchors: Vec<String>,
        band: IntersectionBand,
    },
    /// Stop reporting for `subscription`.
    Disconnect { subscription: SubscriptionId },
    /// Call `poll` again no earlier than this.
    WakeAt(Instant),
}
