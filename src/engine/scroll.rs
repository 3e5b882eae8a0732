//! Viewport tracking for outline anchors.
//!
//! An anchor counts as "entered" while its vertical span overlaps a band
//! that starts 20px below the top of the viewport and ends 60% of the
//! viewport height above its bottom (root margin `-20px 0px -60% 0px`,
//! threshold 0). Hosts with native intersection signalling forward their
//! entries; others call [`ScrollTracker::sample`] once per frame.

use std::collections::HashMap;

/// Identity of one scroll subscription. A new one is issued per rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Scroll position and size of the document viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_top: f32,
    pub height: f32,
}

/// Vertical extent of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f32,
    pub bottom: f32,
}

impl Span {
    pub fn new(top: f32, height: f32) -> Self {
        Self {
            top,
            bottom: top + height.max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionBand {
    /// Pixels trimmed from the top of the viewport.
    pub top_inset: f32,
    /// Fraction of the viewport height trimmed from the bottom.
    pub bottom_inset_ratio: f32,
}

impl Default for IntersectionBand {
    fn default() -> Self {
        Self {
            top_inset: 20.0,
            bottom_inset_ratio: 0.6,
        }
    }
}

impl IntersectionBand {
    /// `(top, bottom)` of the band in document coordinates.
    pub fn zone(&self, viewport: Viewport) -> (f32, f32) {
        let top = viewport.scroll_top + self.top_inset;
        let bottom = viewport.scroll_top + viewport.height - viewport.height * self.bottom_inset_ratio;
        (top, bottom)
    }

    /// Edge contact counts, as with a zero threshold.
    pub fn intersects(&self, viewport: Viewport, span: Span) -> bool {
        let (top, bottom) = self.zone(viewport);
        top <= bottom && span.top <= bottom && span.bottom >= top
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub anchor_id: String,
    pub is_intersecting: bool,
}

/// One live observation of the current outline's anchors.
#[derive(Debug)]
pub struct ScrollTracker {
    id: SubscriptionId,
    band: IntersectionBand,
    targets: Vec<String>,
    last: HashMap<String, bool>,
    primed: bool,
    connected: bool,
}

impl ScrollTracker {
    pub fn new(id: SubscriptionId, band: IntersectionBand, targets: Vec<String>) -> Self {
        Self {
            id,
            band,
            targets,
            last: HashMap::new(),
            primed: false,
            connected: true,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn band(&self) -> IntersectionBand {
        self.band
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether entries tagged with `subscription` may still act on the panel.
    pub fn accepts(&self, subscription: SubscriptionId) -> bool {
        self.connected && self.id == subscription
    }

    /// Stop observing. Later samples report nothing.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.targets.clear();
        self.last.clear();
    }

    /// Emulate observer delivery for hosts that only know element geometry.
    ///
    /// The first sample reports every target that has a layout; later
    /// samples report only targets whose state changed. Targets without a
    /// layout are left out.
    pub fn sample(
        &mut self,
        viewport: Viewport,
        layout: &dyn Fn(&str) -> Option<Span>,
    ) -> Vec<IntersectionEntry> {
        if !self.connected {
            return Vec::new();
        }
        let mut entries = Vec::new();
        for anchor_id in &self.targets {
            let Some(span) = layout(anchor_id) else {
                continue;
            };
            let now = self.band.intersects(viewport, span);
            let before = self.last.insert(anchor_id.clone(), now);
            if !self.primed || before != Some(now) {
                entries.push(IntersectionEntry {
                    anchor_id: anchor_id.clone(),
                    is_intersecting: now,
                });
            }
        }
        self.primed = true;
        entries
    }
}
