//! `TocController` owns the panel, the scroll subscription and the change
//! watcher, and is the only thing that mutates outline state.
//!
//! Every rebuild runs in a fixed order:
//!
//! 1. disconnect the previous scroll subscription
//! 2. create the panel if it is missing
//! 3. locate the article and run the extraction cascade
//! 4. render the outline (or hide the panel)
//! 5. observe the new anchors
//!
//! so no intersection entry from an older outline can reach the panel.

use std::time::Instant;

use crate::config::OutlineConfig;
use crate::dom::DomTree;
use crate::engine::events::{Effect, HostEvent, ReadyState, ScrollBehavior};
use crate::engine::scroll::{IntersectionEntry, ScrollTracker, SubscriptionId};
use crate::engine::watcher::ChangeWatcher;
use crate::outline::cascade::extract_outline;
use crate::outline::locator::locate_article;
use crate::outline::Outline;
use crate::panel::{PanelController, PanelHit};

pub struct TocController {
    config: OutlineConfig,
    panel: PanelController,
    watcher: ChangeWatcher,
    tracker: Option<ScrollTracker>,
    next_subscription: u64,
    outline: Outline,
    active: Option<String>,
    started: bool,
    waiting_for_ready: bool,
    rebuilds: u64,
}

impl Default for TocController {
    fn default() -> Self {
        Self::new(OutlineConfig::default())
    }
}

impl TocController {
    pub fn new(config: OutlineConfig) -> Self {
        let watcher = ChangeWatcher::new(config.debounce);
        Self {
            config,
            panel: PanelController::new(),
            watcher,
            tracker: None,
            next_subscription: 0,
            outline: Outline::empty(),
            active: None,
            started: false,
            waiting_for_ready: false,
            rebuilds: 0,
        }
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    pub fn panel(&self) -> &PanelController {
        &self.panel
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn tracker(&self) -> Option<&ScrollTracker> {
        self.tracker.as_ref()
    }

    /// For hosts that emulate intersection delivery via `ScrollTracker::sample`.
    pub fn tracker_mut(&mut self) -> Option<&mut ScrollTracker> {
        self.tracker.as_mut()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Pending rebuild deadline, if a trigger is waiting out the debounce.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.watcher.deadline()
    }

    /// Activation hook: initialize now, or once the document has loaded.
    pub fn start(&mut self, doc: &mut DomTree, ready: ReadyState) -> Vec<Effect> {
        if self.started {
            return Vec::new();
        }
        if ready == ReadyState::Loading {
            self.waiting_for_ready = true;
            return Vec::new();
        }
        self.init(doc)
    }

    fn init(&mut self, doc: &mut DomTree) -> Vec<Effect> {
        self.waiting_for_ready = false;
        self.panel.ensure(doc);
        let effects = self.rebuild(doc);
        self.watcher.attach(doc);
        self.started = true;
        effects
    }

    /// Deliver one host event.
    pub fn handle(&mut self, doc: &mut DomTree, event: HostEvent, now: Instant) -> Vec<Effect> {
        if !self.started {
            if event == HostEvent::DomContentLoaded && self.waiting_for_ready {
                return self.init(doc);
            }
            return Vec::new();
        }

        match event {
            HostEvent::DomContentLoaded => Vec::new(),
            HostEvent::PointerClick { target } => {
                match self.panel.hit(doc, &target) {
                    Some(PanelHit::Toggle) => {
                        self.panel.toggle(doc);
                        return Vec::new();
                    }
                    Some(PanelHit::Entry { anchor_id }) => {
                        return vec![Effect::ScrollIntoView {
                            anchor_id,
                            behavior: ScrollBehavior::Smooth,
                        }];
                    }
                    None => {}
                }
                self.watcher
                    .on_click(doc, &target, now)
                    .map(|deadline| vec![Effect::WakeAt(deadline)])
                    .unwrap_or_default()
            }
            HostEvent::Mutations(records) => self
                .watcher
                .on_mutations(doc, &records, now)
                .map(|deadline| vec![Effect::WakeAt(deadline)])
                .unwrap_or_default(),
            HostEvent::Intersection {
                subscription,
                entries,
            } => self.on_intersection(doc, subscription, entries),
        }
    }

    /// Run a rebuild if the debounce deadline has passed.
    pub fn poll(&mut self, doc: &mut DomTree, now: Instant) -> Vec<Effect> {
        if self.started && self.watcher.poll(now) {
            return self.rebuild(doc);
        }
        Vec::new()
    }

    /// Recompute the outline and re-attach scroll tracking.
    pub fn rebuild(&mut self, doc: &mut DomTree) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Some(mut old) = self.tracker.take() {
            old.disconnect();
            effects.push(Effect::Disconnect {
                subscription: old.id(),
            });
        }
        self.active = None;

        self.panel.ensure(doc);

        let outline = match locate_article(&*doc) {
            Some(root) => extract_outline(doc, &root, &self.config),
            None => {
                log::debug!("rebuild: no article content");
                Outline::empty()
            }
        };

        self.panel.render(doc, &outline);

        if !outline.is_empty() {
            self.next_subscription += 1;
            let id = SubscriptionId(self.next_subscription);
            let anchors = outline.anchor_ids();
            effects.push(Effect::Observe {
                subscription: id,
                anchors: anchors.clone(),
                band: self.config.band,
            });
            self.tracker = Some(ScrollTracker::new(id, self.config.band, anchors));
        }

        self.rebuilds += 1;
        log::debug!(
            "rebuild #{}: {} items ({})",
            self.rebuilds,
            outline.len(),
            outline.strategy().map(|s| s.name()).unwrap_or("none")
        );
        self.outline = outline;
        effects
    }

    fn on_intersection(
        &mut self,
        doc: &mut DomTree,
        subscription: SubscriptionId,
        entries: Vec<IntersectionEntry>,
    ) -> Vec<Effect> {
        let live = self
            .tracker
            .as_ref()
            .map(|t| t.accepts(subscription))
            .unwrap_or(false);
        if !live {
            log::debug!("dropping {} entries from stale {:?}", entries.len(), subscription);
            return Vec::new();
        }

        let mut effects = Vec::new();
        for entry in entries.into_iter().filter(|e| e.is_intersecting) {
            effects.extend(self.activate(doc, &entry.anchor_id));
        }
        effects
    }

    /// Make `anchor_id` the single active item and keep its entry visible
    /// in the panel. Unknown ids are ignored.
    pub fn activate(&mut self, doc: &mut DomTree, anchor_id: &str) -> Vec<Effect> {
        if self.outline.get(anchor_id).is_none() {
            return Vec::new();
        }
        self.panel.set_active(doc, Some(anchor_id));
        self.active = Some(anchor_id.to_string());
        vec![Effect::RevealInPanel {
            anchor_id: anchor_id.to_string(),
            behavior: ScrollBehavior::Smooth,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::{parse_fragment, parse_html};
    use crate::dom::shell::{expand_entry, flux_entries, reading_view, stream_view, ArticleSource};
    use crate::engine::events::MutationRecord;
    use crate::engine::scroll::{Span, Viewport};
    use std::time::Duration;

    fn source(html: &str) -> ArticleSource {
        ArticleSource {
            title: "t".into(),
            url: String::new(),
            body: parse_fragment(html),
        }
    }

    fn started(doc: &mut DomTree) -> (TocController, Vec<Effect>) {
        let mut c = TocController::default();
        let effects = c.start(doc, ReadyState::Complete);
        (c, effects)
    }

    fn subscription(c: &TocController) -> SubscriptionId {
        c.tracker().expect("live tracker").id()
    }

    fn entry(id: &str, on: bool) -> IntersectionEntry {
        IntersectionEntry {
            anchor_id: id.to_string(),
            is_intersecting: on,
        }
    }

    #[test]
    fn headings_end_to_end() {
        let mut doc = reading_view(source("<h1>Intro</h1><p>a</p><h3>Sub A</h3><p>b</p><h1>Next</h1>"));
        let (c, effects) = started(&mut doc);

        assert_eq!(c.outline().len(), 3);
        assert_eq!(c.outline().levels(), vec![2, 4, 2]);
        let view = c.panel().snapshot(&doc).unwrap();
        assert!(!view.hidden);
        let labels: Vec<&str> = view.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Intro", "Sub A", "Next"]);
        assert!(matches!(effects.as_slice(), [Effect::Observe { anchors, .. }] if anchors.len() == 3));
    }

    #[test]
    fn single_heading_hides_panel() {
        let mut doc = reading_view(source("<h2>Lonely</h2><p>Just prose here.</p><p>More prose.</p>"));
        let (c, effects) = started(&mut doc);
        assert!(c.outline().is_empty());
        assert!(c.panel().is_hidden(&doc));
        assert!(c.tracker().is_none());
        assert!(effects.is_empty());
    }

    #[test]
    fn missing_article_hides_panel() {
        let mut doc = parse_html("<html><body><p>1. a</p><p>2. b</p></body></html>", "");
        let (c, _) = started(&mut doc);
        assert!(c.panel().exists(&doc));
        assert!(c.panel().is_hidden(&doc));
    }

    #[test]
    fn numbered_fallback_end_to_end() {
        let mut doc = reading_view(source("<p>第一章 起</p><p>正文。</p><p>第二章 承</p><p>第1节 细</p>"));
        let (c, _) = started(&mut doc);
        assert_eq!(c.outline().levels(), vec![2, 2, 3]);
    }

    #[test]
    fn loading_document_waits_for_ready_event() {
        let mut doc = reading_view(source("<h2>A</h2><h2>B</h2>"));
        let mut c = TocController::default();
        assert!(c.start(&mut doc, ReadyState::Loading).is_empty());
        assert!(!c.is_started());
        assert!(!c.panel().exists(&doc));

        let effects = c.handle(&mut doc, HostEvent::DomContentLoaded, Instant::now());
        assert!(c.is_started());
        assert_eq!(c.outline().len(), 2);
        assert_eq!(effects.len(), 1);
        assert!(c.start(&mut doc, ReadyState::Complete).is_empty());
    }

    #[test]
    fn intersection_activates_exactly_one_item() {
        let mut doc = reading_view(source("<h2>A</h2><h2>B</h2><h2>C</h2><h2>D</h2>"));
        let (mut c, _) = started(&mut doc);
        let sub = subscription(&c);
        let ids = c.outline().anchor_ids();

        for (k, id) in ids.iter().enumerate() {
            let effects = c.handle(
                &mut doc,
                HostEvent::Intersection {
                    subscription: sub,
                    entries: vec![entry(id, true)],
                },
                Instant::now(),
            );
            assert_eq!(
                effects,
                vec![Effect::RevealInPanel {
                    anchor_id: id.clone(),
                    behavior: ScrollBehavior::Smooth
                }]
            );
            let active: Vec<bool> = c
                .panel()
                .snapshot(&doc)
                .unwrap()
                .entries
                .iter()
                .map(|e| e.active)
                .collect();
            let expected: Vec<bool> = (0..ids.len()).map(|i| i == k).collect();
            assert_eq!(active, expected);
            assert_eq!(c.active(), Some(id.as_str()));
        }
    }

    #[test]
    fn leaving_entries_do_not_activate() {
        let mut doc = reading_view(source("<h2>A</h2><h2>B</h2>"));
        let (mut c, _) = started(&mut doc);
        let sub = subscription(&c);
        let ids = c.outline().anchor_ids();
        let effects = c.handle(
            &mut doc,
            HostEvent::Intersection {
                subscription: sub,
                entries: vec![entry(&ids[0], false)],
            },
            Instant::now(),
        );
        assert!(effects.is_empty());
        assert_eq!(c.active(), None);
    }

    #[test]
    fn stale_subscription_cannot_touch_panel() {
        let mut doc = reading_view(source("<h2>A</h2><h2>B</h2>"));
        let (mut c, _) = started(&mut doc);
        let old = subscription(&c);
        let ids = c.outline().anchor_ids();

        let effects = c.rebuild(&mut doc);
        assert_eq!(effects[0], Effect::Disconnect { subscription: old });
        assert!(matches!(effects[1], Effect::Observe { subscription, .. } if subscription != old));

        let effects = c.handle(
            &mut doc,
            HostEvent::Intersection {
                subscription: old,
                entries: vec![entry(&ids[1], true)],
            },
            Instant::now(),
        );
        assert!(effects.is_empty());
        assert!(c.panel().snapshot(&doc).unwrap().entries.iter().all(|e| !e.active));
    }

    #[test]
    fn entry_click_scrolls_smoothly_without_rebuild() {
        let mut doc = reading_view(source("<h2>A</h2><h2>B</h2>"));
        let (mut c, _) = started(&mut doc);
        let view = c.panel().snapshot(&doc).unwrap();
        let now = Instant::now();

        let effects = c.handle(
            &mut doc,
            HostEvent::PointerClick {
                target: view.entries[1].link.clone(),
            },
            now,
        );
        assert_eq!(
            effects,
            vec![Effect::ScrollIntoView {
                anchor_id: view.entries[1].anchor_id.clone(),
                behavior: ScrollBehavior::Smooth
            }]
        );
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn toggle_click_is_presentational() {
        let mut doc = reading_view(source("<h2>A</h2><h2>B</h2>"));
        let (mut c, _) = started(&mut doc);
        let toggle = c.panel().snapshot(&doc).unwrap().toggle;
        let before = c.outline().clone();

        let effects = c.handle(&mut doc, HostEvent::PointerClick { target: toggle }, Instant::now());
        assert!(effects.is_empty());
        assert!(c.panel().snapshot(&doc).unwrap().collapsed);
        assert_eq!(c.outline(), &before);
        assert_eq!(c.rebuild_count(), 1);
    }

    #[test]
    fn mutation_burst_rebuilds_once_after_quiet_period() {
        let mut doc = stream_view(vec![
            source("<h2>A</h2><h2>B</h2>"),
            source("<h2>X</h2><h3>Y</h3><h3>Z</h3>"),
        ]);
        let (mut c, _) = started(&mut doc);
        assert_eq!(c.outline().len(), 2);
        let entries = flux_entries(&doc);
        let t0 = Instant::now();

        let changed = expand_entry(&mut doc, &entries[1]);
        for i in 0..5u64 {
            let records = changed
                .iter()
                .map(|p| MutationRecord::attribute(p.clone(), "class"))
                .collect();
            let effects = c.handle(&mut doc, HostEvent::Mutations(records), t0 + Duration::from_millis(i * 25));
            assert_eq!(
                effects,
                vec![Effect::WakeAt(t0 + Duration::from_millis(i * 25 + 250))]
            );
        }

        let mut rebuilds = 0;
        for step in 0..=100u64 {
            let now = t0 + Duration::from_millis(step * 5);
            if !c.poll(&mut doc, now).is_empty() {
                rebuilds += 1;
                assert_eq!(now, t0 + Duration::from_millis(350));
            }
        }
        assert_eq!(rebuilds, 1);
        assert_eq!(c.rebuild_count(), 2);
        assert_eq!(c.outline().levels(), vec![2, 3, 3]);
    }

    #[test]
    fn header_click_schedules_rebuild() {
        let mut doc = stream_view(vec![source("<h2>A</h2><h2>B</h2>"), source("<p>x</p>")]);
        let (mut c, _) = started(&mut doc);
        let header = flux_entries(&doc)[1].child(0).child(0);
        let t0 = Instant::now();
        let effects = c.handle(&mut doc, HostEvent::PointerClick { target: header }, t0);
        assert_eq!(effects, vec![Effect::WakeAt(t0 + Duration::from_millis(250))]);

        let second = flux_entries(&doc)[1].clone();
        expand_entry(&mut doc, &second);
        let effects = c.poll(&mut doc, t0 + Duration::from_millis(250));
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], Effect::Disconnect { .. }));
        assert!(c.outline().is_empty());
        assert!(c.panel().is_hidden(&doc));
    }

    #[test]
    fn rebuild_creates_missing_panel_first() {
        let mut doc = reading_view(source("<h2>A</h2><h2>B</h2>"));
        let mut c = TocController::default();
        assert!(!c.panel().exists(&doc));

        let effects = c.rebuild(&mut doc);
        assert!(c.panel().exists(&doc));
        assert!(!c.panel().is_hidden(&doc));
        assert_eq!(c.panel().snapshot(&doc).unwrap().entries.len(), 2);
        assert!(matches!(effects.as_slice(), [Effect::Observe { .. }]));
    }

    #[test]
    fn panel_is_created_once_across_rebuilds() {
        let mut doc = reading_view(source("<h2>A</h2><h2>B</h2>"));
        let (mut c, _) = started(&mut doc);
        c.rebuild(&mut doc);
        c.rebuild(&mut doc);
        let body = doc.body();
        let panels = doc
            .node(&body)
            .unwrap()
            .children
            .iter()
            .filter(|n| n.attr("id") == Some(crate::panel::PANEL_ID))
            .count();
        assert_eq!(panels, 1);
    }

    #[test]
    fn sampled_scrolling_drives_activation() {
        let mut doc = reading_view(source("<h2>A</h2><h2>B</h2><h2>C</h2>"));
        let (mut c, _) = started(&mut doc);
        let ids = c.outline().anchor_ids();
        let positions: Vec<(String, Span)> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), Span::new(i as f32 * 1000.0 + 100.0, 30.0)))
            .collect();
        let layout = |id: &str| positions.iter().find(|(a, _)| a == id).map(|(_, s)| *s);

        let sample = |c: &mut TocController, doc: &mut DomTree, top: f32| {
            let tracker = c.tracker_mut().unwrap();
            let sub = tracker.id();
            let entries = tracker.sample(Viewport { scroll_top: top, height: 800.0 }, &layout);
            c.handle(doc, HostEvent::Intersection { subscription: sub, entries }, Instant::now());
        };

        sample(&mut c, &mut doc, 0.0);
        assert_eq!(c.active(), Some(ids[0].as_str()));
        sample(&mut c, &mut doc, 2000.0);
        assert_eq!(c.active(), Some(ids[2].as_str()));
        sample(&mut c, &mut doc, 1000.0);
        assert_eq!(c.active(), Some(ids[1].as_str()));
    }
}
