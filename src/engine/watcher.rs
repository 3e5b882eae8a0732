//! Article-change detection with a single debounced rebuild timer.

use std::time::{Duration, Instant};

use crate::dom::shell::{FLUX_CLASS, FLUX_HEADER_CLASS, STREAM_ID};
use crate::dom::{DomTree, NodePath};
use crate::engine::events::{MutationKind, MutationRecord};
use crate::outline::locator::closest_with_class;

/// Only class changes among attribute mutations signal an article switch.
const WATCHED_ATTRIBUTE: &str = "class";

/// Last-trigger-wins timer: a new trigger replaces the pending deadline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending deadline and start a new one from `now`.
    pub fn trigger(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.deadline = Some(deadline);
        deadline
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// What caused a rebuild to be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A click on an article entry or its header.
    Pointer,
    /// A relevant change under the article stream.
    Mutation,
}

#[derive(Debug, Clone)]
pub struct ChangeWatcher {
    debouncer: Debouncer,
    observing_stream: bool,
}

impl ChangeWatcher {
    pub fn new(delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            observing_stream: false,
        }
    }

    /// Start listening. Mutation watching needs the stream container to
    /// exist now; click watching is always on.
    pub fn attach(&mut self, doc: &DomTree) {
        self.observing_stream = doc.find_by_id(STREAM_ID).is_some();
        if !self.observing_stream {
            log::debug!("watcher: no #{} container, mutation trigger disabled", STREAM_ID);
        }
    }

    pub fn observing_stream(&self) -> bool {
        self.observing_stream
    }

    /// Click inside an article entry or its header.
    pub fn is_structural(&self, doc: &DomTree, target: &NodePath) -> bool {
        closest_with_class(doc, target, &[FLUX_CLASS, FLUX_HEADER_CLASS]).is_some()
    }

    /// Child-list or class change at or below the stream container.
    pub fn is_mutational(&self, doc: &DomTree, record: &MutationRecord) -> bool {
        if !self.observing_stream {
            return false;
        }
        let relevant = match &record.kind {
            MutationKind::ChildList => true,
            MutationKind::Attributes { name } => name == WATCHED_ATTRIBUTE,
            MutationKind::CharacterData => false,
        };
        relevant
            && doc
                .find_by_id(STREAM_ID)
                .map(|stream| stream.contains(&record.target))
                .unwrap_or(false)
    }

    /// Schedule a rebuild. Returns the new deadline.
    pub fn schedule(&mut self, trigger: Trigger, now: Instant) -> Instant {
        let deadline = self.debouncer.trigger(now);
        log::debug!("watcher: {:?} trigger, rebuild in {:?}", trigger, self.debouncer.delay());
        deadline
    }

    pub fn on_click(&mut self, doc: &DomTree, target: &NodePath, now: Instant) -> Option<Instant> {
        self.is_structural(doc, target)
            .then(|| self.schedule(Trigger::Pointer, now))
    }

    /// A mutation batch schedules at most once.
    pub fn on_mutations(
        &mut self,
        doc: &DomTree,
        records: &[MutationRecord],
        now: Instant,
    ) -> Option<Instant> {
        records
            .iter()
            .any(|r| self.is_mutational(doc, r))
            .then(|| self.schedule(Trigger::Mutation, now))
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// True when a scheduled rebuild is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.debouncer.poll(now)
    }
}
