//! # Fetch Orchestrator
//!
//! Per-partition state machine that turns filter changes into provider
//! fetches. It never performs I/O: the owning actor feeds it inputs and
//! clock readings, and executes the [`FetchTicket`]s it hands out.
//!
//! - Every input change re-arms a debounce deadline, so a burst of changes
//!   produces a single fetch carrying the last spec.
//! - Every dispatch bumps a generation counter. A response is applied only
//!   if its generation is still the latest one; anything older is stale.

use crate::query::{build_query, FilterState, QuerySpec};
use crate::store::PartitionName;
use std::time::Duration;
use tokio::time::Instant;

/// A fetch to execute, tagged with the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub partition: PartitionName,
    pub generation: u64,
    pub spec: QuerySpec,
}

/// Outcome of a response arriving for some generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// Latest generation: apply the payload and clear `loading`.
    Current,
    /// Superseded by a later dispatch: discard.
    Stale,
}

#[derive(Debug)]
pub struct FetchOrchestrator {
    partition: PartitionName,
    debounce: Duration,
    filters: Option<FilterState>,
    queued: Option<QuerySpec>,
    deadline: Option<Instant>,
    last_dispatched: Option<QuerySpec>,
    generation: u64,
    loading: bool,
}

impl FetchOrchestrator {
    pub fn new(partition: PartitionName, debounce: Duration) -> Self {
        Self {
            partition,
            debounce,
            filters: None,
            queued: None,
            deadline: None,
            last_dispatched: None,
            generation: 0,
            loading: false,
        }
    }

    pub fn partition(&self) -> PartitionName {
        self.partition
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True from dispatch until the latest generation settles.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filters(&self) -> Option<&FilterState> {
        self.filters.as_ref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn last_dispatched(&self) -> Option<&QuerySpec> {
        self.last_dispatched.as_ref()
    }

    /// Records new UI filter state and arms the debounce timer.
    ///
    /// A filter change resets the page to 1. Returns false when the
    /// resulting spec is already queued (or, with nothing queued, was the
    /// last one dispatched), in which case the timer is left alone.
    pub fn publish(&mut self, state: FilterState, now: Instant) -> bool {
        let state = state.rebase(self.filters.as_ref());
        let spec = build_query(&state);
        self.filters = Some(state);

        let unchanged = match &self.queued {
            Some(queued) => *queued == spec,
            None => self.last_dispatched.as_ref() == Some(&spec),
        };
        if unchanged {
            return false;
        }
        self.queued = Some(spec);
        self.deadline = Some(now + self.debounce);
        true
    }

    /// Dispatches the queued spec once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<FetchTicket> {
        match self.deadline {
            Some(deadline) if deadline <= now => self.flush(),
            _ => None,
        }
    }

    /// Dispatches the queued spec without waiting for the deadline.
    pub fn flush(&mut self) -> Option<FetchTicket> {
        self.deadline = None;
        let spec = self.queued.take()?;
        Some(self.dispatch_now(spec))
    }

    /// Replaces the filter state and dispatches immediately, bypassing the
    /// debounce. Used at mount.
    pub fn load(&mut self, state: FilterState) -> FetchTicket {
        let spec = build_query(&state);
        self.filters = Some(state);
        self.deadline = None;
        self.queued = None;
        self.dispatch_now(spec)
    }

    /// Re-issues whatever is queued, else the last dispatched spec, under a
    /// new generation.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        self.deadline = None;
        let spec = self.queued.take().or_else(|| self.last_dispatched.clone())?;
        Some(self.dispatch_now(spec))
    }

    pub fn dispatch_now(&mut self, spec: QuerySpec) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.last_dispatched = Some(spec.clone());
        FetchTicket {
            partition: self.partition,
            generation: self.generation,
            spec,
        }
    }

    pub fn settle(&mut self, generation: u64) -> Settle {
        if generation == self.generation {
            self.loading = false;
            Settle::Current
        } else {
            Settle::Stale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(500);

    fn public(search: &str) -> FilterState {
        FilterState::new(PartitionName::Public, 10).with_search(search)
    }

    #[test]
    fn burst_produces_one_fetch_with_last_spec() {
        let start = Instant::now();
        let mut orchestrator = FetchOrchestrator::new(PartitionName::Public, DEBOUNCE);

        for (i, text) in ["p", "pc", "pcr"].iter().enumerate() {
            let at = start + Duration::from_millis(100 * i as u64);
            assert!(orchestrator.publish(public(text), at));
            assert_eq!(orchestrator.poll(at), None);
        }

        let last_input = start + Duration::from_millis(200);
        assert_eq!(orchestrator.poll(last_input + Duration::from_millis(499)), None);
        let ticket = orchestrator.poll(last_input + DEBOUNCE).unwrap();
        assert_eq!(ticket.spec.search.as_deref(), Some("pcr"));
        assert_eq!(ticket.generation, 1);
        assert_eq!(orchestrator.poll(last_input + DEBOUNCE * 2), None);
    }

    #[test]
    fn only_the_latest_generation_settles_current() {
        let mut orchestrator = FetchOrchestrator::new(PartitionName::Public, DEBOUNCE);
        let first = orchestrator.load(public(""));
        let second = orchestrator.dispatch_now(build_query(&public("x")));

        assert_eq!(orchestrator.settle(second.generation), Settle::Current);
        assert!(!orchestrator.is_loading());
        assert_eq!(orchestrator.settle(first.generation), Settle::Stale);
    }

    #[test]
    fn stale_settle_keeps_loading() {
        let mut orchestrator = FetchOrchestrator::new(PartitionName::Mine, DEBOUNCE);
        let first = orchestrator.load(FilterState::new(PartitionName::Mine, 10));
        orchestrator.refresh().unwrap();
        assert_eq!(orchestrator.settle(first.generation), Settle::Stale);
        assert!(orchestrator.is_loading());
    }

    #[test]
    fn republishing_the_dispatched_spec_is_ignored() {
        let now = Instant::now();
        let mut orchestrator = FetchOrchestrator::new(PartitionName::Public, DEBOUNCE);
        orchestrator.load(public("pcr"));
        assert!(!orchestrator.publish(public("  pcr "), now));
        assert_eq!(orchestrator.deadline(), None);
    }

    #[test]
    fn filter_change_resets_page() {
        let now = Instant::now();
        let mut orchestrator = FetchOrchestrator::new(PartitionName::Public, DEBOUNCE);
        orchestrator.load(public(""));
        orchestrator.publish(public("").with_page(3), now);
        assert_eq!(orchestrator.filters().unwrap().page, 3);

        orchestrator.publish(public("pcr").with_page(3), now);
        assert_eq!(orchestrator.filters().unwrap().page, 1);
        let ticket = orchestrator.flush().unwrap();
        assert_eq!(ticket.spec.page, 1);
    }

    #[test]
    fn refresh_reissues_last_spec_under_new_generation() {
        let mut orchestrator = FetchOrchestrator::new(PartitionName::Public, DEBOUNCE);
        assert_eq!(orchestrator.refresh(), None);
        let first = orchestrator.load(public("gel"));
        let again = orchestrator.refresh().unwrap();
        assert_eq!(again.spec, first.spec);
        assert_eq!(again.generation, first.generation + 1);
    }
}
