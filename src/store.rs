//! Single-owner local cache of the remote challenge collection.
//!
//! This module owns:
//!   - the full collection as last fetched (and locally mutated)
//!   - the derived filtered view and the filter that produced it
//!   - reference data (difficulties, states, categories)
//!
//! The filtered view is never edited on its own: every mutation goes through the
//! full collection and the view is recomputed from it.

use tracing::{debug, instrument};

use crate::domain::{Challenge, ReferenceData, State};
use crate::filter::LocalFilter;

#[derive(Clone, Debug, Default)]
pub struct ChallengeStore {
    all: Vec<Challenge>,
    filtered: Vec<Challenge>,
    filter: LocalFilter,
    pub reference: ReferenceData,
}

impl ChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Challenge] {
        &self.all
    }

    /// What the view shows: the filtered subset of the full collection.
    pub fn visible(&self) -> &[Challenge] {
        &self.filtered
    }

    pub fn filter(&self) -> &LocalFilter {
        &self.filter
    }

    pub fn get(&self, id: i64) -> Option<&Challenge> {
        self.all.iter().find(|c| c.id == id)
    }

    /// Replace the full collection with a fresh server snapshot and re-apply the current filter.
    #[instrument(level = "debug", skip(self, list), fields(count = list.len()))]
    pub fn replace_all(&mut self, list: Vec<Challenge>) {
        self.all = list;
        self.refresh();
    }

    pub fn set_filter(&mut self, filter: LocalFilter) {
        self.filter = filter;
        self.refresh();
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(LocalFilter::default());
    }

    /// Drop a challenge from the collection (and therefore from the view).
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: i64) -> Option<Challenge> {
        let pos = self.all.iter().position(|c| c.id == id)?;
        let removed = self.all.remove(pos);
        self.refresh();
        Some(removed)
    }

    /// Overwrite the state of one challenge. Returns the previous state, or None if
    /// the id is not cached.
    #[instrument(level = "debug", skip(self, state), fields(state_id = state.id))]
    pub fn set_state(&mut self, id: i64, state: State) -> Option<State> {
        let entry = self.all.iter_mut().find(|c| c.id == id)?;
        let previous = std::mem::replace(&mut entry.state, state);
        self.refresh();
        Some(previous)
    }

    fn refresh(&mut self) {
        self.filtered = self.filter.apply(&self.all);
        debug!(target: "reto", total = self.all.len(), visible = self.filtered.len(), "View recomputed");
    }
}
