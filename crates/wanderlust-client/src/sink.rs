//! The rendered listing grid.
//!
//! Items are appended as pages arrive and never removed; filtering only
//! flips their visibility. Hiding may be animated, in which case an item sits
//! in [`Visibility::Hiding`] until the presentation layer reports the exit
//! finished. Appended items are not shown before the next reconcile, so
//! those that do not match go straight to [`Visibility::Hidden`].

use std::collections::HashSet;

use wanderlust_core::{ListingId, ListingSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    /// Targeted hidden, exit animation still running.
    Hiding,
    Hidden,
}

#[derive(Debug, Clone)]
pub struct RenderedListing {
    pub summary: ListingSummary,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default)]
pub struct RenderSink {
    entries: Vec<RenderedListing>,
    ids: HashSet<ListingId>,
    /// Index of the first entry appended since the last reconcile.
    unreconciled_from: usize,
    exit_animation: bool,
}

impl RenderSink {
    /// `exit_animation` selects whether hiding goes through
    /// [`Visibility::Hiding`] or completes immediately.
    #[must_use]
    pub fn new(exit_animation: bool) -> Self {
        Self {
            exit_animation,
            ..Self::default()
        }
    }

    /// Appends items in order, skipping ids that are already rendered.
    /// New items start visible until the next reconcile decides. Returns how
    /// many were appended.
    pub fn append<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = ListingSummary>,
    {
        let before = self.entries.len();
        for summary in items {
            if self.ids.insert(summary.id) {
                self.entries.push(RenderedListing {
                    summary,
                    visibility: Visibility::Visible,
                });
            } else {
                tracing::debug!(id = %summary.id, "skipping duplicate listing");
            }
        }
        self.entries.len() - before
    }

    /// Targets every item visible iff its id is in `matching`.
    pub fn reconcile(&mut self, matching: &HashSet<ListingId>) {
        let hidden_state = if self.exit_animation {
            Visibility::Hiding
        } else {
            Visibility::Hidden
        };
        let unreconciled_from = self.unreconciled_from;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            let target_visible = matching.contains(&entry.summary.id);
            let never_shown = index >= unreconciled_from;
            entry.visibility = match (entry.visibility, target_visible) {
                (_, true) => Visibility::Visible,
                (_, false) if never_shown => Visibility::Hidden,
                (Visibility::Visible, false) => hidden_state,
                (current, false) => current,
            };
        }
        self.unreconciled_from = self.entries.len();
    }

    /// Completes the exit of one item. Returns false if it was not hiding.
    pub fn finish_exit(&mut self, id: ListingId) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.summary.id == id)
        {
            Some(entry) if entry.visibility == Visibility::Hiding => {
                entry.visibility = Visibility::Hidden;
                true
            }
            _ => false,
        }
    }

    /// Completes every pending exit. Returns how many finished.
    pub fn finish_exits(&mut self) -> usize {
        let mut finished = 0;
        for entry in &mut self.entries {
            if entry.visibility == Visibility::Hiding {
                entry.visibility = Visibility::Hidden;
                finished += 1;
            }
        }
        finished
    }

    #[must_use]
    pub fn visibility(&self, id: ListingId) -> Option<Visibility> {
        self.entries
            .iter()
            .find(|entry| entry.summary.id == id)
            .map(|entry| entry.visibility)
    }

    /// Number of items currently targeted visible.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.visibility == Visibility::Visible)
            .count()
    }

    #[must_use]
    pub fn results_label(&self) -> String {
        results_label(self.visible_count())
    }

    pub fn listings(&self) -> impl Iterator<Item = &ListingSummary> {
        self.entries.iter().map(|entry| &entry.summary)
    }

    #[must_use]
    pub fn entries(&self) -> &[RenderedListing] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `"N listing(s) found"` text shown above the grid.
#[must_use]
pub fn results_label(count: usize) -> String {
    if count == 1 {
        "1 listing found".to_string()
    } else {
        format!("{count} listings found")
    }
}
