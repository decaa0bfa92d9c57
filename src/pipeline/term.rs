//! Active term selection.
//!
//! Several reporting terms overlap at any given time (quarter, semester,
//! year, progress periods). Only quarter terms, identified by their title
//! prefix, decide which final grades and assignments are in scope.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::ReportingTerm;

/// Active quarter terms and the date range they cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermWindow {
    /// Ids of the currently active terms
    pub active_terms: HashSet<i64>,
    /// Earliest start over active terms
    pub begin: DateTime<Utc>,
    /// Latest end over active terms
    pub end: DateTime<Utc>,
}

impl TermWindow {
    /// Window containing no instant at all.
    ///
    /// The bounds are inverted, so `contains` is false for every date.
    pub fn empty() -> Self {
        Self {
            active_terms: HashSet::new(),
            begin: DateTime::<Utc>::MAX_UTC,
            end: DateTime::<Utc>::MIN_UTC,
        }
    }

    /// Select terms active at `now` whose title starts with `prefix`.
    ///
    /// Activity is strict on both ends (`start < now < end`). The window is
    /// the union of all active terms, not the first match.
    pub fn select(terms: &[ReportingTerm], now: DateTime<Utc>, prefix: &str) -> Self {
        let mut window = Self::empty();

        for term in terms {
            let active =
                now > term.start_date && now < term.end_date && term.title.starts_with(prefix);
            if !active {
                continue;
            }

            window.active_terms.insert(term.id);
            if term.start_date < window.begin {
                window.begin = term.start_date;
            }
            if term.end_date > window.end {
                window.end = term.end_date;
            }
        }

        window
    }

    /// Whether `term_id` is one of the active terms.
    pub fn is_active(&self, term_id: i64) -> bool {
        self.active_terms.contains(&term_id)
    }

    /// Whether `at` lies strictly inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.begin < at && at < self.end
    }

    /// No quarter term is active.
    pub fn is_empty(&self) -> bool {
        self.active_terms.is_empty()
    }
}
