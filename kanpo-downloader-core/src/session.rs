//! # session: the selected year and its listing
//!
//! A [`ListingSession`] owns the single `(year, listing, loading, error)` tuple
//! that a presentation layer renders. Every year selection starts a new fetch
//! cycle identified by a generation number; a cycle may only publish its
//! result while it is still the latest one, so a slow response for a
//! previously selected year never overwrites the current year's listing.
//!
//! # Responsibilities
//! - Apply each cycle's outcome atomically (one lock, one write)
//! - Replace the listing on every completed cycle, never merge
//! - Clear the listing and keep a single message when a fetch fails
//!
//! # Navigation
//! - Main entrypoint: [`ListingSession::select_year`]
//! - Lower level: [`ListingSession::begin`] / [`ListingSession::finish`]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::{info, warn};

use crate::config::RepoLocation;
use crate::contract::{FetchError, TreeSource};
use crate::listing::{bucket_by_month, normalize, GroupedListing, MonthBucket};

/// Consistent view of the session at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub year: Option<i32>,
    pub listing: GroupedListing,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionSnapshot {
    pub fn months(&self) -> Vec<MonthBucket> {
        bucket_by_month(&self.listing)
    }
}

/// Identifies one fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub year: i32,
    generation: u64,
}

pub struct ListingSession<S> {
    source: S,
    repo: RepoLocation,
    generation: AtomicU64,
    state: Mutex<SessionSnapshot>,
}

impl<S: TreeSource> ListingSession<S> {
    pub fn new(source: S, repo: RepoLocation) -> Self {
        Self {
            source,
            repo,
            generation: AtomicU64::new(0),
            state: Mutex::new(SessionSnapshot::default()),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().clone()
    }

    /// Starts a cycle for `year`, superseding any cycle still in flight.
    pub fn begin(&self, year: i32) -> FetchTicket {
        let mut state = self.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = SessionSnapshot {
            year: Some(year),
            listing: GroupedListing::new(),
            loading: true,
            error: None,
        };
        FetchTicket { year, generation }
    }

    /// Publishes a cycle's outcome. Returns `false` when the ticket has been
    /// superseded and the result was discarded.
    pub fn finish(&self, ticket: FetchTicket, result: Result<GroupedListing, FetchError>) -> bool {
        let mut state = self.lock();
        if self.generation.load(Ordering::SeqCst) != ticket.generation {
            warn!(year = ticket.year, "Discarding stale listing result");
            return false;
        }
        match result {
            Ok(listing) => {
                info!(year = ticket.year, dates = listing.len(), "Listing loaded");
                *state = SessionSnapshot {
                    year: Some(ticket.year),
                    listing,
                    loading: false,
                    error: None,
                };
            }
            Err(e) => {
                warn!(year = ticket.year, error = %e, "Listing failed to load");
                *state = SessionSnapshot {
                    year: Some(ticket.year),
                    listing: GroupedListing::new(),
                    loading: false,
                    error: Some(e.to_string()),
                };
            }
        }
        true
    }

    /// Fetches and normalizes `year`, then publishes the result if this is
    /// still the latest selection. Returns the snapshot after the cycle.
    pub async fn select_year(&self, year: i32) -> SessionSnapshot {
        let ticket = self.begin(year);
        let result = self
            .source
            .fetch_tree(year)
            .await
            .map(|listing| normalize(year, &listing, &self.repo));
        self.finish(ticket, result);
        self.snapshot()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionSnapshot> {
        // Every write replaces the whole snapshot, so a poisoned value is still consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
