//! The per-user snapshot of fetched transfers and the refresh sequencing
//! around it.
//!
//! A full reload is the application's only consistency mechanism: after
//! every confirmed mutation the list is fetched again in full. Reloads may
//! overlap (two quick edits on different rows), so every fetch takes a
//! numbered ticket and a response is discarded when a newer fetch has been
//! issued in the meantime. The snapshot therefore always reflects the
//! latest issued fetch that completed, never an older response that
//! happened to arrive last.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    api::{ApiClient, fetch_transactions},
    auth::{Session, UserId},
    transaction::model::Transaction,
};

/// The result of refreshing the transfer list, consumed by the transfers
/// page to decide between showing data, an empty state, or a retry
/// affordance.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The fetch succeeded and at least one transfer came back.
    Loaded(Vec<Transaction>),
    /// The fetch succeeded and the user has no transfers.
    Empty,
    /// The fetch failed; the previous snapshot, if any, was left untouched.
    Failed {
        /// A short description of what went wrong, for logging and the
        /// error banner.
        reason: String,
    },
}

/// A numbered claim on the next snapshot update.
///
/// Issued by [ListingStore::begin_refresh] before the network call starts;
/// redeemed by [ListingStore::apply] once the response arrives.
#[derive(Debug)]
pub struct RefreshTicket {
    user_id: UserId,
    sequence: u64,
}

#[derive(Debug, Default)]
struct UserListing {
    snapshot: Option<Vec<Transaction>>,
    last_issued: u64,
    last_applied: u64,
}

/// Holds the last-fetched transfer list per user.
///
/// The snapshot is authoritative between reloads: no entry in it is ever
/// mutated in place, and it only changes when a whole fetched list replaces
/// it.
#[derive(Debug, Clone, Default)]
pub struct ListingStore {
    inner: Arc<Mutex<HashMap<UserId, UserListing>>>,
}

impl ListingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh for `user_id`, superseding any fetch still in
    /// flight.
    pub fn begin_refresh(&self, user_id: UserId) -> RefreshTicket {
        let mut inner = self.inner.lock().expect("listing store lock poisoned");
        let listing = inner.entry(user_id).or_default();
        listing.last_issued += 1;

        RefreshTicket {
            user_id,
            sequence: listing.last_issued,
        }
    }

    /// Replace the snapshot with `transactions` if `ticket` is still the
    /// latest issued fetch.
    ///
    /// Returns `false` when the response was discarded because a newer
    /// fetch was issued after this ticket was taken.
    pub fn apply(&self, ticket: RefreshTicket, transactions: Vec<Transaction>) -> bool {
        let mut inner = self.inner.lock().expect("listing store lock poisoned");
        let listing = inner.entry(ticket.user_id).or_default();

        if ticket.sequence < listing.last_issued {
            tracing::debug!(
                "discarding stale transfer list for user {} (ticket {}, latest {})",
                ticket.user_id,
                ticket.sequence,
                listing.last_issued
            );
            return false;
        }

        listing.snapshot = Some(transactions);
        listing.last_applied = ticket.sequence;
        true
    }

    /// The latest applied snapshot for `user_id`, if any fetch has
    /// succeeded yet.
    pub fn snapshot(&self, user_id: UserId) -> Option<Vec<Transaction>> {
        self.inner
            .lock()
            .expect("listing store lock poisoned")
            .get(&user_id)
            .and_then(|listing| listing.snapshot.clone())
    }

    /// Drop everything held for `user_id`. Called on log out.
    pub fn clear(&self, user_id: UserId) {
        self.inner
            .lock()
            .expect("listing store lock poisoned")
            .remove(&user_id);
    }
}

/// Fetch the session user's transfers and update the snapshot.
///
/// On success the snapshot is replaced (unless a newer fetch superseded
/// this one, in which case the newer snapshot is reported instead). On
/// failure the snapshot is left in its previous state and the outcome
/// carries the reason.
pub async fn refresh(api: &ApiClient, store: &ListingStore, session: &Session) -> FetchOutcome {
    let user_id = session.user_id();
    let ticket = store.begin_refresh(user_id);

    match fetch_transactions(api, session).await {
        Ok(transactions) => {
            if !store.apply(ticket, transactions) {
                // A newer fetch landed first; report whatever it produced.
                tracing::debug!("transfer list refresh superseded for user {user_id}");
            }

            match store.snapshot(user_id) {
                Some(snapshot) if !snapshot.is_empty() => FetchOutcome::Loaded(snapshot),
                _ => FetchOutcome::Empty,
            }
        }
        Err(error) => {
            tracing::error!("could not refresh transfers for user {user_id}: {error}");
            FetchOutcome::Failed {
                reason: error.to_string(),
            }
        }
    }
}
