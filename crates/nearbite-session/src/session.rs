//! One user's discovery session: locate, search, swipe, save.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nearbite_core::{Candidate, Coordinate};
use nearbite_search::{SearchError, SearchOrchestrator};
use tokio::task::{AbortHandle, JoinHandle};

use crate::deck::{DeckController, DeckPhase, SwipeDirection};
use crate::error::SessionError;
use crate::favorites::{AddOutcome, FavoritesStore};
use crate::location::LocationProvider;

struct InFlight {
    id: u64,
    abort: AbortHandle,
}

/// Clears the in-flight slot when the search that owns it ends, including
/// when the awaiting future is dropped.
struct InFlightGuard<'a> {
    slot: &'a Mutex<Option<InFlight>>,
    id: u64,
}

impl InFlightGuard<'_> {
    /// Release the slot if it still belongs to this search. Returns `false`
    /// when a refresh has already taken it over.
    fn release(&self) -> bool {
        let mut slot = lock(self.slot);
        if slot.as_ref().is_some_and(|f| f.id == self.id) {
            if let Some(flight) = slot.take() {
                flight.abort.abort();
            }
            true
        } else {
            false
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wires a [`LocationProvider`], a [`SearchOrchestrator`], a
/// [`DeckController`], and a [`FavoritesStore`] together.
///
/// At most one nearby search runs at a time. Swipes and undo are serialized
/// so an undo always reverts the favorite written by the swipe it undoes.
pub struct DiscoverySession {
    location: Arc<dyn LocationProvider>,
    orchestrator: Arc<SearchOrchestrator>,
    favorites: FavoritesStore,
    deck: Mutex<DeckController>,
    in_flight: Mutex<Option<InFlight>>,
    next_search_id: AtomicU64,
    /// Row inserted by the swipe currently held in the deck's undo slot.
    undo_record: tokio::sync::Mutex<Option<i64>>,
}

impl DiscoverySession {
    #[must_use]
    pub fn new(
        location: Arc<dyn LocationProvider>,
        orchestrator: Arc<SearchOrchestrator>,
        favorites: FavoritesStore,
    ) -> Self {
        Self {
            location,
            orchestrator,
            favorites,
            deck: Mutex::new(DeckController::new()),
            in_flight: Mutex::new(None),
            next_search_id: AtomicU64::new(0),
            undo_record: tokio::sync::Mutex::new(None),
        }
    }

    /// Search around the current location and load the results into the
    /// deck. Returns the number of candidates loaded.
    ///
    /// # Errors
    ///
    /// - [`SessionError::LocationUnavailable`] if location is not authorized
    ///   or has no fix.
    /// - [`SessionError::SearchInProgress`] if another search is running.
    /// - [`SessionError::Cancelled`] if a [`refresh`](Self::refresh)
    ///   superseded this search.
    /// - [`SessionError::Search`] if the search itself failed.
    pub async fn load_nearby(&self) -> Result<usize, SessionError> {
        let origin = self.locate().await?;
        let (id, handle) = self.start_search(origin)?;
        let guard = InFlightGuard {
            slot: &self.in_flight,
            id,
        };

        let outcome = handle.await;
        let still_current = guard.release();

        match outcome {
            Ok(Ok(results)) if still_current => {
                let count = results.len();
                // Held across the reload so no swipe lands between the two.
                let mut undo_record = self.undo_record.lock().await;
                self.lock_deck().load(results);
                *undo_record = None;
                drop(undo_record);
                tracing::info!(%origin, count, "deck loaded with nearby results");
                Ok(count)
            }
            Ok(Err(e)) if still_current => Err(SessionError::Search(e)),
            Ok(_) => {
                tracing::debug!(%origin, "search superseded by refresh; discarding result");
                Err(SessionError::Cancelled)
            }
            Err(e) if e.is_cancelled() => {
                tracing::debug!(%origin, "search cancelled");
                Err(SessionError::Cancelled)
            }
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }

    /// Cancel any running search, drop the cached result, and search again.
    ///
    /// # Errors
    ///
    /// As for [`load_nearby`](Self::load_nearby).
    pub async fn refresh(&self) -> Result<usize, SessionError> {
        let previous = lock(&self.in_flight).take();
        if let Some(flight) = previous {
            flight.abort.abort();
            tracing::debug!(search_id = flight.id, "aborted in-flight search for refresh");
        }
        self.orchestrator.clear_cache();
        self.load_nearby().await
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        lock(&self.in_flight).is_some()
    }

    #[must_use]
    pub fn current(&self) -> Option<Candidate> {
        self.lock_deck().current().cloned()
    }

    #[must_use]
    pub fn phase(&self) -> DeckPhase {
        self.lock_deck().phase()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lock_deck().remaining()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.lock_deck().can_undo()
    }

    /// Pass on the current candidate.
    pub async fn swipe_left(&self) -> Option<Candidate> {
        let mut undo_record = self.undo_record.lock().await;
        let swiped = self.lock_deck().swipe_left();
        if swiped.is_some() {
            *undo_record = None;
        }
        swiped
    }

    /// Save the current candidate to favorites and advance.
    ///
    /// Returns `None` when there is no current candidate. The deck advances
    /// even if saving fails; [`undo`](Self::undo) steps back so the caller can
    /// retry.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Favorites`] if the favorite could not be
    /// persisted.
    pub async fn swipe_right(&self) -> Result<Option<AddOutcome>, SessionError> {
        let mut undo_record = self.undo_record.lock().await;
        let swiped = self.lock_deck().swipe_right();
        let Some(candidate) = swiped else {
            return Ok(None);
        };
        *undo_record = None;

        let outcome = self.favorites.add(&candidate).await?;
        if let AddOutcome::Inserted(record) = &outcome {
            *undo_record = Some(record.record_id);
        }
        Ok(Some(outcome))
    }

    /// Revert the most recent swipe. A right swipe that created a favorite
    /// has that favorite deleted again; a favorite that already existed
    /// before the swipe is kept.
    ///
    /// Returns the restored current candidate, or `None` when there was
    /// nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Favorites`] if the favorite could not be
    /// deleted. The deck has already stepped back at that point.
    pub async fn undo(&self) -> Result<Option<Candidate>, SessionError> {
        let mut undo_record = self.undo_record.lock().await;
        let (restored, was_right) = {
            let mut deck = self.lock_deck();
            let was_right = matches!(deck.last_swipe(), Some((SwipeDirection::Right, _)));
            (deck.undo().cloned(), was_right)
        };
        let Some(restored) = restored else {
            return Ok(None);
        };

        if let Some(record_id) = undo_record.take().filter(|_| was_right) {
            self.favorites.remove_record(record_id).await?;
            tracing::info!(
                candidate_id = %restored.id,
                record_id,
                "favorite reverted by undo"
            );
        }
        Ok(Some(restored))
    }

    /// Save a candidate chosen outside the deck and drop it from the
    /// unswiped portion so it is not offered again.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Favorites`] if the favorite could not be
    /// persisted; the deck is left unchanged.
    pub async fn save_elsewhere(&self, candidate: &Candidate) -> Result<AddOutcome, SessionError> {
        let outcome = self.favorites.add(candidate).await?;
        if self.lock_deck().remove_by_id(&candidate.id) {
            tracing::debug!(candidate_id = %candidate.id, "saved candidate removed from deck");
        }
        Ok(outcome)
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    #[must_use]
    pub fn orchestrator(&self) -> &Arc<SearchOrchestrator> {
        &self.orchestrator
    }

    async fn locate(&self) -> Result<Coordinate, SessionError> {
        let authorization = self.location.authorization();
        if !authorization.is_authorized() {
            tracing::info!(?authorization, "location access not authorized");
            return Err(SessionError::LocationUnavailable);
        }

        match self.location.current().await {
            Some(origin) if origin.is_valid() => Ok(origin),
            Some(origin) => {
                tracing::info!(%origin, "location fix is out of range");
                Err(SessionError::LocationUnavailable)
            }
            None => {
                tracing::info!("no location fix available");
                Err(SessionError::LocationUnavailable)
            }
        }
    }

    fn start_search(
        &self,
        origin: Coordinate,
    ) -> Result<(u64, JoinHandle<Result<Vec<Candidate>, SearchError>>), SessionError> {
        let mut slot = lock(&self.in_flight);
        if slot.is_some() {
            tracing::debug!(%origin, "rejecting search while another is in flight");
            return Err(SessionError::SearchInProgress);
        }

        let id = self.next_search_id.fetch_add(1, Ordering::Relaxed);
        let orchestrator = Arc::clone(&self.orchestrator);
        let handle = tokio::spawn(async move { orchestrator.find_nearby(origin).await });
        *slot = Some(InFlight {
            id,
            abort: handle.abort_handle(),
        });
        Ok((id, handle))
    }

    fn lock_deck(&self) -> MutexGuard<'_, DeckController> {
        lock(&self.deck)
    }
}
