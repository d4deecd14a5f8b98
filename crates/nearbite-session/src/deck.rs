//! The swipe deck: an ordered candidate list, a cursor, and a one-level undo.

use nearbite_core::Candidate;

/// Where the deck stands relative to its cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckPhase {
    /// Nothing loaded, or an empty result was loaded.
    Empty,
    /// `cursor` points at a candidate that has not been swiped yet.
    HasCurrent,
    /// Every candidate has been swiped.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

#[derive(Debug, Clone)]
struct UndoSlot {
    candidate: Candidate,
    index: usize,
    direction: SwipeDirection,
}

/// Presents candidates one at a time.
///
/// Positions before `cursor` are consumed and never reordered or removed, so
/// the index held in the undo slot stays valid until the next
/// [`load`](Self::load).
#[derive(Debug, Default)]
pub struct DeckController {
    candidates: Vec<Candidate>,
    cursor: usize,
    undo: Option<UndoSlot>,
}

impl DeckController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sequence, rewind to the start, and forget the undo slot.
    pub fn load(&mut self, candidates: Vec<Candidate>) {
        tracing::debug!(count = candidates.len(), "deck loaded");
        self.candidates = candidates;
        self.cursor = 0;
        self.undo = None;
    }

    #[must_use]
    pub fn current(&self) -> Option<&Candidate> {
        self.candidates.get(self.cursor)
    }

    /// Consume the current candidate without saving it.
    ///
    /// Returns `None` and changes nothing when there is no current candidate.
    pub fn swipe_left(&mut self) -> Option<Candidate> {
        self.consume(SwipeDirection::Left)
    }

    /// Consume the current candidate and hand it back so the caller can
    /// persist it. Each call yields a given position at most once.
    pub fn swipe_right(&mut self) -> Option<Candidate> {
        self.consume(SwipeDirection::Right)
    }

    fn consume(&mut self, direction: SwipeDirection) -> Option<Candidate> {
        let candidate = self.current()?.clone();
        self.undo = Some(UndoSlot {
            candidate: candidate.clone(),
            index: self.cursor,
            direction,
        });
        self.cursor += 1;
        Some(candidate)
    }

    /// Step back over the most recent swipe.
    ///
    /// Returns the restored current candidate, or `None` when there is
    /// nothing to undo. Only one level is kept: a second undo is a no-op.
    pub fn undo(&mut self) -> Option<&Candidate> {
        let slot = self.undo.take()?;
        debug_assert_eq!(slot.index + 1, self.cursor);
        self.cursor = slot.index;
        self.candidates.get(self.cursor)
    }

    /// Remove a candidate that has not been shown yet.
    ///
    /// Consumed positions and the undo slot are left alone, so only the
    /// current and later positions are searched. Returns whether a candidate
    /// was removed.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        let Some(offset) = self.candidates[self.cursor..]
            .iter()
            .position(|c| c.id == id)
        else {
            return false;
        };
        self.candidates.remove(self.cursor + offset);
        true
    }

    #[must_use]
    pub fn phase(&self) -> DeckPhase {
        if self.candidates.is_empty() {
            DeckPhase::Empty
        } else if self.cursor < self.candidates.len() {
            DeckPhase::HasCurrent
        } else {
            DeckPhase::Exhausted
        }
    }

    /// Candidates not yet swiped, including the current one.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.candidates.len() - self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// The swipe an [`undo`](Self::undo) would revert.
    #[must_use]
    pub fn last_swipe(&self) -> Option<(SwipeDirection, &Candidate)> {
        self.undo
            .as_ref()
            .map(|slot| (slot.direction, &slot.candidate))
    }
}

#[cfg(test)]
#[path = "deck_test.rs"]
mod tests;
