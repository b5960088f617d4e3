//! Turn-order sequencing.
//!
//! The sequencer is pure bookkeeping over the fixed turn order established at
//! round start: whose turn it is, advancing after an accepted word, and
//! detecting round completion. It holds no player data of its own — callers
//! pass an eligibility predicate so that players who dropped mid-round are
//! skipped without being removed from the order.

use wordmole_protocol::PlayerId;

/// Tracks position within a round's fixed turn order.
///
/// The index only ever moves forward and is bounded by the order length;
/// `index == order.len()` marks the round as complete.
#[derive(Debug, Clone, Default)]
pub struct TurnSequencer {
    order: Vec<PlayerId>,
    index: usize,
}

impl TurnSequencer {
    /// Creates a sequencer positioned at the first entry of `order`.
    pub fn new(order: Vec<PlayerId>) -> Self {
        Self { order, index: 0 }
    }

    /// The fixed turn order, as set at round start.
    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    /// Current position within the order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The player whose turn it is, or `None` once the round is complete.
    pub fn current(&self) -> Option<PlayerId> {
        self.order.get(self.index).copied()
    }

    /// Returns `true` once every entry in the order has been consumed.
    pub fn is_complete(&self) -> bool {
        self.index >= self.order.len()
    }

    /// Consumes the current turn, then skips any following players for whom
    /// `eligible` returns `false`.
    pub fn advance(&mut self, eligible: impl Fn(PlayerId) -> bool) {
        self.index += 1;
        self.skip_ineligible(eligible);
    }

    /// Moves past ineligible players without consuming a turn. Used when the
    /// current player drops mid-round.
    pub fn skip_ineligible(&mut self, eligible: impl Fn(PlayerId) -> bool) {
        while let Some(id) = self.current() {
            if eligible(id) {
                break;
            }
            self.index += 1;
        }
    }

    /// Rewinds to the start of the order for a fresh round, skipping players
    /// that are no longer eligible.
    pub fn reset(&mut self, eligible: impl Fn(PlayerId) -> bool) {
        self.index = 0;
        self.skip_ineligible(eligible);
    }
}
