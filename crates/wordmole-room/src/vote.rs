//! Vote aggregation.
//!
//! The tally records exactly one ballot per voter, keyed by the voter's id.
//! Per-target counts are *derived* from the ballots at resolution time, never
//! accumulated — so a voter changing their mind overwrites their ballot
//! instead of inflating a counter, and the completion check counts distinct
//! voters exactly.

use std::collections::HashMap;

use wordmole_protocol::PlayerId;

/// One recorded ballot per voter.
#[derive(Debug, Clone, Default)]
pub struct VoteTally {
    ballots: HashMap<PlayerId, PlayerId>,
}

impl VoteTally {
    /// Records `voter`'s choice, replacing any earlier ballot they cast.
    pub fn cast(&mut self, voter: PlayerId, target: PlayerId) {
        self.ballots.insert(voter, target);
    }

    /// Removes `voter`'s ballot, if any. Returns whether one was removed.
    pub fn retract(&mut self, voter: PlayerId) -> bool {
        self.ballots.remove(&voter).is_some()
    }

    /// Number of distinct voters who have cast a ballot.
    pub fn voter_count(&self) -> usize {
        self.ballots.len()
    }

    /// Returns `true` once every eligible voter has cast a ballot.
    ///
    /// Never complete with zero eligible voters — an abandoned room must not
    /// resolve a vote nobody cast.
    pub fn is_complete(&self, eligible_voters: usize) -> bool {
        eligible_voters > 0 && self.ballots.len() >= eligible_voters
    }

    /// Per-target totals derived from the current ballots.
    pub fn counts(&self) -> HashMap<PlayerId, usize> {
        let mut counts = HashMap::new();
        for target in self.ballots.values() {
            *counts.entry(*target).or_insert(0) += 1;
        }
        counts
    }

    /// Picks the suspect: the target with the most ballots. Ties go to the
    /// entry appearing earliest in `order` (callers pass join order, making
    /// the tie-break deterministic and independent of ballot arrival).
    ///
    /// Returns `None` if no ballots were cast.
    pub fn resolve(&self, order: &[PlayerId]) -> Option<PlayerId> {
        let counts = self.counts();
        let mut best: Option<(PlayerId, usize)> = None;
        for id in order {
            let count = counts.get(id).copied().unwrap_or(0);
            if count == 0 {
                continue;
            }
            match best {
                Some((_, top)) if count <= top => {}
                _ => best = Some((*id, count)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Discards all ballots for a fresh decision round.
    pub fn clear(&mut self) {
        self.ballots.clear();
    }
}
