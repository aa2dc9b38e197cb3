//! Vote tallying across submitted tickets.

use crate::types::{Match, Outcome, Ticket};

/// Vote counts for one match, indexed by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteCount {
    counts: [u32; 3],
}

impl VoteCount {
    pub fn add(&mut self, outcome: Outcome) {
        self.counts[outcome as usize] += 1;
    }

    pub fn get(&self, outcome: Outcome) -> u32 {
        self.counts[outcome as usize]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Outcomes ordered by votes descending. Equal counts keep canonical
    /// order (home, draw, away) because the sort is stable over
    /// [`Outcome::CANONICAL`].
    pub fn ranked(&self) -> [Outcome; 3] {
        let mut ranked = Outcome::CANONICAL;
        ranked.sort_by_key(|outcome| std::cmp::Reverse(self.get(*outcome)));
        ranked
    }
}

/// Vote counts for one match, paired with its id.
#[derive(Debug, Clone)]
pub struct MatchVotes {
    pub match_id: String,
    pub votes: VoteCount,
}

/// Count, per match, how many tickets cover each outcome.
///
/// A ticket covering two outcomes for a match contributes one vote to each
/// of them. Ties stay as equal counts; nothing is broken here. The result
/// follows room match order.
pub fn tally_votes(matches: &[Match], tickets: &[Ticket]) -> Vec<MatchVotes> {
    matches
        .iter()
        .map(|m| {
            let mut votes = VoteCount::default();
            for ticket in tickets {
                if let Some(selection) = ticket
                    .selections
                    .iter()
                    .find(|selection| selection.match_id == m.id)
                {
                    for outcome in &selection.outcomes {
                        votes.add(*outcome);
                    }
                }
            }
            MatchVotes {
                match_id: m.id.clone(),
                votes,
            }
        })
        .collect()
}
