//! Final-ticket allocation.
//!
//! Turns a room's ticket pile into the one combined ticket the group plays:
//! every match starts at a single pick, and the factorized target cost buys
//! extra coverage for the matches the group is most divided on.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

use super::{combination_count, factorize_cost, tally_votes};
use crate::types::{Match, Outcome, Selection, Ticket};

/// The combined ticket derived from every submitted ticket in a room.
///
/// Never stored; recomputed from a consistent ticket snapshot on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedTicket {
    /// One selection per room match, in room match order
    pub selections: Vec<Selection>,
    /// Number of betting rows; equals the target cost whenever aggregation succeeds
    pub combinations: u64,
}

/// Why no combined ticket could be produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AggregationError {
    /// No tickets have been submitted yet. Distinct from an infeasible
    /// target: this state resolves itself as soon as someone submits.
    #[error("no tickets have been submitted yet")]
    NoTickets,
    /// The target cost has a prime factor other than 2 or 3, so no pick
    /// assignment can ever meet it exactly. Fixable only by creating a room
    /// with a different target cost.
    #[error(
        "target cost {target_cost} kr can never be met exactly: \
         it must be a product of 2s and 3s (2^a x 3^b, e.g. 1, 2, 3, 4, 6, 8, 9, 12)"
    )]
    InfeasibleTargetCost { target_cost: u64 },
    /// The coverage budget outran the match list, leaving the produced cost
    /// below target. Unreachable for realistic costs on a 13-match round,
    /// but never silently ignored.
    #[error("allocation produced {actual} kr against a target of {target} kr: not enough matches to spend the coverage budget")]
    CapacityExceeded { target: u64, actual: u64 },
}

/// Uncertainty scores for one match, derived from the vote tally.
struct MatchScore {
    index: usize,
    /// Votes for the 2nd-ranked outcome relative to the top pick
    score2: f64,
    /// Votes for the 3rd-ranked outcome relative to the top pick
    score3: f64,
    /// Outcomes ranked by votes, canonical order on ties
    ranked: [Outcome; 3],
}

/// Combine all submitted tickets into the final ticket for the round.
///
/// Pick counts are assigned so the combination product equals `target_cost`
/// exactly: the `threes` matches with the highest `score3` go to 3 picks,
/// then the `twos` highest-`score2` matches among the rest go to 2. Ties
/// between matches are broken by room match order (stable sort on score
/// descending). The produced cost is re-verified before returning, so a
/// mismatching ticket can never escape.
pub fn aggregate_tickets(
    matches: &[Match],
    tickets: &[Ticket],
    target_cost: u64,
) -> Result<AggregatedTicket, AggregationError> {
    if tickets.is_empty() {
        return Err(AggregationError::NoTickets);
    }
    let factors = factorize_cost(target_cost)
        .ok_or(AggregationError::InfeasibleTargetCost { target_cost })?;

    let scores: Vec<MatchScore> = tally_votes(matches, tickets)
        .iter()
        .enumerate()
        .map(|(index, tally)| {
            let ranked = tally.votes.ranked();
            let top1 = f64::from(tally.votes.get(ranked[0]).max(1));
            MatchScore {
                index,
                score2: f64::from(tally.votes.get(ranked[1])) / top1,
                score3: f64::from(tally.votes.get(ranked[2])) / top1,
                ranked,
            }
        })
        .collect();

    // Every match starts at one pick; the factor budget buys upgrades.
    let mut picks = vec![1usize; matches.len()];

    for score in ranked_by(&scores, |s| s.score3)
        .into_iter()
        .take(factors.threes as usize)
    {
        picks[score.index] = 3;
    }

    let mut twos_assigned = 0u32;
    for score in ranked_by(&scores, |s| s.score2) {
        if twos_assigned == factors.twos {
            break;
        }
        if picks[score.index] != 3 {
            picks[score.index] = 2;
            twos_assigned += 1;
        }
    }

    let selections: Vec<Selection> = scores
        .iter()
        .map(|score| {
            Selection::new(
                matches[score.index].id.clone(),
                &score.ranked[..picks[score.index]],
            )
        })
        .collect();

    let combinations = combination_count(selections.iter().map(|s| s.outcomes.len()));
    if combinations != target_cost {
        return Err(AggregationError::CapacityExceeded {
            target: target_cost,
            actual: combinations,
        });
    }

    Ok(AggregatedTicket {
        selections,
        combinations,
    })
}

/// Matches ordered by `key` descending. The sort is stable over ascending
/// match index, which is the documented tie-break.
fn ranked_by<F>(scores: &[MatchScore], key: F) -> Vec<&MatchScore>
where
    F: Fn(&MatchScore) -> f64,
{
    let mut ordered: Vec<&MatchScore> = scores.iter().collect();
    ordered.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    ordered
}
