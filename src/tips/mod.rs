//! Ticket combination engine
//!
//! The pure core of TipPool: counting betting rows, factorizing a target
//! cost into its coverage budget, tallying group votes, and allocating
//! per-match coverage for the final combined ticket. Everything here is
//! synchronous and side-effect free; callers fetch one ticket snapshot
//! and hand it in.

mod allocation;
mod factor;
mod tally;
mod validate;

pub use allocation::{aggregate_tickets, AggregatedTicket, AggregationError};
pub use factor::{factorize_cost, CostFactors};
pub use tally::{tally_votes, MatchVotes, VoteCount};
pub use validate::{validate_ticket, TicketError};

/// Number of betting rows (combinations) implied by per-match selection sizes.
///
/// Zero matches yields 0, the sentinel for "no predictions yet". An empty
/// selection counts as a multiplier of 1 so an incomplete entry never
/// collapses the whole product to zero. Both ticket validation and final
/// ticket aggregation go through this one function.
pub fn combination_count<I>(selection_sizes: I) -> u64
where
    I: IntoIterator<Item = usize>,
{
    let mut product: u64 = 1;
    let mut empty = true;
    for size in selection_sizes {
        empty = false;
        product *= size.max(1) as u64;
    }
    if empty {
        0
    } else {
        product
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_list_counts_zero() {
        assert_eq!(combination_count(std::iter::empty()), 0);
    }

    #[test]
    fn product_of_selection_sizes() {
        assert_eq!(combination_count([1, 1, 1, 1]), 1);
        assert_eq!(combination_count([1, 2, 3]), 6);
        assert_eq!(combination_count([3, 3, 3]), 27);
    }

    #[test]
    fn empty_selection_counts_as_one() {
        assert_eq!(combination_count([2, 0, 3]), 6);
        assert_eq!(combination_count([0]), 1);
    }
}
