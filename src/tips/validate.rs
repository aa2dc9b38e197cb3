//! Ticket validation at the submission boundary.

use thiserror::Error;

use crate::types::Outcome;

/// Why a candidate ticket was rejected.
///
/// Every message names the failed rule and what to correct; match numbers
/// are 1-based to match the coupon.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TicketError {
    #[error("expected selections for {expected} matches but got {actual}")]
    StructuralMismatch { expected: usize, actual: usize },
    #[error("match {match_number} has no selections")]
    EmptySelection { match_number: usize },
    #[error("invalid outcome \"{value}\" in match {match_number}: pick one of 1, X, 2")]
    InvalidOutcome { value: String, match_number: usize },
    #[error("ticket cost ({actual} kr) must equal the room target cost ({target} kr)")]
    CostMismatch { actual: u64, target: u64 },
}

/// Decide whether a candidate ticket can be accepted.
///
/// `selections` are the raw per-match outcome signs as submitted; `cost` is
/// the combination count computed from them. Rules run in a fixed order and
/// the first failing rule wins. The caller must run this inside the same
/// critical section as the one-ticket-per-client check.
pub fn validate_ticket(
    selections: &[Vec<String>],
    match_count: usize,
    cost: u64,
    target_cost: u64,
) -> Result<(), TicketError> {
    if selections.len() != match_count {
        return Err(TicketError::StructuralMismatch {
            expected: match_count,
            actual: selections.len(),
        });
    }

    for (index, outcomes) in selections.iter().enumerate() {
        if outcomes.is_empty() {
            return Err(TicketError::EmptySelection {
                match_number: index + 1,
            });
        }
        for value in outcomes {
            if Outcome::from_sign(value).is_none() {
                return Err(TicketError::InvalidOutcome {
                    value: value.clone(),
                    match_number: index + 1,
                });
            }
        }
    }

    if cost != target_cost {
        return Err(TicketError::CostMismatch {
            actual: cost,
            target: target_cost,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signs(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|outcomes| outcomes.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn wrong_selection_count_is_structural() {
        let selections = signs(&[&["1"], &["X"]]);
        assert_eq!(
            validate_ticket(&selections, 3, 1, 1),
            Err(TicketError::StructuralMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn empty_selection_names_the_match() {
        let selections = signs(&[&["1"], &[], &["2"]]);
        assert_eq!(
            validate_ticket(&selections, 3, 1, 1),
            Err(TicketError::EmptySelection { match_number: 2 })
        );
    }

    #[test]
    fn invalid_outcome_names_value_and_match() {
        let selections = signs(&[&["1"], &["X", "9"], &["2"]]);
        assert_eq!(
            validate_ticket(&selections, 3, 2, 2),
            Err(TicketError::InvalidOutcome {
                value: "9".to_string(),
                match_number: 2
            })
        );
    }

    #[test]
    fn cost_must_match_exactly() {
        let selections = signs(&[&["1", "X"], &["X"], &["2"]]);
        assert_eq!(
            validate_ticket(&selections, 3, 2, 4),
            Err(TicketError::CostMismatch {
                actual: 2,
                target: 4
            })
        );
    }

    #[test]
    fn earlier_rules_win() {
        // Match 1 is empty and match 2 holds an invalid sign: the empty
        // selection must be reported first.
        let selections = signs(&[&[], &["9"]]);
        assert_eq!(
            validate_ticket(&selections, 2, 1, 1),
            Err(TicketError::EmptySelection { match_number: 1 })
        );

        // A wrong length beats everything else.
        assert_eq!(
            validate_ticket(&selections, 4, 1, 1),
            Err(TicketError::StructuralMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn well_formed_ticket_is_accepted() {
        let selections = signs(&[&["1", "X"], &["X"], &["2"], &["1"]]);
        assert_eq!(validate_ticket(&selections, 4, 2, 2), Ok(()));
    }

    #[test]
    fn error_messages_state_the_correction() {
        let error = TicketError::CostMismatch {
            actual: 4,
            target: 8,
        };
        assert_eq!(
            error.to_string(),
            "ticket cost (4 kr) must equal the room target cost (8 kr)"
        );
    }
}
