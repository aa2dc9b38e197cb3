//! Core types used throughout TipPool
//!
//! Defines matches, outcomes, selections, tickets, and rooms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three result categories of a pool match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Home win ("1" on the coupon)
    #[serde(rename = "1")]
    Home,
    /// Draw ("X" on the coupon)
    #[serde(rename = "X")]
    Draw,
    /// Away win ("2" on the coupon)
    #[serde(rename = "2")]
    Away,
}

impl Outcome {
    /// Canonical outcome order; also the fixed tie-break order everywhere
    pub const CANONICAL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];

    /// The sign used on printed coupons
    pub fn sign(&self) -> &'static str {
        match self {
            Outcome::Home => "1",
            Outcome::Draw => "X",
            Outcome::Away => "2",
        }
    }

    /// Parse from a coupon sign
    pub fn from_sign(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(Outcome::Home),
            "X" | "x" => Some(Outcome::Draw),
            "2" => Some(Outcome::Away),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}

/// One fixture in a pool round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Stable id within the room ("1".."13", following the coupon numbering)
    pub id: String,
    /// Home team name
    pub home: String,
    /// Away team name
    pub away: String,
}

/// The set of outcomes a ticket covers for one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Match this selection belongs to
    pub match_id: String,
    /// Covered outcomes, stored without duplicates in canonical order
    pub outcomes: Vec<Outcome>,
}

impl Selection {
    /// Build a selection with set semantics: duplicates dropped, canonical order.
    pub fn new(match_id: impl Into<String>, outcomes: &[Outcome]) -> Self {
        let mut outcomes = outcomes.to_vec();
        outcomes.sort();
        outcomes.dedup();
        Self {
            match_id: match_id.into(),
            outcomes,
        }
    }
}

/// One participant's full set of selections across a room's matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket id
    pub id: String,
    /// Display name of the submitter
    pub player_name: String,
    /// Exactly one selection per room match, in room match order
    pub selections: Vec<Selection>,
    /// Number of betting rows this ticket covers
    pub combinations: u64,
    /// Cost in kr (1 kr per row, so always equal to `combinations`)
    pub cost: u64,
    /// When the ticket was accepted
    pub submitted_at: DateTime<Utc>,
}

/// A betting room: a fixed match list, a fixed target cost, growing tickets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room id
    pub id: String,
    /// Display title
    pub title: String,
    /// Cost in kr every submitted ticket must equal exactly
    pub target_cost: u64,
    /// The fixed fixture list, immutable once the room exists
    pub matches: Vec<Match>,
    /// When the room was created
    pub created_at: DateTime<Utc>,
    /// Stryktipset draw number, when the room tracks a live round
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_number: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_signs_round_trip() {
        for outcome in Outcome::CANONICAL {
            assert_eq!(Outcome::from_sign(outcome.sign()), Some(outcome));
        }
        assert_eq!(Outcome::from_sign("x"), Some(Outcome::Draw));
        assert_eq!(Outcome::from_sign("3"), None);
        assert_eq!(Outcome::from_sign(""), None);
    }

    #[test]
    fn outcome_serializes_as_coupon_sign() {
        assert_eq!(serde_json::to_string(&Outcome::Draw).unwrap(), "\"X\"");
        let parsed: Outcome = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(parsed, Outcome::Away);
    }

    #[test]
    fn selection_applies_set_semantics() {
        let selection = Selection::new(
            "1",
            &[Outcome::Away, Outcome::Home, Outcome::Away, Outcome::Home],
        );
        assert_eq!(selection.outcomes, vec![Outcome::Home, Outcome::Away]);
    }
}
