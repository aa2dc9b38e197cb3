//! HTTP API types
//!
//! Request and response DTOs for the JSON API.

use serde::{Deserialize, Serialize};

use crate::tips::{AggregatedTicket, AggregationError};
use crate::types::{Room, Selection, Ticket};

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Room creation request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub title: String,
    pub target_cost: u64,
    pub matches: Vec<CreateMatchRequest>,
    #[serde(default)]
    pub draw_number: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMatchRequest {
    pub home: String,
    pub away: String,
}

/// Ticket submission request body. Selections carry raw coupon signs so
/// validation errors can quote the offending value back.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitTicketRequest {
    pub player_name: String,
    pub client_id: String,
    pub selections: Vec<Vec<String>>,
}

/// Full room view: the room, its tickets, group sentiment per match, and
/// the state of the combined final ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomViewResponse {
    pub room: Room,
    pub tickets: Vec<Ticket>,
    pub votes: Vec<MatchVotesResponse>,
    pub final_ticket: FinalTicketView,
}

/// Share of tickets covering each outcome of one match, in percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchVotesResponse {
    pub match_id: String,
    pub one_pct: f64,
    pub x_pct: f64,
    pub two_pct: f64,
}

/// Aggregation result for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FinalTicketView {
    /// The combined ticket meeting the target cost exactly.
    Ready {
        selections: Vec<Selection>,
        combinations: u64,
        cost: u64,
    },
    /// Nothing to combine yet.
    NoTickets,
    /// The room's target cost can never be met; carries the decomposition
    /// hint for the frontend.
    InfeasibleTargetCost { message: String },
    /// Defensive: the coverage budget outran the match list.
    CapacityExceeded { message: String },
}

impl FinalTicketView {
    pub fn from_result(result: Result<AggregatedTicket, AggregationError>) -> Self {
        match result {
            Ok(ticket) => FinalTicketView::Ready {
                combinations: ticket.combinations,
                cost: ticket.combinations,
                selections: ticket.selections,
            },
            Err(AggregationError::NoTickets) => FinalTicketView::NoTickets,
            Err(error @ AggregationError::InfeasibleTargetCost { .. }) => {
                FinalTicketView::InfeasibleTargetCost {
                    message: error.to_string(),
                }
            }
            Err(error @ AggregationError::CapacityExceeded { .. }) => {
                FinalTicketView::CapacityExceeded {
                    message: error.to_string(),
                }
            }
        }
    }
}
