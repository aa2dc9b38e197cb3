//! Room and ticket store
//!
//! In-memory, append-only storage of rooms and their accepted tickets.
//! Each accept runs its duplicate-client check and full validation inside
//! one write-lock critical section, so a ticket can never slip in between
//! the check and the insert. Reads hand out a cloned snapshot: callers
//! fetch once, then compute.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::tips::{self, TicketError};
use crate::types::{Match, Outcome, Room, Selection, Ticket};

/// Room creation request.
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub title: String,
    pub target_cost: u64,
    pub matches: Vec<NewMatch>,
    pub draw_number: Option<i64>,
}

/// One fixture of a room creation request.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub home: String,
    pub away: String,
}

/// Ticket submission request. `selections` carries the raw per-match
/// outcome signs so validation can point at the exact offending value.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub player_name: String,
    pub client_id: String,
    pub selections: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CreateRoomError {
    #[error("room title is required")]
    MissingTitle,
    #[error("target cost must be a positive number of kr")]
    InvalidTargetCost,
    #[error("at least one match is required")]
    NoMatches,
    #[error("match {match_number} must have home and away teams")]
    IncompleteMatch { match_number: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("room {0} not found")]
    RoomNotFound(String),
    #[error("you have already submitted a ticket for this room")]
    AlreadySubmitted,
    #[error(transparent)]
    Invalid(#[from] TicketError),
}

/// A room plus every ticket accepted so far, cloned under one read lock.
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub room: Room,
    pub tickets: Vec<Ticket>,
}

struct RoomRecord {
    room: Room,
    tickets: Vec<Ticket>,
    /// Hashed client ids that already submitted; never exposed through the API.
    client_hashes: HashSet<String>,
}

/// In-memory room store. Append-only: rooms are created once and tickets
/// are never mutated or removed after accept.
pub struct RoomStore {
    rooms: RwLock<HashMap<String, RoomRecord>>,
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomStore {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Create a room with its match list and target cost fixed forever.
    pub async fn create_room(&self, new_room: NewRoom) -> Result<Room, CreateRoomError> {
        let title = new_room.title.trim();
        if title.is_empty() {
            return Err(CreateRoomError::MissingTitle);
        }
        if new_room.target_cost == 0 {
            return Err(CreateRoomError::InvalidTargetCost);
        }
        if new_room.matches.is_empty() {
            return Err(CreateRoomError::NoMatches);
        }
        for (index, m) in new_room.matches.iter().enumerate() {
            if m.home.trim().is_empty() || m.away.trim().is_empty() {
                return Err(CreateRoomError::IncompleteMatch {
                    match_number: index + 1,
                });
            }
        }

        if tips::factorize_cost(new_room.target_cost).is_none() {
            warn!(
                target_cost = new_room.target_cost,
                "Room target cost is not a product of 2s and 3s; aggregation will never produce a final ticket"
            );
        }

        let room = Room {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            target_cost: new_room.target_cost,
            matches: new_room
                .matches
                .iter()
                .enumerate()
                .map(|(index, m)| Match {
                    id: (index + 1).to_string(),
                    home: m.home.trim().to_string(),
                    away: m.away.trim().to_string(),
                })
                .collect(),
            created_at: Utc::now(),
            draw_number: new_room.draw_number,
        };

        let mut rooms = self.rooms.write().await;
        rooms.insert(
            room.id.clone(),
            RoomRecord {
                room: room.clone(),
                tickets: Vec::new(),
                client_hashes: HashSet::new(),
            },
        );
        info!(
            room_id = %room.id,
            target_cost = room.target_cost,
            matches = room.matches.len(),
            "Room created"
        );

        Ok(room)
    }

    /// Accept one ticket, atomically.
    ///
    /// Lookup, duplicate-client check, canonicalization, cost derivation,
    /// and validation all happen under the same write lock before the
    /// append, in that order.
    pub async fn submit_ticket(
        &self,
        room_id: &str,
        submit: SubmitTicket,
    ) -> Result<Ticket, SubmitError> {
        let client_id_hash = hash_client_id(&submit.client_id);

        let mut rooms = self.rooms.write().await;
        let record = rooms
            .get_mut(room_id)
            .ok_or_else(|| SubmitError::RoomNotFound(room_id.to_string()))?;

        if record.client_hashes.contains(&client_id_hash) {
            return Err(SubmitError::AlreadySubmitted);
        }

        // Set semantics before any counting: duplicates dropped, canonical order.
        let canonical: Vec<Vec<Outcome>> = submit
            .selections
            .iter()
            .map(|outcomes| {
                let mut set: Vec<Outcome> = outcomes
                    .iter()
                    .filter_map(|value| Outcome::from_sign(value))
                    .collect();
                set.sort();
                set.dedup();
                set
            })
            .collect();
        let combinations = tips::combination_count(canonical.iter().map(|set| set.len()));

        tips::validate_ticket(
            &submit.selections,
            record.room.matches.len(),
            combinations,
            record.room.target_cost,
        )?;

        let selections: Vec<Selection> = record
            .room
            .matches
            .iter()
            .zip(canonical)
            .map(|(m, outcomes)| Selection {
                match_id: m.id.clone(),
                outcomes,
            })
            .collect();

        let ticket = Ticket {
            id: Uuid::new_v4().to_string(),
            player_name: submit.player_name.trim().to_string(),
            selections,
            combinations,
            cost: combinations,
            submitted_at: Utc::now(),
        };

        record.client_hashes.insert(client_id_hash);
        record.tickets.push(ticket.clone());
        info!(
            room_id,
            ticket_id = %ticket.id,
            player = %ticket.player_name,
            cost = ticket.cost,
            "Ticket accepted"
        );

        Ok(ticket)
    }

    /// Consistent view of a room and its tickets at one point in time.
    pub async fn snapshot(&self, room_id: &str) -> Option<RoomSnapshot> {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).map(|record| RoomSnapshot {
            room: record.room.clone(),
            tickets: record.tickets.clone(),
        })
    }
}

/// SHA-256 hex digest of a client identifier, for one-ticket-per-client dedup.
pub fn hash_client_id(client_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(client_id.as_bytes());
    hex::encode(hasher.finalize())
}
