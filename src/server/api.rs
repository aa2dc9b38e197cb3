//! HTTP API
//!
//! REST endpoints for room management, ticket submission, and draw data.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};

use super::types::*;
use super::AppState;
use crate::draws::Draw;
use crate::store::{NewMatch, NewRoom, SubmitError, SubmitTicket};
use crate::tips::{aggregate_tickets, tally_votes};
use crate::types::{Outcome, Room, Ticket};

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Rooms
        .route("/api/rooms", post(create_room))
        .route("/api/rooms/:room_id", get(get_room))
        .route("/api/rooms/:room_id/submit", post(submit_ticket))
        // Draw data (Svenska Spel proxy)
        .route("/api/stryktipset/current", get(get_current_draw))
        .route("/api/stryktipset/forecast/:draw_number", get(get_forecast))
        .with_state(state)
        // CORS for the frontend
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

// ─────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────

/// POST /api/rooms - create a room with a fixed match list and target cost
async fn create_room(
    State(state): State<AppState>,
    Json(body): Json<CreateRoomRequest>,
) -> impl IntoResponse {
    let new_room = NewRoom {
        title: body.title,
        target_cost: body.target_cost,
        matches: body
            .matches
            .into_iter()
            .map(|m| NewMatch {
                home: m.home,
                away: m.away,
            })
            .collect(),
        draw_number: body.draw_number,
    };

    match state.store.create_room(new_room).await {
        Ok(room) => (StatusCode::OK, Json(ApiResponse::success(room))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Room>::error(e.to_string())),
        ),
    }
}

/// GET /api/rooms/:room_id - room view with tickets, votes, and the final ticket
async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    // Fetch once, then compute: votes and the final ticket below both come
    // from this one snapshot.
    let Some(snapshot) = state.store.snapshot(&room_id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<RoomViewResponse>::error("Room not found")),
        );
    };

    let ticket_count = snapshot.tickets.len();
    let votes = tally_votes(&snapshot.room.matches, &snapshot.tickets)
        .into_iter()
        .map(|tally| MatchVotesResponse {
            match_id: tally.match_id,
            one_pct: vote_pct(tally.votes.get(Outcome::Home), ticket_count),
            x_pct: vote_pct(tally.votes.get(Outcome::Draw), ticket_count),
            two_pct: vote_pct(tally.votes.get(Outcome::Away), ticket_count),
        })
        .collect();

    let final_ticket = FinalTicketView::from_result(aggregate_tickets(
        &snapshot.room.matches,
        &snapshot.tickets,
        snapshot.room.target_cost,
    ));

    (
        StatusCode::OK,
        Json(ApiResponse::success(RoomViewResponse {
            room: snapshot.room,
            tickets: snapshot.tickets,
            votes,
            final_ticket,
        })),
    )
}

/// POST /api/rooms/:room_id/submit - accept one ticket per client
async fn submit_ticket(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(body): Json<SubmitTicketRequest>,
) -> impl IntoResponse {
    if body.player_name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Ticket>::error("Player name is required")),
        );
    }
    if body.client_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Ticket>::error("Client ID is required")),
        );
    }

    // Same gate as the pool operator: no submissions after registration
    // closes. An unreachable feed counts as closed.
    let open = state.draws.is_open().await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to check draw state");
        false
    });
    if !open {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Ticket>::error(
                "Stryktipset is closed; tickets can no longer be submitted",
            )),
        );
    }

    let submit = SubmitTicket {
        player_name: body.player_name,
        client_id: body.client_id,
        selections: body.selections,
    };
    match state.store.submit_ticket(&room_id, submit).await {
        Ok(ticket) => (StatusCode::OK, Json(ApiResponse::success(ticket))),
        Err(e) => (
            submit_status(&e),
            Json(ApiResponse::<Ticket>::error(e.to_string())),
        ),
    }
}

fn submit_status(error: &SubmitError) -> StatusCode {
    match error {
        SubmitError::RoomNotFound(_) => StatusCode::NOT_FOUND,
        SubmitError::AlreadySubmitted => StatusCode::CONFLICT,
        SubmitError::Invalid(_) => StatusCode::BAD_REQUEST,
    }
}

/// GET /api/stryktipset/current - the currently open draw
async fn get_current_draw(State(state): State<AppState>) -> impl IntoResponse {
    match state.draws.current().await {
        Ok(Some(draw)) => (StatusCode::OK, Json(ApiResponse::success(draw))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Draw>::error("No open draws found")),
        ),
        Err(e) => {
            error!(error = %e, "Failed to fetch current draw");
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::<Draw>::error("Failed to fetch Stryktipset data")),
            )
        }
    }
}

/// GET /api/stryktipset/forecast/:draw_number - live results passthrough
async fn get_forecast(
    State(state): State<AppState>,
    Path(draw_number): Path<i64>,
) -> impl IntoResponse {
    match state.draws.forecast(draw_number).await {
        Ok(forecast) => (StatusCode::OK, Json(ApiResponse::success(forecast))),
        Err(e) => {
            error!(draw_number, error = %e, "Failed to fetch forecast");
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::<serde_json::Value>::error(format!(
                    "Failed to fetch forecast for draw {}",
                    draw_number
                ))),
            )
        }
    }
}

/// Percentage of tickets covering an outcome.
fn vote_pct(votes: u32, ticket_count: usize) -> f64 {
    if ticket_count == 0 {
        return 0.0;
    }
    f64::from(votes) / ticket_count as f64 * 100.0
}
