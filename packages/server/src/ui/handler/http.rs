//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{BroadcastEvent, EventName, RoomId},
    infrastructure::dto::http::{
        BroadcastRequestDto, BroadcastResponseDto, ConnectionDto, IssueSessionRequestDto,
        IssueSessionResponseDto, RoomDetailDto, RoomSummaryDto,
    },
    ui::state::AppState,
    usecase::{BroadcastError, GetRoomDetailError, IssueSessionError, RevokeSessionError},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;
    // Domain Model から DTO への変換
    Json(rooms.into_iter().map(Into::into).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok((room, members)) => Ok(Json(RoomDetailDto::from_parts(room, members))),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(GetRoomDetailError::InvalidRoomId(reason)) => {
            tracing::debug!("Rejected room id: {}", reason);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// Get list of registered connections
pub async fn get_connections(State(state): State<Arc<AppState>>) -> Json<Vec<ConnectionDto>> {
    let connections = state.list_connections_usecase.execute().await;
    Json(connections.into_iter().map(Into::into).collect())
}

/// Server-originated broadcast to one room
pub async fn broadcast_to_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(body): Json<BroadcastRequestDto>,
) -> Result<Json<BroadcastResponseDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|e| {
        tracing::debug!("Rejected room id: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    let event = parse_event_name(body.event)?;
    dispatch(&state, BroadcastEvent::to_room(room_id, event, body.data)).await
}

/// Server-originated broadcast to every connection
pub async fn broadcast_to_all(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BroadcastRequestDto>,
) -> Result<Json<BroadcastResponseDto>, StatusCode> {
    let event = parse_event_name(body.event)?;
    dispatch(&state, BroadcastEvent::to_all(event, body.data)).await
}

/// Issue a session credential (development only)
pub async fn issue_session(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IssueSessionRequestDto>,
) -> Result<Json<IssueSessionResponseDto>, StatusCode> {
    match state.manage_sessions_usecase.issue(body.identity).await {
        Ok(session) => Ok(Json(session.into())),
        Err(IssueSessionError::InvalidIdentity(reason)) => {
            tracing::debug!("Rejected identity: {}", reason);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// Revoke a session credential (development only)
pub async fn revoke_session(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> StatusCode {
    match state.manage_sessions_usecase.revoke(&token).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(RevokeSessionError::InvalidToken(reason)) => {
            tracing::debug!("Rejected session token: {}", reason);
            StatusCode::BAD_REQUEST
        }
    }
}

fn parse_event_name(event: String) -> Result<EventName, StatusCode> {
    EventName::new(event).map_err(|e| {
        tracing::debug!("Rejected event name: {}", e);
        StatusCode::BAD_REQUEST
    })
}

async fn dispatch(
    state: &AppState,
    event: BroadcastEvent,
) -> Result<Json<BroadcastResponseDto>, StatusCode> {
    match state.broadcast_event_usecase.execute(event).await {
        Ok(report) => Ok(Json((&report).into())),
        Err(BroadcastError::UnknownConnection(id)) => {
            tracing::error!("Server broadcast carried unknown origin '{}'", id);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
