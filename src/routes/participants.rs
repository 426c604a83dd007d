use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::participant::{ConfirmParticipant, NewInvite, Participant},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips/:trip_id/participants", get(trip_participants))
        .route("/trips/:trip_id/invites", post(create_invite))
        .route("/participants/:participant_id", get(participant_details))
        .route("/participants/:participant_id/confirm", post(confirm_participant))
}

#[derive(Serialize)]
struct ParticipantsResponse {
    participants: Vec<Participant>,
}

#[derive(Serialize)]
struct ParticipantResponse {
    participant: Participant,
}

#[derive(Serialize)]
struct InviteResponse {
    participant_id: Uuid,
}

async fn trip_participants(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<ParticipantsResponse>, AppError> {
    let participants = state.participants.list_participants(trip_id).await?;
    Ok(Json(ParticipantsResponse { participants }))
}

async fn create_invite(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(body): Json<NewInvite>,
) -> Result<(StatusCode, Json<InviteResponse>), AppError> {
    let participant = state
        .participants
        .invite_participant(trip_id, &body.email)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            participant_id: participant.id,
        }),
    ))
}

async fn participant_details(
    State(state): State<AppState>,
    Path(participant_id): Path<Uuid>,
) -> Result<Json<ParticipantResponse>, AppError> {
    let participant = state.participants.get_participant(participant_id).await?;
    Ok(Json(ParticipantResponse { participant }))
}

async fn confirm_participant(
    State(state): State<AppState>,
    Path(participant_id): Path<Uuid>,
    Json(body): Json<ConfirmParticipant>,
) -> Result<Json<ParticipantResponse>, AppError> {
    let participant = state
        .participants
        .confirm_participant(participant_id, body)
        .await?;
    Ok(Json(ParticipantResponse { participant }))
}
