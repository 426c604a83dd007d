use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        participant::{ConfirmParticipant, Participant},
        trip::Trip,
    },
    services::{mailer::InviteOutbox, store::TripStore},
    validation,
};

#[derive(Clone)]
pub struct ParticipantService {
    store: Arc<dyn TripStore>,
    outbox: InviteOutbox,
}

impl ParticipantService {
    pub fn new(store: Arc<dyn TripStore>, outbox: InviteOutbox) -> Self {
        Self { store, outbox }
    }

    pub async fn get_participant(&self, participant_id: Uuid) -> Result<Participant, AppError> {
        self.store
            .get_participant(participant_id)
            .await?
            .ok_or(AppError::NotFound("participant"))
    }

    pub async fn list_participants(&self, trip_id: Uuid) -> Result<Vec<Participant>, AppError> {
        let trip = self.require_trip(trip_id).await?;
        self.store.list_participants_by_trip(trip.id).await
    }

    /// Adds one more guest to an existing trip. The invite goes out now if the
    /// trip is active, otherwise when the organizer confirms it.
    pub async fn invite_participant(&self, trip_id: Uuid, raw_email: &str) -> Result<Participant, AppError> {
        let trip = self.require_trip(trip_id).await?;
        let email = validation::email(raw_email)
            .ok_or_else(|| AppError::invalid(format!("invalid email: {}", raw_email.trim())))?;

        let existing = self.store.list_participants_by_trip(trip.id).await?;
        if existing.iter().any(|p| p.email == email) {
            return Err(AppError::invalid(format!("{email} is already part of this trip")));
        }

        let guest = Participant::invitee(trip.id, email);
        self.store.insert_participant(&guest).await?;
        if trip.is_confirmed {
            self.outbox.invite(&trip, &guest);
        }

        info!(trip_id = %trip.id, participant_id = %guest.id, "participant invited");
        Ok(guest)
    }

    /// Moves an invited participant to confirmed, storing the name and email
    /// they confirmed with. A participant that is already confirmed is
    /// returned unchanged.
    pub async fn confirm_participant(
        &self,
        participant_id: Uuid,
        input: ConfirmParticipant,
    ) -> Result<Participant, AppError> {
        let mut participant = self.get_participant(participant_id).await?;
        let name = validation::required_text(&input.name)
            .ok_or_else(|| AppError::invalid("name must not be blank"))?;
        let email = validation::email(&input.email)
            .ok_or_else(|| AppError::invalid(format!("invalid email: {}", input.email.trim())))?;
        self.require_trip(participant.trip_id).await?;

        if participant.is_confirmed {
            debug!(participant_id = %participant.id, "participant already confirmed");
            return Ok(participant);
        }

        if email != participant.email {
            let siblings = self
                .store
                .list_participants_by_trip(participant.trip_id)
                .await?;
            if siblings
                .iter()
                .any(|p| p.id != participant.id && p.email == email)
            {
                return Err(AppError::invalid(format!("{email} is already part of this trip")));
            }
        }

        participant.name = Some(name);
        participant.email = email;
        participant.is_confirmed = true;
        self.store.update_participant(&participant).await?;

        info!(participant_id = %participant.id, trip_id = %participant.trip_id, "participant confirmed");
        Ok(participant)
    }

    async fn require_trip(&self, trip_id: Uuid) -> Result<Trip, AppError> {
        self.store
            .get_trip(trip_id)
            .await?
            .ok_or(AppError::NotFound("trip"))
    }
}
