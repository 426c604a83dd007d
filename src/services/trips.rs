use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::AppError,
    models::{
        participant::Participant,
        trip::{NewTrip, Trip, TripDetails, TripUpdate},
    },
    services::{mailer::InviteOutbox, store::TripStore},
    validation,
};

/// Switches for the creation rules that are deployment choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripPolicy {
    /// Persist new trips as already confirmed and invite right away.
    pub confirm_on_create: bool,
    /// Refuse trips whose last day is before today.
    pub reject_past_trips: bool,
}

impl Default for TripPolicy {
    fn default() -> Self {
        Self {
            confirm_on_create: true,
            reject_past_trips: false,
        }
    }
}

impl From<&AppConfig> for TripPolicy {
    fn from(config: &AppConfig) -> Self {
        Self {
            confirm_on_create: config.confirm_trips_on_create,
            reject_past_trips: config.reject_past_trips,
        }
    }
}

#[derive(Clone)]
pub struct TripService {
    store: Arc<dyn TripStore>,
    outbox: InviteOutbox,
    policy: TripPolicy,
}

impl TripService {
    pub fn new(store: Arc<dyn TripStore>, outbox: InviteOutbox, policy: TripPolicy) -> Self {
        Self {
            store,
            outbox,
            policy,
        }
    }

    pub async fn create_trip(&self, input: NewTrip) -> Result<Uuid, AppError> {
        let destination = checked_destination(&input.destination)?;
        let (starts_at, ends_at) = checked_range(input.starts_at, input.ends_at)?;
        if self.policy.reject_past_trips && ends_at < Utc::now().date_naive() {
            return Err(AppError::invalid("trip cannot end in the past"));
        }
        let owner_email = validation::email(&input.owner_email)
            .ok_or_else(|| AppError::invalid(format!("invalid organizer email: {}", input.owner_email.trim())))?;
        let invitees = invitee_emails(&owner_email, &input.emails_to_invite)?;
        let owner_name = input
            .owner_name
            .as_deref()
            .and_then(validation::required_text);

        let trip = Trip {
            id: Uuid::new_v4(),
            destination,
            starts_at,
            ends_at,
            is_confirmed: self.policy.confirm_on_create,
            created_at: Utc::now(),
        };
        self.store.insert_trip(&trip).await?;
        // Writes are not transactional: a failed owner insert leaves the trip
        // row behind without its owner.
        if let Err(err) = self
            .store
            .insert_participant(&Participant::owner(trip.id, owner_email, owner_name))
            .await
        {
            warn!(trip_id = %trip.id, "trip stored without an owner: {err}");
            return Err(err);
        }

        let mut guests = Vec::with_capacity(invitees.len());
        for email in invitees {
            let guest = Participant::invitee(trip.id, email);
            self.store.insert_participant(&guest).await?;
            guests.push(guest);
        }

        if trip.is_confirmed {
            for guest in &guests {
                self.outbox.invite(&trip, guest);
            }
        }

        info!(
            trip_id = %trip.id,
            invitees = guests.len(),
            confirmed = trip.is_confirmed,
            "trip created"
        );
        Ok(trip.id)
    }

    /// Rewrites destination and dates. Participants are untouched and
    /// activities already outside the new range stay where they are.
    pub async fn update_trip(&self, trip_id: Uuid, input: TripUpdate) -> Result<Trip, AppError> {
        let mut trip = self.require_trip(trip_id).await?;
        let destination = checked_destination(&input.destination)?;
        let (starts_at, ends_at) = checked_range(input.starts_at, input.ends_at)?;

        trip.destination = destination;
        trip.starts_at = starts_at;
        trip.ends_at = ends_at;
        self.store.update_trip(&trip).await?;

        info!(trip_id = %trip.id, %starts_at, %ends_at, "trip updated");
        Ok(trip)
    }

    pub async fn get_trip(&self, trip_id: Uuid) -> Result<TripDetails, AppError> {
        Ok(self.require_trip(trip_id).await?.into())
    }

    /// Activates a pending trip and sends the invites it was holding back.
    /// Confirming an active trip changes nothing.
    pub async fn confirm_trip(&self, trip_id: Uuid) -> Result<Trip, AppError> {
        let mut trip = self.require_trip(trip_id).await?;
        if trip.is_confirmed {
            return Ok(trip);
        }

        trip.is_confirmed = true;
        self.store.update_trip(&trip).await?;

        let participants = self.store.list_participants_by_trip(trip.id).await?;
        let mut invited = 0;
        for participant in participants
            .iter()
            .filter(|p| !p.is_owner && !p.is_confirmed)
        {
            self.outbox.invite(&trip, participant);
            invited += 1;
        }

        info!(trip_id = %trip.id, invited, "trip confirmed");
        Ok(trip)
    }

    pub fn outbox(&self) -> &InviteOutbox {
        &self.outbox
    }

    async fn require_trip(&self, trip_id: Uuid) -> Result<Trip, AppError> {
        self.store
            .get_trip(trip_id)
            .await?
            .ok_or(AppError::NotFound("trip"))
    }
}

fn checked_destination(raw: &str) -> Result<String, AppError> {
    validation::destination(raw).ok_or_else(|| {
        AppError::invalid(format!(
            "destination must have at least {} characters",
            validation::MIN_DESTINATION_LEN
        ))
    })
}

fn checked_range(starts_at: NaiveDate, ends_at: NaiveDate) -> Result<(NaiveDate, NaiveDate), AppError> {
    validation::date_range(Some(starts_at), Some(ends_at))
        .ok_or_else(|| AppError::invalid("trip end date must not be before its start date"))
}

/// Normalized, de-duplicated invitee list without the organizer.
fn invitee_emails(owner_email: &str, raw: &[String]) -> Result<Vec<String>, AppError> {
    let mut emails: Vec<String> = Vec::with_capacity(raw.len());
    for entry in raw {
        let email = validation::email(entry)
            .ok_or_else(|| AppError::invalid(format!("invalid invitee email: {}", entry.trim())))?;
        if email != owner_email && !emails.contains(&email) {
            emails.push(email);
        }
    }
    Ok(emails)
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::services::{mailer::InviteEmail, testing};

    fn jan(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn rio() -> NewTrip {
        NewTrip {
            destination: "Rio de Janeiro".into(),
            starts_at: jan(10),
            ends_at: jan(15),
            owner_email: "a@x.com".into(),
            owner_name: Some("Ana".into()),
            emails_to_invite: vec!["b@x.com".into(), "c@x.com".into()],
        }
    }

    fn drain(rx: &mut UnboundedReceiver<InviteEmail>) -> Vec<InviteEmail> {
        let mut out = Vec::new();
        while let Ok(invite) = rx.try_recv() {
            out.push(invite);
        }
        out
    }

    #[tokio::test]
    async fn create_trip_persists_owner_and_invitees() {
        let (store, outbox, mut rx) = testing::harness().await;
        let trips = TripService::new(store.clone(), outbox, TripPolicy::default());

        let trip_id = trips.create_trip(rio()).await.unwrap();

        let participants = store.list_participants_by_trip(trip_id).await.unwrap();
        assert_eq!(participants.len(), 3);
        let owner = &participants[0];
        assert!(owner.is_owner && owner.is_confirmed);
        assert_eq!(owner.email, "a@x.com");
        assert_eq!(owner.name.as_deref(), Some("Ana"));
        assert_eq!(participants.iter().filter(|p| p.is_owner).count(), 1);
        assert!(participants[1..].iter().all(|p| !p.is_confirmed && p.name.is_none()));

        let invites = drain(&mut rx);
        assert_eq!(invites.len(), 2);
        assert!(invites.iter().all(|i| i.trip_id == trip_id));

        let details = trips.get_trip(trip_id).await.unwrap();
        assert!(details.is_confirmed);
        assert_eq!(details.when, "Rio de Ja... from 10 to 15 of Jan");
    }

    #[tokio::test]
    async fn invitee_list_is_normalized() {
        let (store, outbox, mut rx) = testing::harness().await;
        let trips = TripService::new(store.clone(), outbox, TripPolicy::default());

        let mut input = rio();
        input.emails_to_invite = vec!["B@x.com".into(), "b@X.com".into(), " A@x.com ".into()];
        let trip_id = trips.create_trip(input).await.unwrap();

        let participants = store.list_participants_by_trip(trip_id).await.unwrap();
        let emails: Vec<_> = participants.iter().map(|p| p.email.as_str()).collect();
        assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn create_trip_rejects_invalid_input() {
        let (store, outbox, mut rx) = testing::harness().await;
        let trips = TripService::new(store, outbox, TripPolicy::default());

        let mut short = rio();
        short.destination = " Rio ".into();
        assert!(trips.create_trip(short).await.unwrap_err().is_invalid_input());

        let mut inverted = rio();
        inverted.ends_at = jan(9);
        assert!(trips.create_trip(inverted).await.unwrap_err().is_invalid_input());

        let mut bad_guest = rio();
        bad_guest.emails_to_invite.push("not-an-email".into());
        assert!(trips.create_trip(bad_guest).await.unwrap_err().is_invalid_input());

        let mut bad_owner = rio();
        bad_owner.owner_email = "owner".into();
        assert!(trips.create_trip(bad_owner).await.unwrap_err().is_invalid_input());

        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn past_trips_follow_policy() {
        let (store, outbox, _rx) = testing::harness().await;
        let strict = TripService::new(
            store.clone(),
            outbox.clone(),
            TripPolicy {
                reject_past_trips: true,
                ..TripPolicy::default()
            },
        );
        assert!(strict.create_trip(rio()).await.unwrap_err().is_invalid_input());

        let mut future = rio();
        let today = Utc::now().date_naive();
        future.starts_at = today;
        future.ends_at = today;
        assert!(strict.create_trip(future).await.is_ok());

        let lenient = TripService::new(store, outbox, TripPolicy::default());
        assert!(lenient.create_trip(rio()).await.is_ok());
    }

    #[tokio::test]
    async fn update_trip_validates_and_keeps_state_on_failure() {
        let (store, outbox, _rx) = testing::harness().await;
        let trips = TripService::new(store, outbox, TripPolicy::default());
        let trip_id = trips.create_trip(rio()).await.unwrap();

        let err = trips
            .update_trip(
                trip_id,
                TripUpdate {
                    destination: "Paris".into(),
                    starts_at: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                    ends_at: jan(30),
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
        let unchanged = trips.get_trip(trip_id).await.unwrap();
        assert_eq!(unchanged.destination, "Rio de Janeiro");
        assert_eq!((unchanged.starts_at, unchanged.ends_at), (jan(10), jan(15)));

        let updated = trips
            .update_trip(
                trip_id,
                TripUpdate {
                    destination: " Paris ".into(),
                    starts_at: jan(20),
                    ends_at: jan(22),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.destination, "Paris");
        assert_eq!(trips.get_trip(trip_id).await.unwrap().when, "Paris from 20 to 22 of Jan");
    }

    #[tokio::test]
    async fn unknown_trip_is_not_found() {
        let (store, outbox, _rx) = testing::harness().await;
        let trips = TripService::new(store, outbox, TripPolicy::default());
        let missing = Uuid::new_v4();

        assert!(trips.get_trip(missing).await.unwrap_err().is_not_found());
        assert!(trips.confirm_trip(missing).await.unwrap_err().is_not_found());
        let update = TripUpdate {
            destination: "Paris".into(),
            starts_at: jan(1),
            ends_at: jan(2),
        };
        assert!(trips.update_trip(missing, update).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn pending_trip_defers_invites_until_confirmed() {
        let (store, outbox, mut rx) = testing::harness().await;
        let trips = TripService::new(
            store,
            outbox,
            TripPolicy {
                confirm_on_create: false,
                ..TripPolicy::default()
            },
        );

        let trip_id = trips.create_trip(rio()).await.unwrap();
        assert!(!trips.get_trip(trip_id).await.unwrap().is_confirmed);
        assert!(drain(&mut rx).is_empty());

        let trip = trips.confirm_trip(trip_id).await.unwrap();
        assert!(trip.is_confirmed);
        let invites = drain(&mut rx);
        let mut recipients: Vec<_> = invites.iter().map(|i| i.recipient.as_str()).collect();
        recipients.sort_unstable();
        assert_eq!(recipients, vec!["b@x.com", "c@x.com"]);

        trips.confirm_trip(trip_id).await.unwrap();
        assert!(drain(&mut rx).is_empty());
    }
}
