use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::calendar::{self, DateRange};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub destination: String,
    pub starts_at: NaiveDate,
    pub ends_at: NaiveDate,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// Persisted trips are either waiting for the organizer's confirmation or
/// active. Unsaved trips live in a [`crate::draft::TripDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Pending,
    Active,
}

impl Trip {
    pub fn status(&self) -> TripStatus {
        if self.is_confirmed {
            TripStatus::Active
        } else {
            TripStatus::Pending
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange::between(self.starts_at, self.ends_at)
    }

    /// Boundary-inclusive: any moment of the first or last day is inside.
    pub fn covers(&self, moment: DateTime<Utc>) -> bool {
        let day = moment.date_naive();
        self.starts_at <= day && day <= self.ends_at
    }

    pub fn when(&self) -> String {
        calendar::when_label(&self.destination, self.starts_at, self.ends_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripDetails {
    pub id: Uuid,
    pub destination: String,
    pub starts_at: NaiveDate,
    pub ends_at: NaiveDate,
    pub is_confirmed: bool,
    pub status: TripStatus,
    pub when: String,
}

impl From<Trip> for TripDetails {
    fn from(trip: Trip) -> Self {
        Self {
            when: trip.when(),
            status: trip.status(),
            id: trip.id,
            destination: trip.destination,
            starts_at: trip.starts_at,
            ends_at: trip.ends_at,
            is_confirmed: trip.is_confirmed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrip {
    pub destination: String,
    pub starts_at: NaiveDate,
    pub ends_at: NaiveDate,
    pub owner_email: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub emails_to_invite: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripUpdate {
    pub destination: String,
    pub starts_at: NaiveDate,
    pub ends_at: NaiveDate,
}
