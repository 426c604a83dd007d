use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub is_owner: bool,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    Invited,
    Confirmed,
}

impl Participant {
    pub fn owner(trip_id: Uuid, email: String, name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            trip_id,
            name,
            email,
            is_owner: true,
            is_confirmed: true,
            created_at: Utc::now(),
        }
    }

    pub fn invitee(trip_id: Uuid, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            trip_id,
            name: None,
            email,
            is_owner: false,
            is_confirmed: false,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> ParticipantStatus {
        if self.is_confirmed {
            ParticipantStatus::Confirmed
        } else {
            ParticipantStatus::Invited
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmParticipant {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvite {
    pub email: String,
}
