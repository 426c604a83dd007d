//! Two-step trip creation form, kept as a value that every transition consumes
//! and returns instead of state living inside a screen.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    calendar::DateRange,
    models::trip::NewTrip,
    validation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftStep {
    #[default]
    TripDetails,
    AddEmails,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("fill in the destination and both trip dates")]
    MissingDetails,
    #[error("destination must have at least 4 characters")]
    DestinationTooShort,
    #[error("invalid email: {0}")]
    InvalidEmail(String),
    #[error("{0} was already added")]
    DuplicateEmail(String),
    #[error("not allowed in the {0:?} step")]
    WrongStep(DraftStep),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripDraft {
    pub step: DraftStep,
    pub destination: String,
    pub range: DateRange,
    pub invitees: Vec<String>,
}

impl TripDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn pick_day(mut self, day: NaiveDate) -> Result<Self, DraftError> {
        if self.step != DraftStep::TripDetails {
            return Err(DraftError::WrongStep(self.step));
        }
        self.range = self.range.resolve(day);
        Ok(self)
    }

    /// Moves from the details step to the invite step once the details hold.
    pub fn advance(mut self) -> Result<Self, DraftError> {
        if self.step != DraftStep::TripDetails {
            return Err(DraftError::WrongStep(self.step));
        }
        self.check_details()?;
        self.step = DraftStep::AddEmails;
        Ok(self)
    }

    pub fn edit_details(mut self) -> Self {
        self.step = DraftStep::TripDetails;
        self
    }

    pub fn add_invitee(mut self, raw: &str) -> Result<Self, DraftError> {
        let email =
            validation::email(raw).ok_or_else(|| DraftError::InvalidEmail(raw.trim().to_string()))?;
        if self.invitees.contains(&email) {
            return Err(DraftError::DuplicateEmail(email));
        }
        self.invitees.push(email);
        Ok(self)
    }

    pub fn remove_invitee(mut self, raw: &str) -> Self {
        let target = raw.trim().to_ascii_lowercase();
        self.invitees.retain(|email| *email != target);
        self
    }

    pub fn when(&self) -> Option<String> {
        self.range.label(&self.destination)
    }

    /// The request submitted when the organizer confirms the trip.
    pub fn into_new_trip(
        self,
        owner_email: impl Into<String>,
        owner_name: Option<String>,
    ) -> Result<NewTrip, DraftError> {
        if self.step != DraftStep::AddEmails {
            return Err(DraftError::WrongStep(self.step));
        }
        let (starts_at, ends_at) = self.check_details()?;
        Ok(NewTrip {
            destination: self.destination.trim().to_string(),
            starts_at,
            ends_at,
            owner_email: owner_email.into(),
            owner_name,
            emails_to_invite: self.invitees,
        })
    }

    fn check_details(&self) -> Result<(NaiveDate, NaiveDate), DraftError> {
        if self.destination.trim().is_empty() {
            return Err(DraftError::MissingDetails);
        }
        let Some(bounds) = validation::date_range(self.range.start, self.range.end) else {
            return Err(DraftError::MissingDetails);
        };
        if validation::destination(&self.destination).is_none() {
            return Err(DraftError::DestinationTooShort);
        }
        Ok(bounds)
    }
}
