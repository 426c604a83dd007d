use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{participant::Participant, trip::Trip},
};

pub const DEFAULT_INVITE_TEMPLATE: &str = "You were invited to a trip to {destination} from {starts_at} to {ends_at}. Confirm your presence: {link}";

/// Command to deliver one participant-scoped invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteEmail {
    pub participant_id: Uuid,
    pub trip_id: Uuid,
    pub recipient: String,
    pub destination: String,
    pub starts_at: NaiveDate,
    pub ends_at: NaiveDate,
    pub confirmation_link: Url,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_invite(&self, invite: &InviteEmail) -> Result<(), AppError>;
}

/// Queue side of invite delivery. Mutations push commands here and move on;
/// whether the mail ever leaves is the worker's concern.
#[derive(Clone)]
pub struct InviteOutbox {
    sender: UnboundedSender<InviteEmail>,
    web_base_url: Url,
}

impl InviteOutbox {
    pub fn channel(web_base_url: Url) -> (Self, UnboundedReceiver<InviteEmail>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender,
                web_base_url,
            },
            receiver,
        )
    }

    pub fn confirmation_link(&self, trip_id: Uuid, participant_id: Uuid) -> Result<Url, AppError> {
        let mut link = self
            .web_base_url
            .join(&format!("trip/{trip_id}"))
            .map_err(|err| AppError::Other(err.into()))?;
        link.query_pairs_mut()
            .append_pair("participant", &participant_id.to_string());
        Ok(link)
    }

    pub fn trip_page(&self, trip_id: Uuid) -> Result<Url, AppError> {
        self.web_base_url
            .join(&format!("trip/{trip_id}"))
            .map_err(|err| AppError::Other(err.into()))
    }

    /// Queues an invite for `participant`. Never fails the caller.
    pub fn invite(&self, trip: &Trip, participant: &Participant) {
        let confirmation_link = match self.confirmation_link(trip.id, participant.id) {
            Ok(link) => link,
            Err(err) => {
                warn!(participant_id = %participant.id, "could not build confirmation link: {err}");
                return;
            }
        };
        let command = InviteEmail {
            participant_id: participant.id,
            trip_id: trip.id,
            recipient: participant.email.clone(),
            destination: trip.destination.clone(),
            starts_at: trip.starts_at,
            ends_at: trip.ends_at,
            confirmation_link,
        };
        if self.sender.send(command).is_err() {
            warn!(participant_id = %participant.id, "invite queue closed, invite dropped");
        } else {
            debug!(participant_id = %participant.id, trip_id = %trip.id, "invite queued");
        }
    }
}

/// Drains the invite queue until every sender is gone.
pub fn spawn_invite_worker(
    mut receiver: UnboundedReceiver<InviteEmail>,
    mailer: Arc<dyn Mailer>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(invite) = receiver.recv().await {
            if let Err(err) = mailer.send_invite(&invite).await {
                warn!(
                    participant_id = %invite.participant_id,
                    trip_id = %invite.trip_id,
                    "invite delivery failed: {err}"
                );
            }
        }
        debug!("invite worker stopped");
    })
}

/// Renders invites and writes them to the log instead of an SMTP relay.
#[derive(Clone)]
pub struct LogMailer {
    template: String,
}

impl LogMailer {
    pub fn new(template: Option<String>) -> Self {
        Self {
            template: template.unwrap_or_else(|| DEFAULT_INVITE_TEMPLATE.to_string()),
        }
    }

    pub fn render(&self, invite: &InviteEmail) -> String {
        let mut message = self.template.clone();
        message = message.replace("{destination}", &invite.destination);
        message = message.replace("{starts_at}", &invite.starts_at.format("%d/%m/%Y").to_string());
        message = message.replace("{ends_at}", &invite.ends_at.format("%d/%m/%Y").to_string());
        message = message.replace("{link}", invite.confirmation_link.as_str());
        message
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_invite(&self, invite: &InviteEmail) -> Result<(), AppError> {
        let body = self.render(invite);
        info!(to = %invite.recipient, participant_id = %invite.participant_id, "invite: {body}");
        Ok(())
    }
}
