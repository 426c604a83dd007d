pub mod activities;
pub mod links;
pub mod mailer;
pub mod participants;
pub mod store;
pub mod trips;
