use std::sync::Arc;

use crate::{
    config::AppConfig,
    services::{
        activities::ActivityService,
        links::LinkService,
        mailer::InviteOutbox,
        participants::ParticipantService,
        store::TripStore,
        trips::{TripPolicy, TripService},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub trips: TripService,
    pub participants: ParticipantService,
    pub activities: ActivityService,
    pub links: LinkService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn TripStore>, outbox: InviteOutbox) -> Self {
        let policy = TripPolicy::from(&config);
        Self {
            trips: TripService::new(store.clone(), outbox.clone(), policy),
            participants: ParticipantService::new(store.clone(), outbox),
            activities: ActivityService::new(store.clone()),
            links: LinkService::new(store),
            config,
        }
    }
}
