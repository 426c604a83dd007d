use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        link::{Link, NewLink},
        trip::Trip,
    },
    services::store::TripStore,
    validation,
};

#[derive(Clone)]
pub struct LinkService {
    store: Arc<dyn TripStore>,
}

impl LinkService {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self { store }
    }

    pub async fn create_link(&self, trip_id: Uuid, input: NewLink) -> Result<Link, AppError> {
        let trip = self.require_trip(trip_id).await?;
        let title = validation::required_text(&input.title)
            .ok_or_else(|| AppError::invalid("link title must not be blank"))?;
        let url = validation::url(&input.url)
            .ok_or_else(|| AppError::invalid(format!("invalid url: {}", input.url.trim())))?;

        let link = Link {
            id: Uuid::new_v4(),
            trip_id: trip.id,
            title,
            url: url.to_string(),
            created_at: Utc::now(),
        };
        self.store.insert_link(&link).await?;

        info!(trip_id = %trip.id, link_id = %link.id, "link created");
        Ok(link)
    }

    pub async fn list_links(&self, trip_id: Uuid) -> Result<Vec<Link>, AppError> {
        let trip = self.require_trip(trip_id).await?;
        self.store.list_links_by_trip(trip.id).await
    }

    async fn require_trip(&self, trip_id: Uuid) -> Result<Trip, AppError> {
        self.store
            .get_trip(trip_id)
            .await?
            .ok_or(AppError::NotFound("trip"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::services::testing;

    async fn setup() -> (LinkService, Uuid) {
        let (store, _outbox, _rx) = testing::harness().await;
        let trip = Trip {
            id: Uuid::new_v4(),
            destination: "Kyoto".into(),
            starts_at: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            ends_at: NaiveDate::from_ymd_opt(2025, 4, 9).unwrap(),
            is_confirmed: true,
            created_at: Utc::now(),
        };
        store.insert_trip(&trip).await.unwrap();
        (LinkService::new(store), trip.id)
    }

    #[tokio::test]
    async fn links_are_stored_in_order() {
        let (links, trip_id) = setup().await;
        links
            .create_link(
                trip_id,
                NewLink {
                    title: "Hotel".into(),
                    url: "https://booking.com/hotel/1".into(),
                },
            )
            .await
            .unwrap();
        links
            .create_link(
                trip_id,
                NewLink {
                    title: "Train".into(),
                    url: " https://jr.jp/tickets ".into(),
                },
            )
            .await
            .unwrap();

        let stored = links.list_links(trip_id).await.unwrap();
        let titles: Vec<_> = stored.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Hotel", "Train"]);
        assert_eq!(stored[1].url, "https://jr.jp/tickets");
    }

    #[tokio::test]
    async fn invalid_links_are_rejected() {
        let (links, trip_id) = setup().await;
        let relative = NewLink {
            title: "Hotel".into(),
            url: "booking.com".into(),
        };
        assert!(links.create_link(trip_id, relative).await.unwrap_err().is_invalid_input());

        let untitled = NewLink {
            title: "".into(),
            url: "https://booking.com".into(),
        };
        assert!(links.create_link(trip_id, untitled).await.unwrap_err().is_invalid_input());

        assert!(links.list_links(Uuid::new_v4()).await.unwrap_err().is_not_found());
    }
}
