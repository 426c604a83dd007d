use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        activity::{Activity, DayActivities, NewActivity, ScheduledActivity},
        trip::Trip,
    },
    services::store::TripStore,
    validation,
};

#[derive(Clone)]
pub struct ActivityService {
    store: Arc<dyn TripStore>,
}

impl ActivityService {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self { store }
    }

    pub async fn create_activity(&self, trip_id: Uuid, input: NewActivity) -> Result<Activity, AppError> {
        let trip = self
            .store
            .get_trip(trip_id)
            .await?
            .ok_or(AppError::NotFound("trip"))?;
        let title = validation::required_text(&input.title)
            .ok_or_else(|| AppError::invalid("activity title must not be blank"))?;
        if !trip.covers(input.occurs_at) {
            return Err(AppError::invalid(format!(
                "activity must happen between {} and {}",
                trip.starts_at, trip.ends_at
            )));
        }

        let activity = Activity {
            id: Uuid::new_v4(),
            trip_id: trip.id,
            title,
            occurs_at: input.occurs_at,
            created_at: Utc::now(),
        };
        self.store.insert_activity(&activity).await?;

        info!(trip_id = %trip.id, activity_id = %activity.id, "activity created");
        Ok(activity)
    }

    pub async fn list_activities(&self, trip_id: Uuid) -> Result<Vec<DayActivities>, AppError> {
        let trip = self
            .store
            .get_trip(trip_id)
            .await?
            .ok_or(AppError::NotFound("trip"))?;
        let activities = self.store.list_activities_by_trip(trip.id).await?;
        Ok(group_by_day(&trip, activities, Utc::now()))
    }
}

/// One group per day of the trip, empty days included. Activities whose day
/// is no longer inside the trip (after its dates changed) are left out.
pub fn group_by_day(trip: &Trip, mut activities: Vec<Activity>, now: DateTime<Utc>) -> Vec<DayActivities> {
    activities.sort_by(|a, b| a.occurs_at.cmp(&b.occurs_at));
    trip.range()
        .highlighted_days()
        .into_iter()
        .map(|date| DayActivities {
            date,
            activities: activities
                .iter()
                .filter(|activity| activity.occurs_at.date_naive() == date)
                .map(|activity| ScheduledActivity {
                    id: activity.id,
                    title: activity.title.clone(),
                    occurs_at: activity.occurs_at,
                    is_past: activity.occurs_at < now,
                })
                .collect(),
        })
        .collect()
}
