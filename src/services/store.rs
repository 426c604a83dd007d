use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{activity::Activity, link::Link, participant::Participant, trip::Trip},
};

/// Record storage used by the trip services. Lookups return `Ok(None)` for
/// unknown ids; turning that into `NotFound` is up to the caller.
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn insert_trip(&self, trip: &Trip) -> Result<(), AppError>;
    async fn update_trip(&self, trip: &Trip) -> Result<(), AppError>;
    async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, AppError>;

    async fn insert_participant(&self, participant: &Participant) -> Result<(), AppError>;
    async fn get_participant(&self, id: Uuid) -> Result<Option<Participant>, AppError>;
    async fn update_participant(&self, participant: &Participant) -> Result<(), AppError>;
    async fn list_participants_by_trip(&self, trip_id: Uuid) -> Result<Vec<Participant>, AppError>;

    async fn insert_activity(&self, activity: &Activity) -> Result<(), AppError>;
    async fn list_activities_by_trip(&self, trip_id: Uuid) -> Result<Vec<Activity>, AppError>;

    async fn insert_link(&self, link: &Link) -> Result<(), AppError>;
    async fn list_links_by_trip(&self, trip_id: Uuid) -> Result<Vec<Link>, AppError>;
}

/// `UNIQUE(trip_id, email)` also guards writes that raced past the
/// services' own duplicate check.
fn email_conflict(err: sqlx::Error, email: &str) -> AppError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::invalid(format!("{email} is already part of this trip"))
        }
        other => AppError::Database(other),
    }
}

#[derive(Clone)]
pub struct SqliteTripStore {
    db: DbPool,
}

impl SqliteTripStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TripStore for SqliteTripStore {
    async fn insert_trip(&self, trip: &Trip) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO trips (id, destination, starts_at, ends_at, is_confirmed, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(trip.id)
        .bind(&trip.destination)
        .bind(trip.starts_at)
        .bind(trip.ends_at)
        .bind(trip.is_confirmed)
        .bind(trip.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update_trip(&self, trip: &Trip) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE trips SET destination = ?1, starts_at = ?2, ends_at = ?3, is_confirmed = ?4 WHERE id = ?5",
        )
        .bind(&trip.destination)
        .bind(trip.starts_at)
        .bind(trip.ends_at)
        .bind(trip.is_confirmed)
        .bind(trip.id)
        .execute(&self.db)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("trip"));
        }
        Ok(())
    }

    async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>(
            "SELECT id, destination, starts_at, ends_at, is_confirmed, created_at FROM trips WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(trip)
    }

    async fn insert_participant(&self, participant: &Participant) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO participants (id, trip_id, name, email, is_owner, is_confirmed, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(participant.id)
        .bind(participant.trip_id)
        .bind(&participant.name)
        .bind(&participant.email)
        .bind(participant.is_owner)
        .bind(participant.is_confirmed)
        .bind(participant.created_at)
        .execute(&self.db)
        .await
        .map_err(|err| email_conflict(err, &participant.email))?;
        Ok(())
    }

    async fn get_participant(&self, id: Uuid) -> Result<Option<Participant>, AppError> {
        let participant = sqlx::query_as::<_, Participant>(
            "SELECT id, trip_id, name, email, is_owner, is_confirmed, created_at FROM participants WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(participant)
    }

    async fn update_participant(&self, participant: &Participant) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE participants SET name = ?1, email = ?2, is_confirmed = ?3 WHERE id = ?4",
        )
        .bind(&participant.name)
        .bind(&participant.email)
        .bind(participant.is_confirmed)
        .bind(participant.id)
        .execute(&self.db)
        .await
        .map_err(|err| email_conflict(err, &participant.email))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("participant"));
        }
        Ok(())
    }

    async fn list_participants_by_trip(&self, trip_id: Uuid) -> Result<Vec<Participant>, AppError> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"SELECT id, trip_id, name, email, is_owner, is_confirmed, created_at
               FROM participants WHERE trip_id = ?1
               ORDER BY is_owner DESC, created_at ASC, rowid ASC"#,
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;
        Ok(participants)
    }

    async fn insert_activity(&self, activity: &Activity) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO activities (id, trip_id, title, occurs_at, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(activity.id)
        .bind(activity.trip_id)
        .bind(&activity.title)
        .bind(activity.occurs_at)
        .bind(activity.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn list_activities_by_trip(&self, trip_id: Uuid) -> Result<Vec<Activity>, AppError> {
        let activities = sqlx::query_as::<_, Activity>(
            "SELECT id, trip_id, title, occurs_at, created_at FROM activities WHERE trip_id = ?1 ORDER BY occurs_at ASC",
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;
        Ok(activities)
    }

    async fn insert_link(&self, link: &Link) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO links (id, trip_id, title, url, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(link.id)
        .bind(link.trip_id)
        .bind(&link.title)
        .bind(&link.url)
        .bind(link.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn list_links_by_trip(&self, trip_id: Uuid) -> Result<Vec<Link>, AppError> {
        let links = sqlx::query_as::<_, Link>(
            "SELECT id, trip_id, title, url, created_at FROM links WHERE trip_id = ?1 ORDER BY created_at ASC, rowid ASC",
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;
        Ok(links)
    }
}
