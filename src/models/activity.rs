use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

/// An activity as listed to a participant; `is_past` is computed at read time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledActivity {
    pub id: Uuid,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
    pub is_past: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayActivities {
    pub date: NaiveDate,
    pub activities: Vec<ScheduledActivity>,
}
