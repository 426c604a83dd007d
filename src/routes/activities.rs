use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::activity::{Activity, DayActivities, NewActivity},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/trips/:trip_id/activities",
        get(trip_activities).post(create_activity),
    )
}

#[derive(Serialize)]
struct ActivityResponse {
    activity: Activity,
}

#[derive(Serialize)]
struct ActivitiesResponse {
    activities: Vec<DayActivities>,
}

async fn create_activity(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(body): Json<NewActivity>,
) -> Result<(StatusCode, Json<ActivityResponse>), AppError> {
    let activity = state.activities.create_activity(trip_id, body).await?;
    Ok((StatusCode::CREATED, Json(ActivityResponse { activity })))
}

async fn trip_activities(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<ActivitiesResponse>, AppError> {
    let activities = state.activities.list_activities(trip_id).await?;
    Ok(Json(ActivitiesResponse { activities }))
}
