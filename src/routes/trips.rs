use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::trip::{NewTrip, TripDetails, TripUpdate},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", post(create_trip))
        .route("/trips/:trip_id", get(trip_details).put(update_trip))
        .route("/trips/:trip_id/confirm", get(confirm_trip))
}

#[derive(Serialize)]
struct TripIdResponse {
    trip_id: Uuid,
}

#[derive(Serialize)]
struct TripResponse {
    trip: TripDetails,
}

async fn create_trip(
    State(state): State<AppState>,
    Json(body): Json<NewTrip>,
) -> Result<(StatusCode, Json<TripIdResponse>), AppError> {
    let trip_id = state.trips.create_trip(body).await?;
    Ok((StatusCode::CREATED, Json(TripIdResponse { trip_id })))
}

async fn trip_details(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripResponse>, AppError> {
    let trip = state.trips.get_trip(trip_id).await?;
    Ok(Json(TripResponse { trip }))
}

async fn update_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(body): Json<TripUpdate>,
) -> Result<Json<TripIdResponse>, AppError> {
    let trip = state.trips.update_trip(trip_id, body).await?;
    Ok(Json(TripIdResponse { trip_id: trip.id }))
}

/// Target of the organizer's confirmation link; lands on the trip page.
async fn confirm_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Redirect, AppError> {
    let trip = state.trips.confirm_trip(trip_id).await?;
    let page = state.trips.outbox().trip_page(trip.id)?;
    Ok(Redirect::to(page.as_str()))
}
