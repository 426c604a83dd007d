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
    models::link::{Link, NewLink},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/trips/:trip_id/links", get(trip_links).post(create_link))
}

#[derive(Serialize)]
struct LinkResponse {
    link: Link,
}

#[derive(Serialize)]
struct LinksResponse {
    links: Vec<Link>,
}

async fn create_link(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(body): Json<NewLink>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let link = state.links.create_link(trip_id, body).await?;
    Ok((StatusCode::CREATED, Json(LinkResponse { link })))
}

async fn trip_links(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<LinksResponse>, AppError> {
    let links = state.links.list_links(trip_id).await?;
    Ok(Json(LinksResponse { links }))
}
