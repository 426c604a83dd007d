pub mod activities;
pub mod links;
pub mod participants;
pub mod trips;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(trips::router())
        .merge(participants::router())
        .merge(activities::router())
        .merge(links::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
