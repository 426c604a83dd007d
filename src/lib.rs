pub mod calendar;
pub mod config;
pub mod db;
pub mod draft;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
