use std::{env, net::SocketAddr};

use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    /// Base of the links sent to invitees and of the trip-confirmation redirect.
    pub web_base_url: Url,
    pub confirm_trips_on_create: bool,
    pub reject_past_trips: bool,
    pub invite_template: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://planner.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3333".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let web_base_url = parse_base_url(
            &env::var("WEB_BASE_URL").unwrap_or_else(|_| "http://localhost:3000/".to_string()),
        )?;

        let confirm_trips_on_create = env_flag("TRIP_CONFIRM_ON_CREATE", true)?;
        let reject_past_trips = env_flag("TRIP_REJECT_PAST", false)?;

        let invite_template = env::var("INVITE_TEMPLATE")
            .ok()
            .filter(|value| !value.trim().is_empty());

        Ok(Self {
            database_url,
            listen_addr,
            web_base_url,
            confirm_trips_on_create,
            reject_past_trips,
            invite_template,
        })
    }
}

/// Parses a base URL and makes sure it ends with `/` so that `Url::join`
/// appends to it instead of replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|err| AppError::Config(format!("invalid WEB_BASE_URL: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(AppError::Config(format!(
            "WEB_BASE_URL cannot be used as a base: {raw}"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn env_flag(name: &str, default: bool) -> Result<bool, AppError> {
    match env::var(name) {
        Ok(raw) => parse_flag(&raw)
            .ok_or_else(|| AppError::Config(format!("invalid {name}: expected a boolean, got {raw:?}"))),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
