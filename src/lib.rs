#[macro_use]
extern crate rocket;

#[macro_use]
extern crate log;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod uploads;

use config::{ConfigFairing, DatabaseFairing};
use logging::LoggerFairing;

/// Assemble the server: the JSON API under `/api`, static photo serving
/// under `/uploads` (mounted by the config fairing once the directory
/// exists), error catchers, and the config/database/logging fairings.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/api", api::routes())
        .register("/", api::catchers())
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .attach(LoggerFairing)
}
