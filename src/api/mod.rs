use rocket::{http::Status, serde::json::Json, Catcher, Request, Route};
use serde::Serialize;

mod admin;
mod auth;
mod common;
mod results;
mod voter;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(auth::routes());
    routes.extend(admin::routes());
    routes.extend(voter::routes());
    routes.extend(results::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}

/// JSON body returned for any error status.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    msg: String,
}

#[catch(default)]
fn default_catcher(status: Status, _req: &Request) -> (Status, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            msg: status.reason_lossy().to_string(),
        }),
    )
}
