use mongodb::bson::doc;
use rocket::{serde::json::Json, Route, State};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    api::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    db::{NewUser, Role, User},
    mongodb::{is_duplicate_key_error, Coll},
};

pub fn routes() -> Vec<Route> {
    routes![register, login]
}

#[post("/register", data = "<request>", format = "json")]
async fn register(request: Json<RegisterRequest>, users: Coll<NewUser>) -> Result<()> {
    let request = request.0;
    if request.name.is_empty() || request.email.is_empty() || request.password.is_empty() {
        return Err(Error::bad_request(
            "Name, email, and password are all required",
        ));
    }

    let user = NewUser::new(
        request.name,
        request.email,
        &request.password,
        request.role.unwrap_or(Role::Voter),
    )?;

    // The unique email index arbitrates duplicate registrations; no
    // check-then-insert race.
    let result = users.insert_one(&user, None).await;
    if is_duplicate_key_error(result.as_ref().map(|_| ())) {
        return Err(Error::conflict(format!(
            "Email already registered: {}",
            user.email
        )));
    }
    result?;

    Ok(())
}

#[post("/login", data = "<request>", format = "json")]
async fn login(
    request: Json<LoginRequest>,
    users: Coll<User>,
    config: &State<Config>,
) -> Result<Json<LoginResponse>> {
    let with_email = doc! {
        "email": &request.email,
    };

    let user = users
        .find_one(with_email, None)
        .await?
        .filter(|user| user.verify_password(&request.password))
        .ok_or_else(|| {
            Error::unauthorized("No user found with the provided email and password combination.")
        })?;

    let token = Claims::for_user(&user, config).encode(config);

    Ok(Json(LoginResponse {
        token,
        role: user.role,
    }))
}
