use std::marker::PhantomData;

use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use mongodb::bson::doc;
use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::model::{
    db::{Role, User},
    mongodb::{Coll, Id},
};

use super::user::Access;

/// The signed claims inside a bearer token: who the user is, which role they
/// held when they logged in, and when the token expires.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub id: Id,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "exp", with = "ts_seconds")]
    pub expire_at: DateTime<Utc>,
}

impl Claims {
    /// Claims for the given user, expiring `auth_ttl` from now.
    pub fn for_user(user: &User, config: &Config) -> Self {
        Self {
            id: user.id,
            role: user.role,
            expire_at: Utc::now() + config.auth_ttl(),
        }
    }

    /// Sign these claims into a bearer token.
    #[allow(clippy::missing_panics_doc)]
    pub fn encode(&self, config: &Config) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .expect("JWT encoding is infallible with default settings")
    }

    /// Verify and decode a bearer token. Expired or tampered tokens fail here.
    pub fn decode(token: &str, config: &Config) -> Result<Self, Error> {
        let data: TokenData<Claims> = jsonwebtoken::decode(
            token,
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

/// A verified authentication token for access level `U`.
///
/// As a request guard this reads the `Authorization: Bearer` header, decodes
/// the claims, and re-checks that the user still exists with the claimed
/// role. Requests without a valid token fail with 401; requests whose role
/// does not satisfy `U` forward, so ranked routes can offer the same path at
/// several access levels without revealing which levels exist.
pub struct AuthToken<U> {
    pub id: Id,
    pub role: Role,
    phantom: PhantomData<U>,
}

impl<U> AuthToken<U> {
    /// Does this token carry the given role?
    pub fn permits(&self, target: Role) -> bool {
        self.role == target
    }
}

#[rocket::async_trait]
impl<'r, U> FromRequest<'r> for AuthToken<U>
where
    U: Access + Send,
{
    type Error = Error;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Unwrap is safe as `Config` is always managed.
        let config = req.guard::<&State<Config>>().await.unwrap();

        // Pull the token out of the Authorization header.
        let token = match req
            .headers()
            .get_one("Authorization")
            .and_then(|header| header.strip_prefix("Bearer "))
        {
            Some(token) => token,
            None => {
                return Outcome::Failure((
                    Status::Unauthorized,
                    Error::unauthorized("Missing authentication token"),
                ))
            }
        };

        // Decode the claims.
        let claims = match Claims::decode(token, config) {
            Ok(claims) => claims,
            Err(err) => return Outcome::Failure((Status::Unauthorized, err)),
        };

        // Check they represent the required access level.
        if !U::permits(claims.role) {
            return Outcome::Forward(());
        }

        // Check the user actually still exists with that role.
        let db = req.guard::<&State<mongodb::Database>>().await.unwrap();
        let filter = doc! {
            "_id": *claims.id,
            "role": claims.role,
        };
        match Coll::<User>::from_db(db).find_one(filter, None).await {
            Ok(Some(_)) => Outcome::Success(Self {
                id: claims.id,
                role: claims.role,
                phantom: PhantomData,
            }),
            Ok(None) => Outcome::Forward(()),
            Err(e) => Outcome::Failure((Status::InternalServerError, e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::model::db::UserCore;

    use super::*;

    fn test_user(role: Role) -> User {
        User {
            id: Id::new(),
            user: UserCore::new(
                "Priya Nair".to_string(),
                "priya@college.edu".to_string(),
                "correct horse",
                role,
            )
            .unwrap(),
        }
    }

    #[test]
    fn token_round_trip() {
        let config = Config::test_config();
        let user = test_user(Role::Voter);

        let token = Claims::for_user(&user, &config).encode(&config);
        let claims = Claims::decode(&token, &config).unwrap();

        assert_eq!(claims.id, user.id);
        assert_eq!(claims.role, Role::Voter);
    }

    #[test]
    fn tampered_token_rejected() {
        let config = Config::test_config();
        let user = test_user(Role::Admin);

        let mut token = Claims::for_user(&user, &config).encode(&config);
        // Flip a character in the signature segment.
        let flipped = if token.ends_with('A') { 'B' } else { 'A' };
        token.pop();
        token.push(flipped);

        assert!(Claims::decode(&token, &config).is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let config = Config::test_config();
        let user = test_user(Role::Voter);

        let claims = Claims {
            id: user.id,
            role: user.role,
            expire_at: Utc::now() - Duration::hours(1),
        };
        let token = claims.encode(&config);

        assert!(Claims::decode(&token, &config).is_err());
    }
}
