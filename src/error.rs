use argon2::Error as Argon2Error;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use mongodb::error::Error as DbError;
use rocket::{
    http::{Status, StatusClass},
    response::Responder,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error(transparent)]
    Argon2(#[from] Argon2Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::Status(Status::BadRequest, msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Status(Status::Unauthorized, msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Status(Status::Forbidden, msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::Status(Status::NotFound, msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Status(Status::Conflict, msg.into())
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = match &self {
            Self::Status(status, _) => *status,
            Self::Jwt(err) => match err.kind() {
                JwtErrorKind::ExpiredSignature | JwtErrorKind::ImmatureSignature => {
                    Status::Unauthorized
                }
                _ => Status::BadRequest,
            },
            Self::Db(_) | Self::Argon2(_) | Self::Io(_) => Status::InternalServerError,
        };
        match status.class() {
            StatusClass::ServerError => error!("{status}: {self}"),
            _ => warn!("{status}: {self}"),
        }
        Err(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_for(error: Error) -> Status {
        match &error {
            Error::Status(status, _) => *status,
            _ => panic!("not a status error"),
        }
    }

    #[test]
    fn helper_constructors_carry_their_status() {
        assert_eq!(status_for(Error::bad_request("x")), Status::BadRequest);
        assert_eq!(status_for(Error::unauthorized("x")), Status::Unauthorized);
        assert_eq!(status_for(Error::forbidden("x")), Status::Forbidden);
        assert_eq!(status_for(Error::not_found("x")), Status::NotFound);
        assert_eq!(status_for(Error::conflict("x")), Status::Conflict);
    }

    #[test]
    fn status_errors_display_their_message() {
        let err = Error::conflict("Already voted for this position");
        assert_eq!(err.to_string(), "Already voted for this position");
    }
}
