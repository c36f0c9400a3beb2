mod request;
mod token;
mod user;

pub use request::{LoginRequest, LoginResponse, RegisterRequest};
pub use token::{AuthToken, Claims};
pub use user::{Access, Admin, Voter};
