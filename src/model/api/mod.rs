//! API-facing (e.g. JSON-serialisable) types.

pub mod auth;
pub mod candidate;
pub mod id;
pub mod results;
