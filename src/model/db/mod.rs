//! DB-compatible (e.g. de/serialisable) types.
//!
//! The types in this module are serialised in a DB-friendly way: IDs in
//! MongoDB's own format, with the `_id` field flattened onto the core type.

mod candidate;
pub use candidate::{Candidate, CandidateCore, NewCandidate};

mod election;
pub use election::Election;

mod position;
pub use position::{NewPosition, Position, PositionCore};

mod user;
pub use user::{NewUser, Role, User, UserCore};

mod vote;
pub use vote::{NewVote, Vote, VoteCore};
