use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Core vote data: who voted for which position. There is deliberately no
/// candidate reference here; the unique `(voter, position)` index is what
/// prevents double-voting, and the candidate tally lives on the candidate
/// document itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCore {
    pub voter: Id,
    pub position: Id,
}

/// A vote without an ID.
pub type NewVote = VoteCore;

/// A vote from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub vote: VoteCore,
}
