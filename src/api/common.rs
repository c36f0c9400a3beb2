use std::collections::HashMap;

use rocket::futures::TryStreamExt;

use crate::error::Result;
use crate::model::{
    db::{Election, Position},
    mongodb::{Coll, Id},
};

/// Is the election currently running? Until an admin first starts it, the
/// singleton doesn't exist and the answer is no.
pub async fn election_is_active(elections: &Coll<Election>) -> Result<bool> {
    let election = elections.find_one(None, None).await?;
    Ok(election.map(|e| e.active).unwrap_or(false))
}

/// All positions, keyed by ID, for joining candidates against.
pub async fn positions_by_id(positions: &Coll<Position>) -> Result<HashMap<Id, Position>> {
    let all: Vec<Position> = positions.find(None, None).await?.try_collect().await?;
    Ok(all.into_iter().map(|p| (p.id, p)).collect())
}
