use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// An electable office, e.g. "President".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCore {
    pub name: String,
}

/// A position without an ID.
pub type NewPosition = PositionCore;

/// A position from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub position: PositionCore,
}

impl Deref for Position {
    type Target = PositionCore;

    fn deref(&self) -> &Self::Target {
        &self.position
    }
}
