use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// The election singleton: a single document whose `active` flag gates all
/// voter-facing endpoints. Created implicitly by the first admin "start" via
/// an upsert; there is never more than one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Election {
    #[serde(rename = "_id")]
    pub id: Id,
    pub active: bool,
}
