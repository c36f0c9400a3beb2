use std::collections::HashMap;

use rocket::fs::TempFile;
use serde::{Deserialize, Serialize};

use crate::model::{
    api::id::ApiId,
    db::{Candidate, Position},
    mongodb::Id,
};

/// The position a candidate stands for, embedded in candidate listings so
/// clients don't need a second lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionView {
    pub id: ApiId,
    pub name: String,
}

impl From<&Position> for PositionView {
    fn from(position: &Position) -> Self {
        Self {
            id: position.id.into(),
            name: position.name.clone(),
        }
    }
}

/// A candidate as presented to clients, with their position embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateView {
    pub id: ApiId,
    pub name: String,
    pub photo: Option<String>,
    pub description: String,
    pub position: PositionView,
    pub votes: u64,
}

impl CandidateView {
    pub fn new(candidate: &Candidate, position: &Position) -> Self {
        Self {
            id: candidate.id.into(),
            name: candidate.name.clone(),
            photo: candidate.photo.clone(),
            description: candidate.description.clone(),
            position: position.into(),
            votes: candidate.votes,
        }
    }
}

/// Join candidates against their positions. Candidates whose position has
/// since been deleted are skipped rather than surfaced half-formed.
pub fn populate(candidates: &[Candidate], positions: &HashMap<Id, Position>) -> Vec<CandidateView> {
    candidates
        .iter()
        .filter_map(|candidate| {
            positions
                .get(&candidate.position)
                .map(|position| CandidateView::new(candidate, position))
        })
        .collect()
}

/// Multipart form for creating or updating a candidate. The photo arrives
/// either as an uploaded file or as an external URL in `photo_url`.
#[derive(FromForm)]
pub struct CandidateForm<'r> {
    pub name: String,
    pub description: String,
    pub position: Id,
    pub photo: Option<TempFile<'r>>,
    pub photo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use crate::model::db::{CandidateCore, PositionCore};

    use super::*;

    #[test]
    fn populate_skips_orphaned_candidates() {
        let president = Position {
            id: Id::new(),
            position: PositionCore {
                name: "President".to_string(),
            },
        };
        let deleted_position = Id::new();

        let make = |name: &str, position: Id| Candidate {
            id: Id::new(),
            candidate: CandidateCore {
                name: name.to_string(),
                photo: None,
                description: String::new(),
                position,
                votes: 0,
            },
        };
        let candidates = [
            make("Asha", president.id),
            make("Orphan", deleted_position),
            make("Ben", president.id),
        ];
        let positions = HashMap::from([(president.id, president.clone())]);

        let views = populate(&candidates, &positions);

        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|v| v.position.name == "President"));
        assert!(views.iter().all(|v| v.name != "Orphan"));
    }
}
