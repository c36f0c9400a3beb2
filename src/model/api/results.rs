use serde::{Deserialize, Serialize};

use crate::model::{
    api::id::ApiId,
    db::{Candidate, Position},
};

/// One candidate's standing within a position's results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateStanding {
    pub id: ApiId,
    pub name: String,
    pub votes: u64,
}

impl From<&Candidate> for CandidateStanding {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id.into(),
            name: candidate.name.clone(),
            votes: candidate.votes,
        }
    }
}

/// The outcome of one position's count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PositionOutcome {
    /// A strictly greatest vote count.
    Winner { winner: CandidateStanding },
    /// Two or more candidates tied at the maximum count.
    Draw { winners: Vec<CandidateStanding> },
    /// The position has no candidates at all.
    NoResult,
}

/// Results for a single position: the outcome plus the full standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionResult {
    pub position: String,
    #[serde(flatten)]
    pub outcome: PositionOutcome,
    pub candidates: Vec<CandidateStanding>,
}

impl PositionResult {
    /// Reduce a position's candidates to an outcome.
    ///
    /// One pass over the standings: the maximum count decides. A lone
    /// candidate wins even with zero votes; `NoResult` is reserved for
    /// positions nobody stood for.
    pub fn tally(position: &Position, candidates: &[Candidate]) -> Self {
        let standings: Vec<CandidateStanding> =
            candidates.iter().map(CandidateStanding::from).collect();

        let outcome = match standings.iter().map(|c| c.votes).max() {
            None => PositionOutcome::NoResult,
            Some(max) => {
                let mut winners: Vec<CandidateStanding> = standings
                    .iter()
                    .filter(|c| c.votes == max)
                    .cloned()
                    .collect();
                if winners.len() == 1 {
                    PositionOutcome::Winner {
                        winner: winners.remove(0),
                    }
                } else {
                    PositionOutcome::Draw { winners }
                }
            }
        };

        Self {
            position: position.name.clone(),
            outcome,
            candidates: standings,
        }
    }
}

#[cfg(test)]
mod tests {
    use rocket::serde::json::serde_json;

    use crate::model::db::{CandidateCore, PositionCore};
    use crate::model::mongodb::Id;

    use super::*;

    fn position(name: &str) -> Position {
        Position {
            id: Id::new(),
            position: PositionCore {
                name: name.to_string(),
            },
        }
    }

    fn candidate(name: &str, position: Id, votes: u64) -> Candidate {
        Candidate {
            id: Id::new(),
            candidate: CandidateCore {
                name: name.to_string(),
                photo: None,
                description: format!("{name} for office"),
                position,
                votes,
            },
        }
    }

    #[test]
    fn strict_maximum_wins() {
        let president = position("President");
        let candidates = [
            candidate("Asha", president.id, 10),
            candidate("Ben", president.id, 7),
            candidate("Caro", president.id, 3),
        ];

        let result = PositionResult::tally(&president, &candidates);

        assert_eq!(result.position, "President");
        assert_eq!(result.candidates.len(), 3);
        match result.outcome {
            PositionOutcome::Winner { winner } => {
                assert_eq!(winner.name, "Asha");
                assert_eq!(winner.votes, 10);
            }
            other => panic!("expected a winner, got {other:?}"),
        }
    }

    #[test]
    fn tied_maximum_is_a_draw() {
        let secretary = position("Secretary");
        let candidates = [
            candidate("Dev", secretary.id, 5),
            candidate("Ella", secretary.id, 5),
            candidate("Femi", secretary.id, 2),
        ];

        let result = PositionResult::tally(&secretary, &candidates);

        match result.outcome {
            PositionOutcome::Draw { winners } => {
                let names: Vec<&str> = winners.iter().map(|w| w.name.as_str()).collect();
                assert_eq!(names, ["Dev", "Ella"]);
                assert!(winners.iter().all(|w| w.votes == 5));
            }
            other => panic!("expected a draw, got {other:?}"),
        }
    }

    #[test]
    fn empty_position_has_no_result() {
        let treasurer = position("Treasurer");

        let result = PositionResult::tally(&treasurer, &[]);

        assert_eq!(result.outcome, PositionOutcome::NoResult);
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn all_zero_counts_draw_among_everyone() {
        let rep = position("Class Rep");
        let candidates = [candidate("Gita", rep.id, 0), candidate("Hugo", rep.id, 0)];

        let result = PositionResult::tally(&rep, &candidates);

        match result.outcome {
            PositionOutcome::Draw { winners } => assert_eq!(winners.len(), 2),
            other => panic!("expected a draw, got {other:?}"),
        }
    }

    #[test]
    fn lone_candidate_wins_without_votes() {
        let rep = position("Class Rep");
        let candidates = [candidate("Gita", rep.id, 0)];

        let result = PositionResult::tally(&rep, &candidates);

        assert!(matches!(result.outcome, PositionOutcome::Winner { .. }));
    }

    #[test]
    fn outcome_serialises_with_status_tag() {
        let rep = position("Class Rep");

        let no_result = PositionResult::tally(&rep, &[]);
        let json = serde_json::to_value(&no_result).unwrap();
        assert_eq!(json["status"], "no_result");
        assert_eq!(json["position"], "Class Rep");

        let won = PositionResult::tally(&rep, &[candidate("Gita", rep.id, 4)]);
        let json = serde_json::to_value(&won).unwrap();
        assert_eq!(json["status"], "winner");
        assert_eq!(json["winner"]["votes"], 4);

        let drawn = PositionResult::tally(
            &rep,
            &[candidate("Gita", rep.id, 4), candidate("Hugo", rep.id, 4)],
        );
        let json = serde_json::to_value(&drawn).unwrap();
        assert_eq!(json["status"], "draw");
        assert_eq!(json["winners"].as_array().unwrap().len(), 2);
    }
}
