use mongodb::bson::doc;
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        auth::{AuthToken, Voter},
        candidate::{populate, CandidateView},
    },
    db::{Candidate, Election, NewVote, Position},
    mongodb::{is_duplicate_key_error, Coll, Id},
};

use super::common::{election_is_active, positions_by_id};

pub fn routes() -> Vec<Route> {
    routes![get_candidates, cast_vote]
}

/// The ballot: every candidate with their position embedded, visible only
/// while the election is running.
#[get("/vote/candidates")]
async fn get_candidates(
    _token: AuthToken<Voter>,
    elections: Coll<Election>,
    candidates: Coll<Candidate>,
    positions: Coll<Position>,
) -> Result<Json<Vec<CandidateView>>> {
    if !election_is_active(&elections).await? {
        return Err(Error::forbidden("Election not active"));
    }

    let all: Vec<Candidate> = candidates.find(None, None).await?.try_collect().await?;
    let positions = positions_by_id(&positions).await?;

    Ok(Json(populate(&all, &positions)))
}

/// Cast a vote for a candidate.
///
/// The unique `(voter, position)` index decides races between concurrent
/// requests from the same voter; the candidate's counter is only bumped once
/// the vote insert has gone through.
#[post("/vote/<candidate_id>")]
async fn cast_vote(
    token: AuthToken<Voter>,
    candidate_id: Id,
    elections: Coll<Election>,
    candidates: Coll<Candidate>,
    votes: Coll<NewVote>,
) -> Result<()> {
    if !election_is_active(&elections).await? {
        return Err(Error::forbidden("Election not active"));
    }

    let candidate = candidates
        .find_one(candidate_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Candidate {candidate_id}")))?;

    let vote = NewVote {
        voter: token.id,
        position: candidate.position,
    };
    let result = votes.insert_one(&vote, None).await;
    if is_duplicate_key_error(result.as_ref().map(|_| ())) {
        return Err(Error::conflict("Already voted for this position"));
    }
    result?;

    let update = doc! {
        "$inc": { "votes": 1 },
    };
    candidates
        .update_one(candidate_id.as_doc(), update, None)
        .await?;

    Ok(())
}
