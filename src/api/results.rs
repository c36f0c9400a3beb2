use mongodb::bson::doc;
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        auth::{Admin, AuthToken, Voter},
        results::PositionResult,
    },
    db::{Candidate, Election, Position},
    mongodb::Coll,
};

use super::common::election_is_active;

pub fn routes() -> Vec<Route> {
    routes![results_admin, results_voter]
}

#[get("/results", rank = 1)]
async fn results_admin(
    _token: AuthToken<Admin>,
    elections: Coll<Election>,
    positions: Coll<Position>,
    candidates: Coll<Candidate>,
) -> Result<Json<Vec<PositionResult>>> {
    tallied_results(elections, positions, candidates).await
}

#[get("/results", rank = 2)]
async fn results_voter(
    _token: AuthToken<Voter>,
    elections: Coll<Election>,
    positions: Coll<Position>,
    candidates: Coll<Candidate>,
) -> Result<Json<Vec<PositionResult>>> {
    tallied_results(elections, positions, candidates).await
}

/// Tally every position, hidden while voting is still open.
async fn tallied_results(
    elections: Coll<Election>,
    positions: Coll<Position>,
    candidates: Coll<Candidate>,
) -> Result<Json<Vec<PositionResult>>> {
    if election_is_active(&elections).await? {
        return Err(Error::forbidden("Results hidden during election"));
    }

    let all_positions: Vec<Position> = positions.find(None, None).await?.try_collect().await?;

    let mut results = Vec::with_capacity(all_positions.len());
    for position in &all_positions {
        let position_candidates: Vec<Candidate> = candidates
            .find(doc! { "position": *position.id }, None)
            .await?
            .try_collect()
            .await?;
        results.push(PositionResult::tally(position, &position_candidates));
    }

    Ok(Json(results))
}
