use mongodb::{bson::doc, options::UpdateOptions, Client};
use rocket::{form::Form, futures::TryStreamExt, serde::json::Json, Route, State};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    api::{
        auth::{Admin, AuthToken},
        candidate::{populate, CandidateForm, CandidateView, PositionView},
    },
    db::{Candidate, Election, NewCandidate, NewPosition, Position, Vote},
    mongodb::{Coll, Id},
};
use crate::uploads;

use super::common::positions_by_id;

pub fn routes() -> Vec<Route> {
    routes![
        start_election,
        stop_election,
        reset_election,
        create_position,
        get_positions,
        delete_position,
        get_candidates,
        create_candidate,
        update_candidate,
        delete_candidate,
    ]
}

/// Mark the election active. The singleton is created by the first start;
/// starting an already-running election is a no-op.
#[post("/admin/start")]
async fn start_election(_token: AuthToken<Admin>, elections: Coll<Election>) -> Result<()> {
    let update = doc! {
        "$set": { "active": true },
    };
    let options = UpdateOptions::builder().upsert(true).build();
    elections.update_one(doc! {}, update, options).await?;
    Ok(())
}

/// Mark the election inactive, closing voting and unlocking results.
#[post("/admin/stop")]
async fn stop_election(_token: AuthToken<Admin>, elections: Coll<Election>) -> Result<()> {
    let update = doc! {
        "$set": { "active": false },
    };
    elections.update_one(doc! {}, update, None).await?;
    Ok(())
}

/// Wipe all votes and zero every candidate's counter, atomically.
/// Irreversible; previously-voted voters may vote again afterwards.
#[post("/admin/reset")]
async fn reset_election(
    _token: AuthToken<Admin>,
    votes: Coll<Vote>,
    candidates: Coll<Candidate>,
    db_client: &State<Client>,
) -> Result<()> {
    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;

    votes
        .delete_many_with_session(doc! {}, None, &mut session)
        .await?;
    let update = doc! {
        "$set": { "votes": 0_i64 },
    };
    candidates
        .update_many_with_session(doc! {}, update, None, &mut session)
        .await?;

    session.commit_transaction().await?;
    Ok(())
}

#[post("/admin/positions", data = "<position>", format = "json")]
async fn create_position(
    _token: AuthToken<Admin>,
    position: Json<NewPosition>,
    new_positions: Coll<NewPosition>,
) -> Result<Json<PositionView>> {
    if position.name.is_empty() {
        return Err(Error::bad_request("Position name must not be empty"));
    }

    let new_id: Id = new_positions
        .insert_one(&position.0, None)
        .await?
        .inserted_id
        .as_object_id()
        .unwrap() // Valid because the ID comes directly from the DB.
        .into();

    let position = Position {
        id: new_id,
        position: position.0,
    };
    Ok(Json(PositionView::from(&position)))
}

#[get("/admin/positions")]
async fn get_positions(
    _token: AuthToken<Admin>,
    positions: Coll<Position>,
) -> Result<Json<Vec<PositionView>>> {
    let all: Vec<Position> = positions.find(None, None).await?.try_collect().await?;
    Ok(Json(all.iter().map(PositionView::from).collect()))
}

/// Delete a position and, in the same transaction, every candidate standing
/// for it.
#[delete("/admin/positions/<position_id>")]
async fn delete_position(
    _token: AuthToken<Admin>,
    position_id: Id,
    positions: Coll<Position>,
    candidates: Coll<Candidate>,
    db_client: &State<Client>,
) -> Result<()> {
    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;

    let candidate_filter = doc! {
        "position": *position_id,
    };
    candidates
        .delete_many_with_session(candidate_filter, None, &mut session)
        .await?;
    let result = positions
        .delete_one_with_session(position_id.as_doc(), None, &mut session)
        .await?;
    if result.deleted_count == 0 {
        session.abort_transaction().await?;
        return Err(Error::not_found(format!("Position {position_id}")));
    }

    session.commit_transaction().await?;
    Ok(())
}

#[get("/admin/candidates")]
async fn get_candidates(
    _token: AuthToken<Admin>,
    candidates: Coll<Candidate>,
    positions: Coll<Position>,
) -> Result<Json<Vec<CandidateView>>> {
    let all: Vec<Candidate> = candidates.find(None, None).await?.try_collect().await?;
    let positions = positions_by_id(&positions).await?;
    Ok(Json(populate(&all, &positions)))
}

#[post("/admin/candidates", data = "<form>")]
async fn create_candidate(
    _token: AuthToken<Admin>,
    form: Form<CandidateForm<'_>>,
    positions: Coll<Position>,
    new_candidates: Coll<NewCandidate>,
    config: &State<Config>,
) -> Result<Json<CandidateView>> {
    let mut form = form.into_inner();
    if form.name.is_empty() {
        return Err(Error::bad_request("Candidate name must not be empty"));
    }

    let position = positions
        .find_one(form.position.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Position {}", form.position)))?;

    let photo = match form.photo.as_mut() {
        Some(file) => Some(uploads::store_photo(file, config.uploads_dir()).await?),
        None => form.photo_url.take(),
    };

    let candidate = NewCandidate {
        name: form.name,
        photo,
        description: form.description,
        position: position.id,
        votes: 0,
    };
    let new_id: Id = new_candidates
        .insert_one(&candidate, None)
        .await?
        .inserted_id
        .as_object_id()
        .unwrap() // Valid because the ID comes directly from the DB.
        .into();

    let candidate = Candidate {
        id: new_id,
        candidate,
    };
    Ok(Json(CandidateView::new(&candidate, &position)))
}

/// Update a candidate. The photo is only replaced when a new file or URL is
/// supplied; otherwise the existing one is kept.
#[put("/admin/candidates/<candidate_id>", data = "<form>")]
async fn update_candidate(
    _token: AuthToken<Admin>,
    candidate_id: Id,
    form: Form<CandidateForm<'_>>,
    candidates: Coll<Candidate>,
    positions: Coll<Position>,
    config: &State<Config>,
) -> Result<Json<CandidateView>> {
    let mut form = form.into_inner();

    let existing = candidates
        .find_one(candidate_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Candidate {candidate_id}")))?;

    let position = positions
        .find_one(form.position.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Position {}", form.position)))?;

    let photo = match form.photo.as_mut() {
        Some(file) => Some(uploads::store_photo(file, config.uploads_dir()).await?),
        None => form.photo_url.take().or_else(|| existing.photo.clone()),
    };

    let update = doc! {
        "$set": {
            "name": &form.name,
            "description": &form.description,
            "position": *position.id,
            "photo": photo,
        }
    };
    candidates
        .update_one(candidate_id.as_doc(), update, None)
        .await?;

    let updated = candidates
        .find_one(candidate_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Candidate {candidate_id}")))?;
    Ok(Json(CandidateView::new(&updated, &position)))
}

#[delete("/admin/candidates/<candidate_id>")]
async fn delete_candidate(
    _token: AuthToken<Admin>,
    candidate_id: Id,
    candidates: Coll<Candidate>,
) -> Result<()> {
    let result = candidates.delete_one(candidate_id.as_doc(), None).await?;
    if result.deleted_count == 0 {
        return Err(Error::not_found(format!("Candidate {candidate_id}")));
    }
    Ok(())
}
