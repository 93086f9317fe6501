//! Authorization-gated team and channel mutations.
//!
//! Every mutation follows the same shape: team lookup (404), relation check
//! (403), store mutation, then a detached best-effort broadcast to the
//! affected topics. The mutation result is authoritative and returned
//! synchronously; a lost broadcast only leaves connected clients stale.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use huddle_realtime::notify;
use huddle_types::api::{AddMembersRequest, CreateChannelRequest, CreateTeamRequest};
use huddle_types::models::{Identity, Team};

use crate::auth::AppState;
use crate::error::ApiError;

fn require_admin(team: &Team, user_id: Uuid) -> Result<(), ApiError> {
    if team.is_admin(user_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

fn team_topic(team_id: Uuid) -> String {
    format!("teams:{}", team_id)
}

fn user_teams_topic(user_id: Uuid) -> String {
    format!("{}:teams", user_id)
}

pub async fn list_teams(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.store.teams_for(identity.id)?))
}

pub async fn get_team(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(team_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .store
        .team_view_for(identity.id, team_id)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(view))
}

pub async fn create_team(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Option<Json<CreateTeamRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let name = body.and_then(|Json(req)| req.name);
    let team = state.store.create_team(identity.id, name)?;

    // The creator is the only member at this point, so the only follower
    // topic to poke is their own.
    notify(
        state.publisher.clone(),
        vec![user_teams_topic(identity.id)],
    );

    Ok(Json(team))
}

pub async fn delete_team(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(team_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let team = state.store.team_by_id(team_id)?.ok_or(ApiError::NotFound)?;
    require_admin(&team, identity.id)?;

    state.store.delete_team(team_id)?;

    notify(state.publisher.clone(), vec![team_topic(team_id)]);

    Ok(StatusCode::OK)
}

pub async fn add_members(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(team_id): Path<Uuid>,
    Json(req): Json<AddMembersRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let team = state.store.team_by_id(team_id)?.ok_or(ApiError::NotFound)?;
    require_admin(&team, identity.id)?;

    let user_ids = req.members.into_vec();
    let (view, added) = state
        .store
        .add_members(team_id, &user_ids)?
        .ok_or(ApiError::NotFound)?;

    // Already-member and unknown ids were filtered in the store, so each
    // user topic fires at most once.
    let mut topics = vec![team_topic(team_id)];
    topics.extend(added.into_iter().map(user_teams_topic));
    notify(state.publisher.clone(), topics);

    Ok(Json(view))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((team_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    // Self-removal via this path is always rejected, admin or not.
    if member_id == identity.id {
        return Err(ApiError::BadRequest);
    }

    let team = state.store.team_by_id(team_id)?.ok_or(ApiError::NotFound)?;
    require_admin(&team, identity.id)?;

    let view = state
        .store
        .remove_member(team_id, member_id)?
        .ok_or(ApiError::NotFound)?;

    notify(
        state.publisher.clone(),
        vec![user_teams_topic(member_id), team_topic(team_id)],
    );

    Ok(Json(view))
}

pub async fn create_channel(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(team_id): Path<Uuid>,
    Json(req): Json<CreateChannelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let team = state.store.team_by_id(team_id)?.ok_or(ApiError::NotFound)?;
    require_admin(&team, identity.id)?;

    let view = state
        .store
        .add_channel(team_id, &req.channel_name)?
        .ok_or(ApiError::NotFound)?;

    notify(state.publisher.clone(), vec![team_topic(team_id)]);

    Ok(Json(view))
}

pub async fn delete_channel(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((team_id, channel_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let team = state.store.team_by_id(team_id)?.ok_or(ApiError::NotFound)?;
    require_admin(&team, identity.id)?;

    let view = state
        .store
        .remove_channel(team_id, channel_id)?
        .ok_or(ApiError::NotFound)?;

    notify(state.publisher.clone(), vec![team_topic(team_id)]);

    Ok(Json(view))
}
