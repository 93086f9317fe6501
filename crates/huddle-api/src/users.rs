use axum::{Extension, Json, extract::State, response::IntoResponse};

use huddle_types::api::UserResponse;
use huddle_types::models::Identity;

use crate::auth::AppState;
use crate::error::ApiError;

pub async fn current_user(Extension(identity): Extension<Identity>) -> impl IntoResponse {
    Json(UserResponse { user: identity })
}

/// Everyone except the caller, reduced to public identities.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let users: Vec<Identity> = state
        .store
        .users()?
        .into_iter()
        .filter(|user| user.id != identity.id)
        .map(|user| user.identity())
        .collect();

    Ok(Json(users))
}
