pub mod auth;
pub mod error;
pub mod middleware;
pub mod teams;
pub mod tokens;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use auth::AppState;

/// Assemble the full API surface. Auth endpoints are public; everything
/// else sits behind the session middleware.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/api/logout", post(auth::logout))
        .route("/api/user", get(users::current_user))
        .route("/api/users", get(users::list_users))
        .route("/api/auth/socket", get(auth::socket_token))
        .route("/api/teams", get(teams::list_teams))
        .route("/api/teams/create", post(teams::create_team))
        .route("/api/teams/{team_id}", get(teams::get_team))
        .route("/api/teams/{team_id}/delete", post(teams::delete_team))
        .route("/api/teams/{team_id}/members/add", post(teams::add_members))
        .route(
            "/api/teams/{team_id}/members/{member_id}/remove",
            post(teams::remove_member),
        )
        .route(
            "/api/teams/{team_id}/channels/create",
            post(teams::create_channel),
        )
        .route(
            "/api/teams/{team_id}/channels/{channel_id}/delete",
            post(teams::delete_channel),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}
