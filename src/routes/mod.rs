use std::{sync::Arc, time::Duration};

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor};

use crate::{middleware::auth_jwt_middleware, state::AppState};

pub mod auth;
pub mod invites;
pub mod journals;
pub mod templates;
pub mod workspaces;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/auth", auth_router(state.clone()))
        .nest("/workspaces", workspace_router(state.clone()))
        .nest("/invites", invite_router(state.clone()))
        .nest("/journals", journal_router(state.clone()))
        .nest("/templates", template_router(state.clone()))
        .nest("/vocabulary", vocabulary_router(state.clone()))
        // Inbound pipeline completion: authenticated by shared secret, not
        // by a user JWT, so it lives outside the auth middleware.
        .route("/pipeline/callback", post(journals::pipeline_callback))
        .with_state(state)
}

fn auth_router(config: AppState) -> Router<AppState> {
    // ? rate limiter for credential endpoints
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );
    let governor_limiter = governor_conf.limiter().clone();
    let interval = Duration::from_secs(60);
    // a separate background task to clean up
    std::thread::spawn(move || {
        loop {
            std::thread::sleep(interval);
            tracing::info!("rate limiting storage size: {}", governor_limiter.len());
            governor_limiter.retain_recent();
        }
    });

    Router::new()
        .route("/signup", post(auth::sign_up))
        .route("/signin", post(auth::sign_in))
        .layer(GovernorLayer {
            config: governor_conf,
        })
        .with_state(config)
}

fn workspace_router(config: AppState) -> Router<AppState> {
    Router::new()
        .route("/{ws_id}", get(workspaces::read_workspace))
        .route("/{ws_id}", patch(workspaces::rename_workspace))
        // ! memberships
        .route("/{ws_id}/memberships", get(workspaces::read_memberships))
        .route(
            "/{ws_id}/memberships/{account_id}",
            delete(workspaces::remove_membership),
        )
        // ! invites
        .route("/{ws_id}/invites", post(invites::send_invite))
        .route("/{ws_id}/invites", get(invites::read_invites))
        // ! journals
        .route("/{ws_id}/journals", post(journals::create_journal))
        .route("/{ws_id}/journals", get(journals::read_journals))
        // ! pipeline parameters
        .route("/{ws_id}/templates", get(templates::read_templates))
        .route("/{ws_id}/templates", post(templates::create_template))
        .route("/{ws_id}/vocabulary", get(templates::read_vocabulary))
        .route("/{ws_id}/vocabulary", post(templates::create_vocabulary_entry))
        .layer(middleware::from_fn(auth_jwt_middleware))
        .with_state(config)
}

fn invite_router(config: AppState) -> Router<AppState> {
    Router::new()
        .route("/accept", post(invites::accept_invite))
        .route("/{invite_id}/decline", post(invites::decline_invite))
        .route("/{invite_id}/revoke", post(invites::revoke_invite))
        .layer(middleware::from_fn(auth_jwt_middleware))
        .with_state(config)
}

fn journal_router(config: AppState) -> Router<AppState> {
    Router::new()
        .route("/{journal_id}", get(journals::read_journal))
        .route("/{journal_id}", delete(journals::delete_journal))
        .route("/{journal_id}/resummarize", post(journals::resummarize))
        .layer(middleware::from_fn(auth_jwt_middleware))
        .with_state(config)
}

fn template_router(config: AppState) -> Router<AppState> {
    Router::new()
        .route("/std", get(templates::read_std_templates))
        .route("/{template_id}", patch(templates::update_template))
        .route("/{template_id}", delete(templates::delete_template))
        .layer(middleware::from_fn(auth_jwt_middleware))
        .with_state(config)
}

fn vocabulary_router(config: AppState) -> Router<AppState> {
    Router::new()
        .route("/{entry_id}", patch(templates::update_vocabulary_entry))
        .route("/{entry_id}", delete(templates::delete_vocabulary_entry))
        .layer(middleware::from_fn(auth_jwt_middleware))
        .with_state(config)
}
