//! Session, navigation and route-resolution endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::authenticate;
use crate::errors::AppError;
use crate::models::{Avatar, Identity, LoginRequest, Role};
use crate::routing::{self, NavLink, Resolution};
use crate::AppState;

/// What the shell needs to render: who is signed in, their avatar, the
/// sidebar and the paths they may visit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub identity: Option<Identity>,
    pub avatar: Option<Avatar>,
    pub navigation: &'static [NavLink],
    pub reachable_paths: Vec<&'static str>,
}

impl SessionView {
    pub fn new(identity: Option<Identity>) -> Self {
        let navigation = identity
            .as_ref()
            .map(|i| routing::navigation(&i.role))
            .unwrap_or_default();
        Self {
            avatar: identity.as_ref().map(Identity::avatar),
            navigation,
            reachable_paths: routing::reachable_paths(identity.as_ref()),
            identity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub path: String,
}

/// GET /api/session - Current session.
pub async fn get_session(State(state): State<AppState>) -> ApiResult<SessionView> {
    success(SessionView::new(state.session.current_identity().await))
}

/// POST /api/session/login - Check credentials and sign in.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<SessionView> {
    let role = Role::parse(&request.role).ok_or_else(|| {
        let known: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
        AppError::Validation(format!(
            "Unknown role '{}', expected one of: {}",
            request.role,
            known.join(", ")
        ))
    })?;

    let doctors = match role {
        Role::Admin => Vec::new(),
        Role::Doctor => state.doctors.list().await?,
    };

    let profile = match authenticate(role, &request.username, &request.password, &doctors) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Rejected {} login for '{}'", role, request.username);
            return Err(e);
        }
    };

    let identity = state.session.login(role, profile).await?;
    success(SessionView::new(Some(identity)))
}

/// POST /api/session/logout - Sign out.
pub async fn logout(State(state): State<AppState>) -> ApiResult<SessionView> {
    state.session.logout().await?;
    success(SessionView::new(None))
}

/// GET /api/navigation - Sidebar links for the current role.
pub async fn get_navigation(State(state): State<AppState>) -> ApiResult<&'static [NavLink]> {
    let links = state
        .session
        .current_identity()
        .await
        .map(|identity| routing::navigation(&identity.role))
        .unwrap_or_default();
    success(links)
}

/// GET /api/route?path= - Resolve a path for the current session.
pub async fn resolve_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> ApiResult<Resolution> {
    success(routing::resolve_current(state.session.as_ref(), &query.path).await)
}
