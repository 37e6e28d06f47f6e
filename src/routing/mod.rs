//! Role router: maps (identity, requested path) to a view or a redirect.
//!
//! Route tables are fixed per role and built by exhaustive match, so the
//! concrete view always comes from the pair `(role, path)`. `/dashboard` and
//! `/appointments` exist for both roles and resolve to different views.

mod table;

pub use table::*;

use serde::Serialize;

use crate::models::{Identity, RoleClaim};
use crate::session::SessionAccess;

/// The only path reachable without a session.
pub const LOGIN_PATH: &str = "/login-admin";

/// Where a signed-in user lands for any path outside their role's table.
pub const DEFAULT_PATH: &str = "/dashboard";

/// Outcome of resolving a requested path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Resolution {
    /// Render `view`; `params` holds the captured `:name` segments.
    Render {
        view: View,
        params: Vec<(String, String)>,
    },
    /// Navigate to `to` instead.
    Redirect { to: &'static str },
    /// Signed in with a role that reaches nothing ("please sign in").
    NoAccess,
}

impl Resolution {
    pub fn view(&self) -> Option<View> {
        match self {
            Resolution::Render { view, .. } => Some(*view),
            _ => None,
        }
    }
}

/// Resolve `path` for the given identity (or none).
pub fn resolve(identity: Option<&Identity>, path: &str) -> Resolution {
    let Some(identity) = identity else {
        return if match_pattern(LOGIN_PATH, path).is_some() {
            Resolution::Render {
                view: View::Login,
                params: Vec::new(),
            }
        } else {
            Resolution::Redirect { to: LOGIN_PATH }
        };
    };

    let Some(role) = identity.role() else {
        return Resolution::NoAccess;
    };

    for route in routes(role) {
        if let Some(params) = match_pattern(route.pattern, path) {
            return Resolution::Render {
                view: route.view,
                params,
            };
        }
    }

    Resolution::Redirect { to: DEFAULT_PATH }
}

/// Resolve `path` against whoever is currently signed in.
pub async fn resolve_current<A: SessionAccess>(session: &A, path: &str) -> Resolution {
    let identity = session.current_identity().await;
    resolve(identity.as_ref(), path)
}

/// Path patterns reachable for the identity (or none).
pub fn reachable_paths(identity: Option<&Identity>) -> Vec<&'static str> {
    match identity {
        None => vec![LOGIN_PATH],
        Some(identity) => match identity.role() {
            Some(role) => routes(role).iter().map(|r| r.pattern).collect(),
            None => Vec::new(),
        },
    }
}

/// Persistent navigation for a role claim. Depends on the role only.
pub fn navigation(claim: &RoleClaim) -> &'static [NavLink] {
    match claim.role() {
        Some(role) => nav_links(role),
        None => &[],
    }
}

/// Match `path` against `pattern`, returning captured parameters.
///
/// Query string, fragment and a trailing slash are ignored; static segments
/// compare case-insensitively and `:name` segments match any non-empty
/// segment.
fn match_pattern(pattern: &str, path: &str) -> Option<Vec<(String, String)>> {
    let path = path.split(['?', '#']).next().unwrap_or_default();

    let mut pattern_segments = pattern.split('/').filter(|s| !s.is_empty());
    let mut path_segments = path.split('/').filter(|s| !s.is_empty());
    let mut params = Vec::new();

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(params),
            (Some(expected), Some(actual)) => {
                if let Some(name) = expected.strip_prefix(':') {
                    params.push((name.to_string(), actual.to_string()));
                } else if !expected.eq_ignore_ascii_case(actual) {
                    return None;
                }
            }
            _ => return None,
        }
    }
}
