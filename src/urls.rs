//! Named routes.
//!
//! Every route is a pure function of its identifier: `path()` reverses a
//! route into its URL path and `resolve()` maps a path back to the route.
//! Paths always end with a slash.

use crate::entity::RecordId;

/// Account routes shared by both applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRoute {
    Login,
    Logout,
    Signup,
}

impl AuthRoute {
    pub fn path(&self) -> String {
        match self {
            AuthRoute::Login => "/auth/login/".to_string(),
            AuthRoute::Logout => "/auth/logout/".to_string(),
            AuthRoute::Signup => "/auth/signup/".to_string(),
        }
    }

    fn resolve(segments: &[&str]) -> Option<Self> {
        match segments {
            ["auth", "login"] => Some(AuthRoute::Login),
            ["auth", "logout"] => Some(AuthRoute::Logout),
            ["auth", "signup"] => Some(AuthRoute::Signup),
            _ => None,
        }
    }
}

/// Split `/a/b/` into `["a", "b"]`. `None` unless the path starts and ends
/// with a slash.
fn segments(path: &str) -> Option<Vec<&str>> {
    if path == "/" {
        return Some(Vec::new());
    }
    let inner = path.strip_prefix('/')?.strip_suffix('/')?;
    let parts: Vec<&str> = inner.split('/').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(parts)
}

pub mod news {
    use super::{segments, AuthRoute, RecordId};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Route {
        Home,
        Detail(RecordId),
        /// Edit a comment.
        Edit(RecordId),
        /// Delete a comment.
        Delete(RecordId),
        Auth(AuthRoute),
    }

    impl Route {
        pub fn path(&self) -> String {
            match self {
                Route::Home => "/".to_string(),
                Route::Detail(id) => format!("/news/{}/", id),
                Route::Edit(id) => format!("/edit_comment/{}/", id),
                Route::Delete(id) => format!("/delete_comment/{}/", id),
                Route::Auth(route) => route.path(),
            }
        }

        pub fn resolve(path: &str) -> Option<Self> {
            let parts = segments(path)?;
            let id = |raw: &str| raw.parse::<RecordId>().ok();
            match parts.as_slice() {
                [] => Some(Route::Home),
                ["news", raw] => id(*raw).map(Route::Detail),
                ["edit_comment", raw] => id(*raw).map(Route::Edit),
                ["delete_comment", raw] => id(*raw).map(Route::Delete),
                other => AuthRoute::resolve(other).map(Route::Auth),
            }
        }
    }

    /// Anchor of the comment list on a news detail page.
    pub fn comments_anchor(news_id: RecordId) -> String {
        format!("{}#comments", Route::Detail(news_id).path())
    }
}

pub mod notes {
    use super::{segments, AuthRoute};
    use crate::slug;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Route {
        Home,
        List,
        Add,
        Success,
        Detail(String),
        Edit(String),
        Delete(String),
        Auth(AuthRoute),
    }

    impl Route {
        pub fn path(&self) -> String {
            match self {
                Route::Home => "/".to_string(),
                Route::List => "/notes/".to_string(),
                Route::Add => "/add/".to_string(),
                Route::Success => "/done/".to_string(),
                Route::Detail(slug) => format!("/note/{}/", slug),
                Route::Edit(slug) => format!("/edit/{}/", slug),
                Route::Delete(slug) => format!("/delete/{}/", slug),
                Route::Auth(route) => route.path(),
            }
        }

        pub fn resolve(path: &str) -> Option<Self> {
            let parts = segments(path)?;
            let by_slug = |raw: &str| slug::is_valid(raw).then(|| raw.to_string());
            match parts.as_slice() {
                [] => Some(Route::Home),
                ["notes"] => Some(Route::List),
                ["add"] => Some(Route::Add),
                ["done"] => Some(Route::Success),
                ["note", raw] => by_slug(*raw).map(Route::Detail),
                ["edit", raw] => by_slug(*raw).map(Route::Edit),
                ["delete", raw] => by_slug(*raw).map(Route::Delete),
                other => AuthRoute::resolve(other).map(Route::Auth),
            }
        }
    }
}
