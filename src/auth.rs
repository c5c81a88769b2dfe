//! Principals, the ownership gate, and the account views.

use axum::http::Method;

use crate::entity::{RecordId, User};
use crate::error::{Result, SiteError};
use crate::forms::AuthForm;
use crate::http::{Page, Request, Response, SessionChange};
use crate::storage::Store;
use crate::urls::AuthRoute;

/// The actor behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    User(User),
}

impl Principal {
    pub fn user(&self) -> Option<&User> {
        match self {
            Principal::User(user) => Some(user),
            Principal::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}

/// True iff `principal` is the author of the record.
pub fn can_modify(principal: &Principal, author_id: RecordId) -> bool {
    principal.user().is_some_and(|user| user.id == author_id)
}

/// Redirect an anonymous request to the login page, remembering where it
/// was headed.
pub fn login_redirect(path: &str) -> Response {
    Response::redirect(format!("{}?next={}", AuthRoute::Login.path(), path))
}

/// The requesting user, or the login redirect to answer with.
pub fn require_user(request: &Request) -> std::result::Result<&User, Response> {
    request
        .principal
        .user()
        .ok_or_else(|| login_redirect(&request.path))
}

/// Serve the account routes. `home` is where a login without `next` lands.
pub fn handle(store: &Store, route: AuthRoute, request: &Request, home: &str) -> Result<Response> {
    match (route, &request.method) {
        (AuthRoute::Login, &Method::GET) => Ok(Response::ok(Page::Login {
            form: AuthForm::default(),
        })),
        (AuthRoute::Login, &Method::POST) => login(store, request, home),
        (AuthRoute::Logout, &Method::GET | &Method::POST) => {
            if let Some(user) = request.principal.user() {
                tracing::info!(user = %user, "logged out");
            }
            Ok(Response::ok(Page::Logout).with_session(SessionChange::Logout))
        }
        (AuthRoute::Signup, &Method::GET) => Ok(Response::ok(Page::Signup {
            form: AuthForm::default(),
        })),
        (AuthRoute::Signup, &Method::POST) => signup(store, request),
        _ => Err(SiteError::MethodNotAllowed),
    }
}

fn login(store: &Store, request: &Request, home: &str) -> Result<Response> {
    let mut form = AuthForm::bind(&request.form);
    if form.username.is_empty() {
        form.errors.add("username", crate::forms::REQUIRED);
        return Ok(Response::ok(Page::Login { form }));
    }
    let Some(user) = store.find_user_by_username(&form.username)? else {
        tracing::debug!(username = %form.username, "login for unknown user");
        form.errors.add("username", "Пользователь не найден.");
        return Ok(Response::ok(Page::Login { form }));
    };

    let next = request
        .query
        .get("next")
        .or_else(|| request.form.get("next"))
        .filter(|next| next.starts_with('/') && !next.starts_with("//"))
        .map(String::as_str)
        .unwrap_or(home);
    tracing::info!(user = %user, "logged in");
    Ok(Response::redirect(next).with_session(SessionChange::Login(user)))
}

fn signup(store: &Store, request: &Request) -> Result<Response> {
    let mut form = AuthForm::bind(&request.form);
    if form.username.is_empty() {
        form.errors.add("username", crate::forms::REQUIRED);
        return Ok(Response::ok(Page::Signup { form }));
    }
    let user = match store.create_user(&form.username) {
        Ok(user) => user,
        Err(SiteError::Duplicate(_)) => {
            form.username_taken();
            return Ok(Response::ok(Page::Signup { form }));
        }
        Err(e) => return Err(e),
    };
    tracing::info!(user = %user, "signed up");
    Ok(Response::redirect(AuthRoute::Login.path()))
}
