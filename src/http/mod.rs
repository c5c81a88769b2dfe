//! Request/response model shared by both applications.
//!
//! Applications implement [`Site`]. The in-process [`Client`] and the axum
//! server in [`crate::server`] both drive a site through `Site::handle`.

mod client;

pub use client::Client;

use std::collections::HashMap;

use axum::http::{Method, StatusCode};
use serde::Serialize;

use crate::auth::Principal;
use crate::entity::{Comment, News, Note, User};
use crate::error::{Result, SiteError};
use crate::forms::{AuthForm, CommentForm, NoteForm};

/// Decoded `application/x-www-form-urlencoded` fields.
pub type FormData = HashMap<String, String>;

/// Build form data from literal pairs.
pub fn form_data(pairs: &[(&str, &str)]) -> FormData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Path without query string, e.g. `/news/1/`.
    pub path: String,
    pub query: HashMap<String, String>,
    pub form: FormData,
    pub principal: Principal,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>, principal: Principal) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            form: FormData::new(),
            principal,
        }
    }

    pub fn with_form(mut self, form: FormData) -> Self {
        self.form = form;
        self
    }

    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    /// A form value, empty when the field was not sent.
    pub fn field(&self, name: &str) -> &str {
        self.form.get(name).map(String::as_str).unwrap_or("")
    }
}

/// What the session should do after a response is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    Login(User),
    Logout,
}

/// Structured context of a rendered page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    NewsList {
        object_list: Vec<News>,
    },
    NewsDetail {
        news: News,
        comments: Vec<Comment>,
        /// Offered only to authenticated users.
        form: Option<CommentForm>,
    },
    CommentEdit {
        comment: Comment,
        form: CommentForm,
    },
    CommentDelete {
        comment: Comment,
    },
    NotesHome,
    NoteList {
        object_list: Vec<Note>,
    },
    NoteEdit {
        form: NoteForm,
    },
    NoteDetail {
        note: Note,
    },
    NoteDelete {
        note: Note,
    },
    NoteSuccess,
    Login {
        form: AuthForm,
    },
    Logout,
    Signup {
        form: AuthForm,
    },
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    /// Redirect target for `302 Found`.
    pub location: Option<String>,
    pub page: Option<Page>,
    pub session: Option<SessionChange>,
}

impl Response {
    pub fn ok(page: Page) -> Self {
        Self {
            status: StatusCode::OK,
            location: None,
            page: Some(page),
            session: None,
        }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FOUND,
            location: Some(location.into()),
            page: None,
            session: None,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            location: None,
            page: None,
            session: None,
        }
    }

    pub fn with_session(mut self, change: SessionChange) -> Self {
        self.session = Some(change);
        self
    }

    /// Render the outcome of a view. Errors never escape a request:
    /// missing or foreign records become 404, anything internal becomes 500.
    pub fn from_result(request: &Request, result: Result<Response>) -> Self {
        match result {
            Ok(response) => response,
            Err(SiteError::NotFound(what)) => {
                tracing::debug!(path = %request.path, %what, "not found");
                Self::status(StatusCode::NOT_FOUND)
            }
            Err(SiteError::MethodNotAllowed) => Self::status(StatusCode::METHOD_NOT_ALLOWED),
            Err(e) => {
                tracing::error!(path = %request.path, method = %request.method, "request failed: {}", e);
                Self::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// Whether this is a redirect to exactly `target`.
    pub fn redirects_to(&self, target: &str) -> bool {
        self.status == StatusCode::FOUND && self.location.as_deref() == Some(target)
    }
}

/// A web application that answers requests.
pub trait Site: Send + Sync {
    fn handle(&self, request: &Request) -> Response;
}
