//! HTTP server.
//!
//! A single axum fallback handler turns every HTTP request into a
//! [`Request`], lets the site answer it on the blocking pool, and renders
//! the [`Response`]: the status code, a `Location` header for redirects,
//! and the page context as JSON. Sessions are kept by `tower-sessions`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::json;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use tracing::{error, info};

use crate::auth::Principal;
use crate::entity::User;
use crate::error::{Result, SiteError};
use crate::http::{FormData, Request, Response, SessionChange, Site};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "sessionid";

/// Session key holding the logged-in user.
const SESSION_USER_KEY: &str = "user";

/// Sessions end after this long without a request.
const SESSION_INACTIVITY_DAYS: i64 = 7;

/// Shared server state injected into the handler.
#[derive(Clone)]
pub struct ServerState {
    pub site: Arc<dyn Site>,
}

/// Build the router serving `site`, with in-memory sessions.
pub fn router(site: Arc<dyn Site>) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            SESSION_INACTIVITY_DAYS,
        )));

    Router::new()
        .fallback(dispatch)
        .with_state(ServerState { site })
        .layer(session_layer)
}

/// Serve `site` on `addr` until Ctrl-C.
pub async fn run(site: Arc<dyn Site>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, router(site))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SiteError::Server(e.to_string()))?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn dispatch(
    State(state): State<ServerState>,
    session: Session,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    form: std::result::Result<Form<HashMap<String, String>>, FormRejection>,
) -> axum::response::Response {
    let path = uri.path().to_string();
    match serve(state, session, method, path.clone(), query, form).await {
        Ok(rendered) => rendered,
        Err(e) => {
            error!(path = %path, "request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn serve(
    state: ServerState,
    session: Session,
    method: Method,
    path: String,
    query: HashMap<String, String>,
    form: std::result::Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<axum::response::Response> {
    let principal = session
        .get::<User>(SESSION_USER_KEY)
        .await?
        .map(Principal::User)
        .unwrap_or_default();

    // GET forms are read from the query string; keep them out of the body.
    let form: FormData = if method == Method::GET || method == Method::HEAD {
        FormData::new()
    } else {
        form.map(|Form(fields)| fields).unwrap_or_default()
    };

    let request = Request::new(method, path, principal)
        .with_query(query)
        .with_form(form);
    let site = Arc::clone(&state.site);
    let (request, response) = tokio::task::spawn_blocking(move || {
        let response = site.handle(&request);
        (request, response)
    })
    .await
    .map_err(|e| SiteError::Server(format!("site handler join failed: {}", e)))?;
    info!(method = %request.method, path = %request.path, status = response.status.as_u16(), "request");

    match &response.session {
        Some(SessionChange::Login(user)) => {
            session.cycle_id().await?;
            session.insert(SESSION_USER_KEY, user).await?;
        }
        Some(SessionChange::Logout) => session.flush().await?,
        None => {}
    }

    render(response)
}

fn render(response: Response) -> Result<axum::response::Response> {
    let mut headers = HeaderMap::new();
    if let Some(location) = &response.location {
        let value = HeaderValue::from_str(location)
            .map_err(|e| SiteError::Server(format!("invalid Location '{}': {}", location, e)))?;
        headers.insert(LOCATION, value);
    }

    let body = match &response.page {
        Some(page) => serde_json::to_value(page)?,
        None => json!({ "status": response.status.as_u16() }),
    };
    Ok((response.status, headers, Json(body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Page;

    #[test]
    fn test_render_redirect() {
        let rendered = render(Response::redirect("/done/")).unwrap();
        assert_eq!(rendered.status(), StatusCode::FOUND);
        assert_eq!(rendered.headers().get(LOCATION).unwrap(), "/done/");
    }

    #[test]
    fn test_render_page_without_location() {
        let rendered = render(Response::ok(Page::NoteSuccess)).unwrap();
        assert_eq!(rendered.status(), StatusCode::OK);
        assert!(rendered.headers().get(LOCATION).is_none());
    }

    #[test]
    fn test_render_rejects_bad_location() {
        let err = render(Response::redirect("/next\n")).unwrap_err();
        assert!(matches!(err, SiteError::Server(_)));
    }
}
