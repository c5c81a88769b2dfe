//! The news site: public news pages with author-owned comments.

use axum::http::Method;

use crate::auth::{self, can_modify, Principal};
use crate::config::Settings;
use crate::entity::{Comment, RecordId};
use crate::error::{Result, SiteError};
use crate::forms::CommentForm;
use crate::http::{Page, Request, Response, Site};
use crate::storage::Store;
use crate::urls::news::{comments_anchor, Route};

pub struct NewsApp {
    store: Store,
    settings: Settings,
}

impl NewsApp {
    pub fn new(store: Store, settings: Settings) -> Self {
        Self { store, settings }
    }

    /// Open the store the settings point at
    pub fn open(settings: Settings) -> Result<Self> {
        Ok(Self::new(Store::open_with(&settings)?, settings))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn route(&self, request: &Request) -> Result<Response> {
        let route = Route::resolve(&request.path)
            .ok_or_else(|| SiteError::not_found(request.path.clone()))?;
        match route {
            Route::Home => self.home(request),
            Route::Detail(id) => self.detail(id, request),
            Route::Edit(id) => self.edit_comment(id, request),
            Route::Delete(id) => self.delete_comment(id, request),
            Route::Auth(route) => auth::handle(&self.store, route, request, &Route::Home.path()),
        }
    }

    fn home(&self, request: &Request) -> Result<Response> {
        if request.method != Method::GET {
            return Err(SiteError::MethodNotAllowed);
        }
        let object_list = self
            .store
            .list_latest_news(self.settings.news_count_on_home_page)?;
        Ok(Response::ok(Page::NewsList { object_list }))
    }

    fn detail(&self, id: RecordId, request: &Request) -> Result<Response> {
        let news = self
            .store
            .get_news(id)?
            .ok_or_else(|| SiteError::not_found(format!("news {}", id)))?;

        match request.method {
            Method::GET => {
                let form = request.principal.is_authenticated().then(CommentForm::default);
                let comments = self.store.list_comments(news.id)?;
                Ok(Response::ok(Page::NewsDetail { news, comments, form }))
            }
            Method::POST => {
                let user = match auth::require_user(request) {
                    Ok(user) => user,
                    Err(redirect) => return Ok(redirect),
                };
                let mut form = CommentForm::bind(&request.form);
                let Some(text) = form.clean(&self.settings) else {
                    tracing::debug!(news = news.id, "comment rejected by form");
                    let comments = self.store.list_comments(news.id)?;
                    return Ok(Response::ok(Page::NewsDetail {
                        news,
                        comments,
                        form: Some(form),
                    }));
                };
                let comment = self.store.insert_comment(news.id, user.id, &text)?;
                tracing::info!(news = news.id, comment = comment.id, author = %user, "comment created");
                Ok(Response::redirect(comments_anchor(news.id)))
            }
            _ => Err(SiteError::MethodNotAllowed),
        }
    }

    /// The comment `id` when `principal` wrote it; not found otherwise.
    fn owned_comment(&self, id: RecordId, principal: &Principal) -> Result<Comment> {
        let comment = self
            .store
            .get_comment(id)?
            .ok_or_else(|| SiteError::not_found(format!("comment {}", id)))?;
        if !can_modify(principal, comment.author_id) {
            tracing::debug!(comment = id, "comment belongs to another user");
            return Err(SiteError::not_found(format!("comment {}", id)));
        }
        Ok(comment)
    }

    fn edit_comment(&self, id: RecordId, request: &Request) -> Result<Response> {
        if let Err(redirect) = auth::require_user(request) {
            return Ok(redirect);
        }
        let comment = self.owned_comment(id, &request.principal)?;

        match request.method {
            Method::GET => {
                let form = CommentForm::for_comment(&comment);
                Ok(Response::ok(Page::CommentEdit { comment, form }))
            }
            Method::POST => {
                let mut form = CommentForm::bind(&request.form);
                let Some(text) = form.clean(&self.settings) else {
                    return Ok(Response::ok(Page::CommentEdit { comment, form }));
                };
                self.store.update_comment_text(comment.id, &text)?;
                tracing::info!(comment = comment.id, "comment updated");
                Ok(Response::redirect(comments_anchor(comment.news_id)))
            }
            _ => Err(SiteError::MethodNotAllowed),
        }
    }

    fn delete_comment(&self, id: RecordId, request: &Request) -> Result<Response> {
        if let Err(redirect) = auth::require_user(request) {
            return Ok(redirect);
        }
        let comment = self.owned_comment(id, &request.principal)?;

        match request.method {
            Method::GET => Ok(Response::ok(Page::CommentDelete { comment })),
            Method::POST | Method::DELETE => {
                self.store.delete_comment(comment.id)?;
                tracing::info!(comment = comment.id, "comment deleted");
                Ok(Response::redirect(comments_anchor(comment.news_id)))
            }
            _ => Err(SiteError::MethodNotAllowed),
        }
    }
}

impl Site for NewsApp {
    fn handle(&self, request: &Request) -> Response {
        Response::from_result(request, self.route(request))
    }
}
