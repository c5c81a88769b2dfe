//! The notes app: private notes addressed by slug.
//!
//! Every route except the home page and the account pages needs a login,
//! and a user only ever sees their own notes. Someone else's note answers
//! exactly like a missing one.

use axum::http::Method;

use crate::auth::{self, can_modify, Principal};
use crate::config::Settings;
use crate::entity::{Note, User};
use crate::error::{Result, SiteError};
use crate::forms::NoteForm;
use crate::http::{Page, Request, Response, Site};
use crate::storage::Store;
use crate::urls::notes::Route;

pub struct NotesApp {
    store: Store,
    settings: Settings,
}

impl NotesApp {
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

        let user = match route {
            Route::Home => return only_get(request, Page::NotesHome),
            Route::Auth(route) => {
                return auth::handle(&self.store, route, request, &Route::Home.path())
            }
            _ => match auth::require_user(request) {
                Ok(user) => user,
                Err(redirect) => return Ok(redirect),
            },
        };

        match route {
            Route::List => {
                let object_list = self.store.list_notes_by_author(user.id)?;
                only_get(request, Page::NoteList { object_list })
            }
            Route::Success => only_get(request, Page::NoteSuccess),
            Route::Add => self.add(user, request),
            Route::Detail(slug) => {
                let note = self.owned_note(&slug, &request.principal)?;
                only_get(request, Page::NoteDetail { note })
            }
            Route::Edit(slug) => self.edit(&slug, request),
            Route::Delete(slug) => self.delete(&slug, request),
            Route::Home | Route::Auth(_) => Err(SiteError::not_found(request.path.clone())),
        }
    }

    /// The note at `slug` when `principal` wrote it; not found otherwise.
    fn owned_note(&self, slug: &str, principal: &Principal) -> Result<Note> {
        let note = self
            .store
            .get_note_by_slug(slug)?
            .ok_or_else(|| SiteError::not_found(format!("note {}", slug)))?;
        if !can_modify(principal, note.author_id) {
            tracing::debug!(slug, "note belongs to another user");
            return Err(SiteError::not_found(format!("note {}", slug)));
        }
        Ok(note)
    }

    fn add(&self, user: &User, request: &Request) -> Result<Response> {
        match request.method {
            Method::GET => Ok(Response::ok(Page::NoteEdit {
                form: NoteForm::default(),
            })),
            Method::POST => {
                let mut form = NoteForm::bind(&request.form);
                let Some(draft) = form.clean(&self.store, &self.settings, None)? else {
                    tracing::debug!(author = %user, "note rejected by form");
                    return Ok(Response::ok(Page::NoteEdit { form }));
                };
                let note = match self.store.insert_note(&draft, user.id) {
                    Ok(note) => note,
                    Err(SiteError::Duplicate(slug)) => {
                        tracing::debug!(%slug, "slug taken between check and insert");
                        form.slug_taken(&slug, &self.settings);
                        return Ok(Response::ok(Page::NoteEdit { form }));
                    }
                    Err(e) => return Err(e),
                };
                tracing::info!(slug = %note.slug, author = %user, "note created");
                Ok(Response::redirect(Route::Success.path()))
            }
            _ => Err(SiteError::MethodNotAllowed),
        }
    }

    fn edit(&self, slug: &str, request: &Request) -> Result<Response> {
        let note = self.owned_note(slug, &request.principal)?;
        match request.method {
            Method::GET => Ok(Response::ok(Page::NoteEdit {
                form: NoteForm::for_note(&note),
            })),
            Method::POST => {
                let mut form = NoteForm::bind(&request.form);
                let Some(draft) = form.clean(&self.store, &self.settings, Some(note.id))? else {
                    return Ok(Response::ok(Page::NoteEdit { form }));
                };
                match self.store.update_note(note.id, &draft) {
                    Ok(_) => {}
                    Err(SiteError::Duplicate(slug)) => {
                        form.slug_taken(&slug, &self.settings);
                        return Ok(Response::ok(Page::NoteEdit { form }));
                    }
                    Err(e) => return Err(e),
                }
                tracing::info!(from = %note.slug, to = %draft.slug, "note updated");
                Ok(Response::redirect(Route::Success.path()))
            }
            _ => Err(SiteError::MethodNotAllowed),
        }
    }

    fn delete(&self, slug: &str, request: &Request) -> Result<Response> {
        let note = self.owned_note(slug, &request.principal)?;
        match request.method {
            Method::GET => Ok(Response::ok(Page::NoteDelete { note })),
            Method::POST | Method::DELETE => {
                self.store.delete_note(note.id)?;
                tracing::info!(slug = %note.slug, "note deleted");
                Ok(Response::redirect(Route::Success.path()))
            }
            _ => Err(SiteError::MethodNotAllowed),
        }
    }
}

fn only_get(request: &Request, page: Page) -> Result<Response> {
    if request.method == Method::GET {
        Ok(Response::ok(page))
    } else {
        Err(SiteError::MethodNotAllowed)
    }
}

impl Site for NotesApp {
    fn handle(&self, request: &Request) -> Response {
        Response::from_result(request, self.route(request))
    }
}
