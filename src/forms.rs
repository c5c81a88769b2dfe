//! Input forms and their field-level validation.
//!
//! A form keeps the submitted values and any errors so that an invalid
//! submission can be shown again with its messages. Validation never
//! touches stored records.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::Settings;
use crate::entity::{Comment, Note, NoteDraft, RecordId};
use crate::error::Result;
use crate::http::FormData;
use crate::slug;
use crate::storage::Store;

/// Message for a required field left empty.
pub const REQUIRED: &str = "Обязательное поле.";

/// Message for a slug with characters outside `[-a-zA-Z0-9_]`.
pub const INVALID_SLUG: &str =
    "Значение должно состоять только из латинских букв, цифр, знаков подчеркивания или дефиса.";

/// Message for a signup with a username already registered.
pub const USERNAME_TAKEN: &str = "Пользователь с таким именем уже существует.";

const NOTE_TITLE_MAX_LENGTH: usize = 100;

fn too_long(max: usize, actual: usize) -> String {
    format!(
        "Убедитесь, что это значение содержит не более {} символов (сейчас {}).",
        max, actual
    )
}

/// Errors keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages attached to `field`, in the order they were raised.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn field_value(data: &FormData, name: &str) -> String {
    data.get(name).map(|v| v.trim().to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommentForm {
    pub text: String,
    pub errors: FormErrors,
}

impl CommentForm {
    pub fn bind(data: &FormData) -> Self {
        Self {
            text: field_value(data, "text"),
            errors: FormErrors::default(),
        }
    }

    pub fn for_comment(comment: &Comment) -> Self {
        Self {
            text: comment.text.clone(),
            errors: FormErrors::default(),
        }
    }

    /// Check the text. Returns it when valid; otherwise records errors.
    pub fn clean(&mut self, settings: &Settings) -> Option<String> {
        if self.text.is_empty() {
            self.errors.add("text", REQUIRED);
            return None;
        }
        let lowered = self.text.to_lowercase();
        if settings
            .bad_words
            .iter()
            .any(|word| lowered.contains(&word.to_lowercase()))
        {
            self.errors.add("text", settings.comment_warning.clone());
            return None;
        }
        Some(self.text.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteForm {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub errors: FormErrors,
}

impl NoteForm {
    pub fn bind(data: &FormData) -> Self {
        Self {
            title: field_value(data, "title"),
            text: field_value(data, "text"),
            slug: field_value(data, "slug"),
            errors: FormErrors::default(),
        }
    }

    pub fn for_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
            errors: FormErrors::default(),
        }
    }

    /// Validate against the store. `instance` is the note being edited, if
    /// any; its own slug does not count as taken.
    ///
    /// An empty slug is derived from the title. Returns the draft to store,
    /// or `None` with errors recorded on the form.
    pub fn clean(
        &mut self,
        store: &Store,
        settings: &Settings,
        instance: Option<RecordId>,
    ) -> Result<Option<NoteDraft>> {
        let title_len = self.title.chars().count();
        if self.title.is_empty() {
            self.errors.add("title", REQUIRED);
        } else if title_len > NOTE_TITLE_MAX_LENGTH {
            self.errors.add("title", too_long(NOTE_TITLE_MAX_LENGTH, title_len));
        }
        if self.text.is_empty() {
            self.errors.add("text", REQUIRED);
        }

        let slug = if self.slug.is_empty() {
            if self.title.is_empty() {
                None
            } else {
                Some(slug::truncate(&slug::slugify(&self.title), settings.slug_max_length))
            }
        } else {
            Some(self.slug.clone())
        };

        if let Some(slug) = &slug {
            let slug_len = slug.chars().count();
            if slug_len > settings.slug_max_length {
                self.errors.add("slug", too_long(settings.slug_max_length, slug_len));
            } else if !slug::is_valid(slug) {
                self.errors.add("slug", INVALID_SLUG);
            } else if store.slug_taken(slug, instance)? {
                self.slug_taken(slug, settings);
            }
        }

        match slug {
            Some(slug) if self.errors.is_empty() => {
                Ok(Some(NoteDraft::new(self.title.clone(), self.text.clone(), slug)))
            }
            _ => Ok(None),
        }
    }

    /// Record that `slug` belongs to another note.
    pub fn slug_taken(&mut self, slug: &str, settings: &Settings) {
        self.errors.add("slug", format!("{}{}", slug, settings.slug_warning));
    }
}

/// Username form used by login and signup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthForm {
    pub username: String,
    pub errors: FormErrors,
}

impl AuthForm {
    pub fn bind(data: &FormData) -> Self {
        Self {
            username: field_value(data, "username"),
            errors: FormErrors::default(),
        }
    }

    pub fn username_taken(&mut self) {
        self.errors.add("username", USERNAME_TAKEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::form_data;

    #[test]
    fn test_comment_bad_word() {
        let settings = Settings::default();
        let mut form = CommentForm::bind(&form_data(&[("text", "Какой-то текст, РЕДИСКА, еще текст")]));
        assert!(form.clean(&settings).is_none());
        assert_eq!(form.errors.field("text"), ["Не ругайтесь!"]);
    }

    #[test]
    fn test_comment_required() {
        let settings = Settings::default();
        let mut form = CommentForm::bind(&form_data(&[("text", "   ")]));
        assert!(form.clean(&settings).is_none());
        assert_eq!(form.errors.field("text"), [REQUIRED]);
    }

    #[test]
    fn test_comment_valid() {
        let settings = Settings::default();
        let mut form = CommentForm::bind(&form_data(&[("text", "Текст комментария")]));
        assert_eq!(form.clean(&settings).as_deref(), Some("Текст комментария"));
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_note_slug_derived_from_title() {
        let store = Store::open_in_memory().unwrap();
        let settings = Settings::default();
        let mut form = NoteForm::bind(&form_data(&[("title", "Название заметки"), ("text", "Текст")]));
        let draft = form.clean(&store, &settings, None).unwrap().unwrap();
        assert_eq!(draft.slug, "nazvanie-zametki");
    }

    #[test]
    fn test_note_duplicate_slug() {
        let store = Store::open_in_memory().unwrap();
        let settings = Settings::default();
        let author = store.create_user("Сергей Михалков").unwrap();
        let existing = store
            .insert_note(&NoteDraft::new("Заголовок", "Текст", "Mikhalkov"), author.id)
            .unwrap();

        let data = form_data(&[("title", "Другое"), ("text", "Текст"), ("slug", "Mikhalkov")]);
        let mut form = NoteForm::bind(&data);
        assert!(form.clean(&store, &settings, None).unwrap().is_none());
        assert_eq!(
            form.errors.field("slug"),
            [format!("Mikhalkov{}", settings.slug_warning)]
        );

        // The note's own slug is fine when editing it.
        let mut form = NoteForm::bind(&data);
        assert!(form.clean(&store, &settings, Some(existing.id)).unwrap().is_some());
    }

    #[test]
    fn test_note_required_and_format() {
        let store = Store::open_in_memory().unwrap();
        let settings = Settings::default();
        let mut form = NoteForm::bind(&form_data(&[("slug", "with space")]));
        assert!(form.clean(&store, &settings, None).unwrap().is_none());
        assert_eq!(form.errors.field("title"), [REQUIRED]);
        assert_eq!(form.errors.field("text"), [REQUIRED]);
        assert_eq!(form.errors.field("slug"), [INVALID_SLUG]);
    }

    #[test]
    fn test_note_title_too_long() {
        let store = Store::open_in_memory().unwrap();
        let settings = Settings::default();
        let title = "я".repeat(101);
        let mut form = NoteForm::bind(&form_data(&[("title", title.as_str()), ("text", "Текст")]));
        assert!(form.clean(&store, &settings, None).unwrap().is_none());
        assert!(form.errors.field("title")[0].contains("101"));
    }
}
