use rusqlite::{params, OptionalExtension, Row};

use super::{unique_violation, Store};
use crate::entity::{Note, NoteDraft, RecordId};
use crate::error::Result;

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        text: row.get(2)?,
        slug: row.get(3)?,
        author_id: row.get(4)?,
    })
}

impl Store {
    /// Store a new note. A slug already in use fails with
    /// `SiteError::Duplicate` and leaves the store unchanged.
    pub fn insert_note(&self, draft: &NoteDraft, author_id: RecordId) -> Result<Note> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO notes (title, text, slug, author_id) VALUES (?1, ?2, ?3, ?4)",
            params![draft.title, draft.text, draft.slug, author_id],
        )
        .map_err(|e| unique_violation(e, &draft.slug))?;
        Ok(Note {
            id: conn.last_insert_rowid(),
            title: draft.title.clone(),
            text: draft.text.clone(),
            slug: draft.slug.clone(),
            author_id,
        })
    }

    /// Insert several notes for one author in one transaction
    pub fn insert_notes_batch(&self, drafts: &[NoteDraft], author_id: RecordId) -> Result<Vec<Note>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut stored = Vec::with_capacity(drafts.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO notes (title, text, slug, author_id) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for draft in drafts {
                stmt.execute(params![draft.title, draft.text, draft.slug, author_id])?;
                stored.push(Note {
                    id: tx.last_insert_rowid(),
                    title: draft.title.clone(),
                    text: draft.text.clone(),
                    slug: draft.slug.clone(),
                    author_id,
                });
            }
        }
        tx.commit()?;
        Ok(stored)
    }

    pub fn get_note_by_slug(&self, slug: &str) -> Result<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                "SELECT id, title, text, slug, author_id FROM notes WHERE slug = ?1",
                [slug],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    pub fn get_note(&self, id: RecordId) -> Result<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                "SELECT id, title, text, slug, author_id FROM notes WHERE id = ?1",
                params![id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    /// Notes of one author in creation order
    pub fn list_notes_by_author(&self, author_id: RecordId) -> Result<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, text, slug, author_id FROM notes
             WHERE author_id = ?1
             ORDER BY id ASC",
        )?;
        let notes = stmt
            .query_map(params![author_id], note_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    /// Whether another note already uses `slug`. `exclude` skips the note
    /// being edited.
    pub fn slug_taken(&self, slug: &str, exclude: Option<RecordId>) -> Result<bool> {
        let conn = self.conn()?;
        let found: Option<RecordId> = conn
            .query_row(
                "SELECT id FROM notes WHERE slug = ?1 AND id IS NOT ?2",
                params![slug, exclude],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Same duplicate-slug contract as `insert_note`.
    pub fn update_note(&self, id: RecordId, draft: &NoteDraft) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE notes SET title = ?1, text = ?2, slug = ?3 WHERE id = ?4",
                params![draft.title, draft.text, draft.slug, id],
            )
            .map_err(|e| unique_violation(e, &draft.slug))?;
        Ok(changed > 0)
    }

    pub fn delete_note(&self, id: RecordId) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn count_notes(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
