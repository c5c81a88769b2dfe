use rusqlite::{OptionalExtension, Row};

use super::{unique_violation, Store};
use crate::entity::User;
use crate::error::Result;

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
    })
}

impl Store {
    /// Register a user. A taken username fails with `SiteError::Duplicate`.
    pub fn create_user(&self, username: &str) -> Result<User> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO users (username) VALUES (?1)", [username])
            .map_err(|e| unique_violation(e, username))?;
        Ok(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
        })
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username FROM users WHERE username = ?1",
                [username],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn count_users(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
