use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{decode_date, decode_timestamp, encode_date, encode_timestamp, Store};
use crate::entity::{Comment, NewNews, News, RecordId};
use crate::error::Result;

fn news_from_row(row: &Row<'_>) -> rusqlite::Result<News> {
    let date: String = row.get(3)?;
    Ok(News {
        id: row.get(0)?,
        title: row.get(1)?,
        text: row.get(2)?,
        date: decode_date(3, &date)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    let created: String = row.get(4)?;
    Ok(Comment {
        id: row.get(0)?,
        news_id: row.get(1)?,
        author_id: row.get(2)?,
        text: row.get(3)?,
        created: decode_timestamp(4, &created)?,
    })
}

impl Store {
    pub fn insert_news(&self, news: &NewNews) -> Result<News> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO news (title, text, date) VALUES (?1, ?2, ?3)",
            params![news.title, news.text, encode_date(&news.date)],
        )?;
        Ok(News {
            id: conn.last_insert_rowid(),
            title: news.title.clone(),
            text: news.text.clone(),
            date: news.date,
        })
    }

    /// Insert several news items in one transaction
    pub fn insert_news_batch(&self, items: &[NewNews]) -> Result<Vec<News>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut stored = Vec::with_capacity(items.len());
        {
            let mut stmt = tx.prepare("INSERT INTO news (title, text, date) VALUES (?1, ?2, ?3)")?;
            for item in items {
                stmt.execute(params![item.title, item.text, encode_date(&item.date)])?;
                stored.push(News {
                    id: tx.last_insert_rowid(),
                    title: item.title.clone(),
                    text: item.text.clone(),
                    date: item.date,
                });
            }
        }
        tx.commit()?;
        Ok(stored)
    }

    pub fn get_news(&self, id: RecordId) -> Result<Option<News>> {
        let conn = self.conn()?;
        let news = conn
            .query_row(
                "SELECT id, title, text, date FROM news WHERE id = ?1",
                params![id],
                news_from_row,
            )
            .optional()?;
        Ok(news)
    }

    /// Newest news first, at most `limit` items
    pub fn list_latest_news(&self, limit: usize) -> Result<Vec<News>> {
        let conn = self.conn()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = conn.prepare(
            "SELECT id, title, text, date FROM news
             ORDER BY date DESC, id ASC
             LIMIT ?1",
        )?;
        let news = stmt
            .query_map(params![limit], news_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(news)
    }

    pub fn count_news(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Store a comment stamped with the current time
    pub fn insert_comment(&self, news_id: RecordId, author_id: RecordId, text: &str) -> Result<Comment> {
        self.insert_comment_at(news_id, author_id, text, Utc::now())
    }

    pub fn insert_comment_at(
        &self,
        news_id: RecordId,
        author_id: RecordId,
        text: &str,
        created: DateTime<Utc>,
    ) -> Result<Comment> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO comments (news_id, author_id, text, created) VALUES (?1, ?2, ?3, ?4)",
            params![news_id, author_id, text, encode_timestamp(&created)],
        )?;
        let id = conn.last_insert_rowid();
        // Read back so `created` carries the stored precision.
        let comment = conn.query_row(
            "SELECT id, news_id, author_id, text, created FROM comments WHERE id = ?1",
            params![id],
            comment_from_row,
        )?;
        Ok(comment)
    }

    pub fn get_comment(&self, id: RecordId) -> Result<Option<Comment>> {
        let conn = self.conn()?;
        let comment = conn
            .query_row(
                "SELECT id, news_id, author_id, text, created FROM comments WHERE id = ?1",
                params![id],
                comment_from_row,
            )
            .optional()?;
        Ok(comment)
    }

    /// Comments of one news item, oldest first
    pub fn list_comments(&self, news_id: RecordId) -> Result<Vec<Comment>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, news_id, author_id, text, created FROM comments
             WHERE news_id = ?1
             ORDER BY created ASC, id ASC",
        )?;
        let comments = stmt
            .query_map(params![news_id], comment_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    /// Returns false when no comment has this id
    pub fn update_comment_text(&self, id: RecordId, text: &str) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE comments SET text = ?1 WHERE id = ?2",
            params![text, id],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_comment(&self, id: RecordId) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM comments WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn count_comments(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
