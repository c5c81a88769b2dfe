// src/entity/news.rs
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub id: RecordId,
    pub title: String,
    pub text: String,
    /// Publication date; the home page lists the newest first.
    pub date: NaiveDate,
}

/// Fields of a news item that is not stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNews {
    pub title: String,
    pub text: String,
    pub date: NaiveDate,
}

impl NewNews {
    /// A news item dated today.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            date: Utc::now().date_naive(),
        }
    }

    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}
