// src/entity/comment.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: RecordId,
    pub news_id: RecordId,
    pub author_id: RecordId,
    pub text: String,
    /// Set when the comment is stored. Comments are shown oldest first.
    pub created: DateTime<Utc>,
}
