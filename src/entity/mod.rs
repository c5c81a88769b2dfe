mod comment;
mod news;
mod note;
mod user;

pub use comment::Comment;
pub use news::{NewNews, News};
pub use note::{Note, NoteDraft};
pub use user::User;

/// Row id of a stored record. Ids are assigned by the store in insertion
/// order and never reused within a store.
pub type RecordId = i64;
