pub mod auth;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod forms;
pub mod http;
pub mod news;
pub mod notes;
pub mod server;
pub mod slug;
pub mod storage;
pub mod urls;

pub use config::Settings;
pub use error::{Result, SiteError};
pub use http::{Client, Site};
pub use news::NewsApp;
pub use notes::NotesApp;
