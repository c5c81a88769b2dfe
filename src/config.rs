//! Site settings.
//!
//! Settings are read from an optional YAML file. Missing keys fall back to
//! the defaults below, and `YASITE_NEWS_COUNT` overrides the home page size.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

/// Environment variable overriding `news_count_on_home_page`.
pub const NEWS_COUNT_ENV: &str = "YASITE_NEWS_COUNT";

const DEFAULT_NEWS_COUNT: usize = 10;
const DEFAULT_SLUG_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How many news items the home page shows.
    pub news_count_on_home_page: usize,
    /// Words that make a comment invalid. Matched case-insensitively.
    pub bad_words: Vec<String>,
    /// Error shown on the comment `text` field when a bad word is found.
    pub comment_warning: String,
    /// Suffix appended to a duplicate slug in the note `slug` field error.
    pub slug_warning: String,
    /// Upper bound for note titles and slugs, in characters.
    pub slug_max_length: usize,
    /// SQLite file. `None` keeps everything in memory.
    pub database: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            news_count_on_home_page: DEFAULT_NEWS_COUNT,
            bad_words: vec!["редиска".to_string(), "негодяй".to_string()],
            comment_warning: "Не ругайтесь!".to_string(),
            slug_warning: " - такой slug уже существует, придумайте уникальное значение!"
                .to_string(),
            slug_max_length: DEFAULT_SLUG_MAX_LENGTH,
            database: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file, or defaults when `path` is `None`.
    /// The environment override is applied in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::from_yaml(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        settings.with_env_override(std::env::var(NEWS_COUNT_ENV).ok().as_deref())
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    fn with_env_override(mut self, news_count: Option<&str>) -> Result<Self> {
        if let Some(raw) = news_count {
            self.news_count_on_home_page = raw.trim().parse().map_err(|_| {
                SiteError::Config(format!("{} must be a positive integer, got '{}'", NEWS_COUNT_ENV, raw))
            })?;
            self.validate()?;
        }
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.news_count_on_home_page == 0 {
            return Err(SiteError::Config(
                "news_count_on_home_page must be greater than zero".to_string(),
            ));
        }
        if self.slug_max_length == 0 {
            return Err(SiteError::Config(
                "slug_max_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.news_count_on_home_page, 10);
        assert_eq!(settings.bad_words, vec!["редиска", "негодяй"]);
        assert_eq!(settings.comment_warning, "Не ругайтесь!");
        assert!(settings.slug_warning.starts_with(" - "));
        assert!(settings.database.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings = Settings::from_yaml("news_count_on_home_page: 3\n").unwrap();
        assert_eq!(settings.news_count_on_home_page, 3);
        assert_eq!(settings.slug_max_length, 100);
        assert_eq!(settings.bad_words.len(), 2);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = Settings::from_yaml("news_count_on_home_page: 0\n").unwrap_err();
        assert!(matches!(err, SiteError::Config(_)));
    }

    #[test]
    fn test_env_override() {
        let settings = Settings::default().with_env_override(Some("4")).unwrap();
        assert_eq!(settings.news_count_on_home_page, 4);

        let err = Settings::default().with_env_override(Some("many")).unwrap_err();
        assert!(err.to_string().contains(NEWS_COUNT_ENV));
    }

    #[test]
    fn test_serialization() {
        let settings = Settings::default();
        let yaml = serde_yaml::to_string(&settings).unwrap();
        let parsed = Settings::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, settings);
    }
}
