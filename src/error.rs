//! Error taxonomy for the briefing pipeline.
//!
//! Fetch, validation, persistence and prompt failures surface to the user and
//! abort the run. [`BriefingError::Summarization`] is only ever produced
//! internally; the summarizer absorbs it into a fallback summary.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BriefingError {
    #[error("{0}")]
    Validation(String),

    #[error("news request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response from news API: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API Error: {0}")]
    Upstream(String),

    #[error("summarization failed: {0}")]
    Summarization(String),

    #[error("could not write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),

    #[error("crontab installation failed: {0}")]
    Cron(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BriefingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_preserved() {
        let err = BriefingError::Upstream("apiKey is invalid".to_string());
        assert!(err.to_string().contains("apiKey is invalid"));
    }

    #[test]
    fn test_persistence_names_the_path() {
        let err = BriefingError::Persistence {
            path: PathBuf::from("data/news_briefing_health_20250506_080000.html"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("news_briefing_health_20250506_080000.html"));
        assert!(msg.contains("denied"));
    }
}
