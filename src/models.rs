//! Data models for headlines, categories and briefing requests.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: One headline record as returned by the news API
//! - [`HeadlinesResponse`]: The raw `/top-headlines` response envelope
//! - [`Category`]: The fixed set of topics the news API accepts
//! - [`BriefingRequest`] and [`OutputMode`]: Everything one run needs
//! - [`TimeOfDay`] and [`ScheduleSpec`]: Validated input for daily scheduling
//!
//! Wire types keep the news API's camelCase names via `#[serde(rename_all)]`.

use crate::error::{BriefingError, Result};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shown when an article carries no source name.
pub const UNKNOWN_SOURCE: &str = "Unknown source";

/// Shown when an article carries no title.
pub const NO_TITLE: &str = "No title";

/// Treat JSON `null` like a missing field for plain string fields.
fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// The publisher an article came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleSource {
    pub name: Option<String>,
}

/// A single headline as returned by the news API.
///
/// Only `title` is guaranteed to be present; everything else is optional and
/// the upstream API routinely sends `null` for `description` and `content`.
/// Position in the fetched list is the display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// The article headline.
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    /// A short teaser supplied by the publisher.
    #[serde(default)]
    pub description: Option<String>,
    /// The (usually truncated) article body.
    #[serde(default)]
    pub content: Option<String>,
    /// The publishing outlet.
    #[serde(default)]
    pub source: Option<ArticleSource>,
    /// Link to the full story.
    #[serde(default)]
    pub url: Option<String>,
}

impl Article {
    /// The headline, or [`NO_TITLE`] when the API sent none.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            NO_TITLE
        } else {
            &self.title
        }
    }

    /// The outlet name, or [`UNKNOWN_SOURCE`].
    pub fn source_name(&self) -> &str {
        self.source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_SOURCE)
    }

    /// The link target; an empty string when absent.
    pub fn url_or_empty(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }
}

/// Response envelope of the `/top-headlines` endpoint.
///
/// On failure the API sends `status: "error"` together with a `code` and a
/// human-readable `message`; `articles` is only present on success.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlinesResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Option<Vec<Article>>,
}

/// News topics accepted by the headlines endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// The lowercase value sent to the API and used in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }

    /// Title-cased name for headers ("technology" -> "Technology").
    pub fn title(&self) -> String {
        crate::utils::upcase(self.as_str())
    }

    /// Comma-separated list of all category names, for error messages.
    pub fn available() -> String {
        Category::ALL.iter().map(Category::as_str).join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = BriefingError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                BriefingError::Validation(format!(
                    "Invalid category: {}\nAvailable categories: {}",
                    s,
                    Category::available()
                ))
            })
    }
}

/// How a briefing is delivered.
///
/// The console briefing is always printed; `Html` additionally renders and
/// saves a standalone HTML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Console,
    Html,
}

/// Everything a single pipeline run needs.
#[derive(Clone)]
pub struct BriefingRequest {
    pub category: Category,
    /// NewsAPI.org key. Never logged or written to disk by the pipeline.
    pub api_key: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    pub page_size: u32,
    pub output_mode: OutputMode,
}

impl BriefingRequest {
    pub const DEFAULT_COUNTRY: &'static str = "us";
    pub const DEFAULT_PAGE_SIZE: u32 = 5;

    pub fn new(category: Category, api_key: impl Into<String>) -> Self {
        Self {
            category,
            api_key: api_key.into(),
            country: Self::DEFAULT_COUNTRY.to_string(),
            page_size: Self::DEFAULT_PAGE_SIZE,
            output_mode: OutputMode::Console,
        }
    }
}

impl fmt::Debug for BriefingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BriefingRequest")
            .field("category", &self.category)
            .field("api_key", &"<redacted>")
            .field("country", &self.country)
            .field("page_size", &self.page_size)
            .field("output_mode", &self.output_mode)
            .finish()
    }
}

static HH_MM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid HH:MM regex"));

/// A wall-clock time in 24-hour "HH:MM" form with leading zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub fn to_naive_time(self) -> chrono::NaiveTime {
        // hour and minute are range-checked by the parser
        chrono::NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or_default()
    }
}

impl FromStr for TimeOfDay {
    type Err = BriefingError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = HH_MM.captures(s).ok_or_else(|| {
            BriefingError::Validation(format!(
                "Invalid schedule time '{s}': expected 24-hour HH:MM, e.g. 08:00"
            ))
        })?;
        // both groups are two ASCII digits
        let hour = caps[1].parse().unwrap_or_default();
        let minute = caps[2].parse().unwrap_or_default();
        Ok(TimeOfDay { hour, minute })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A recurring daily briefing.
#[derive(Clone)]
pub struct ScheduleSpec {
    pub time_of_day: TimeOfDay,
    pub category: Category,
    pub api_key: String,
}

impl fmt::Debug for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleSpec")
            .field("time_of_day", &self.time_of_day)
            .field("category", &self.category)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
