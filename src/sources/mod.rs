//! Headline sources.
//!
//! A source turns a [`Category`] into an ordered list of [`Article`]s. The
//! pipeline only depends on the [`HeadlineSource`] trait so tests can swap in
//! canned headlines.
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | NewsAPI.org | [`newsapi`] | `/v2/top-headlines` REST | Requires API key |

pub mod newsapi;

use crate::error::Result;
use crate::models::{Article, Category};

/// Something that can list today's top headlines for a category.
pub trait HeadlineSource {
    /// Fetch at most `page_size` headlines, in the order the source ranks them.
    async fn top_headlines(
        &self,
        category: Category,
        country: &str,
        page_size: u32,
    ) -> Result<Vec<Article>>;
}
