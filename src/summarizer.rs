//! Article summarization.
//!
//! Each article gets one LLM call asking for a neutral 1-2 sentence summary.
//! Any failure (error, empty reply, or no LLM configured) falls back to a
//! deterministic summary built from the article itself, so a briefing always
//! has something to show for every headline.

use crate::api::AskAsync;
use crate::models::Article;
use crate::utils::{truncate_for_log, truncate_with_ellipsis};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

/// System instruction bound into the LLM client.
pub const SYSTEM_PROMPT: &str = "You are a news article summarizer. Your task is to create concise, \
informative summaries of news articles in 1-2 sentences. Focus on the key facts and main points. \
Be objective and neutral in your summary.";

/// Longest description kept verbatim by the fallback.
pub const FALLBACK_MAX_CHARS: usize = 150;

pub struct Summarizer<A> {
    llm: Option<A>,
}

impl<A: AskAsync> Summarizer<A> {
    pub fn new(llm: A) -> Self {
        Self { llm: Some(llm) }
    }

    /// A summarizer with no model behind it; every summary is a fallback.
    pub fn without_llm() -> Self {
        Self { llm: None }
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Summarize one article, falling back on any LLM failure.
    #[instrument(level = "info", skip_all, fields(title = %truncate_for_log(&article.title, 60)))]
    pub async fn summarize(&self, article: &Article) -> String {
        let Some(llm) = &self.llm else {
            debug!("No LLM configured; using fallback summary");
            return fallback_summary(article);
        };

        match llm.ask(&build_prompt(article)).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => {
                warn!("LLM returned an empty summary; using fallback");
                fallback_summary(article)
            }
            Err(e) => {
                warn!(error = %e, "LLM summarization failed; using fallback");
                fallback_summary(article)
            }
        }
    }

    /// Summarize every article one at a time, in order, calling
    /// `progress(n, total)` before the n-th (1-based) article.
    pub async fn summarize_all<P>(
        &self,
        articles: &[Article],
        mut progress: P,
    ) -> Vec<String>
    where
        P: FnMut(usize, usize),
    {
        let total = articles.len();
        stream::iter(articles.iter().enumerate())
            .then(|(i, article)| {
                info!(index = i + 1, total, "Summarizing article");
                progress(i + 1, total);
                self.summarize(article)
            })
            .collect()
            .await
    }
}

/// The user prompt sent for one article.
pub fn build_prompt(article: &Article) -> String {
    format!(
        "Title: {}\nDescription: {}\nContent: {}\n\nPlease summarize this news article in 1-2 concise sentences.",
        article.title,
        article.description.as_deref().unwrap_or(""),
        article.content.as_deref().unwrap_or(""),
    )
}

/// Summary used when the LLM is unavailable.
///
/// A non-empty description is returned as-is up to [`FALLBACK_MAX_CHARS`],
/// otherwise cut to that length with `"..."` appended. Without a
/// description the title stands in.
pub fn fallback_summary(article: &Article) -> String {
    match article.description.as_deref() {
        Some(description) if !description.is_empty() => {
            truncate_with_ellipsis(description, FALLBACK_MAX_CHARS)
        }
        _ => article.title.clone(),
    }
}
