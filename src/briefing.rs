//! End-to-end briefing run: fetch, summarize, render.
//!
//! [`Briefing`] owns the three collaborators and runs them strictly in
//! sequence. User-facing progress goes to the output sink passed to
//! [`Briefing::run_once`]; diagnostics go through `tracing`.

use crate::api::{AskAsync, AskFnWrapper};
use crate::error::{BriefingError, Result};
use crate::models::{BriefingRequest, OutputMode};
use crate::outputs::{console, html};
use crate::sources::HeadlineSource;
use crate::summarizer::{SYSTEM_PROMPT, Summarizer};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Environment variable consulted when no API key is passed explicitly.
pub const API_KEY_ENV: &str = "NEWS_API_KEY";

/// What a single run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BriefingOutcome {
    /// The source returned no headlines; nothing was rendered.
    NoArticles,
    Rendered {
        article_count: usize,
        html_path: Option<PathBuf>,
    },
}

impl BriefingOutcome {
    pub fn html_path(&self) -> Option<&Path> {
        match self {
            BriefingOutcome::Rendered { html_path, .. } => html_path.as_deref(),
            BriefingOutcome::NoArticles => None,
        }
    }
}

pub struct Briefing<S, A> {
    source: S,
    summarizer: Summarizer<A>,
    output_dir: PathBuf,
}

impl<S, A> Briefing<S, A>
where
    S: HeadlineSource,
    A: AskAsync,
{
    pub fn new(source: S, summarizer: Summarizer<A>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            summarizer,
            output_dir: output_dir.into(),
        }
    }

    /// Run the whole pipeline once, writing the briefing to `out`.
    ///
    /// The console briefing is always written. With [`OutputMode::Html`] the
    /// HTML document is also saved and its path returned in the outcome.
    ///
    /// # Errors
    ///
    /// Fetch failures abort before anything is rendered. A persistence
    /// failure aborts only the HTML step; the console briefing has already
    /// been written by then. Summarization never fails the run.
    #[instrument(level = "info", skip_all, fields(category = %request.category, page_size = request.page_size))]
    pub async fn run_once<W: Write>(
        &self,
        request: &BriefingRequest,
        out: &mut W,
    ) -> Result<BriefingOutcome> {
        let t0 = Instant::now();
        writeln!(out, "Fetching {} news...", request.category)?;

        let articles = self
            .source
            .top_headlines(request.category, &request.country, request.page_size)
            .await?;

        if articles.is_empty() {
            writeln!(out, "No articles found.")?;
            warn!("Source returned no articles");
            return Ok(BriefingOutcome::NoArticles);
        }
        writeln!(out, "Found {} articles.", articles.len())?;

        let mut progress_result = Ok(());
        let summaries = self
            .summarizer
            .summarize_all(&articles, |i, total| {
                if progress_result.is_ok() {
                    progress_result = writeln!(out, "Summarizing article {i}/{total}");
                }
            })
            .await;
        progress_result?;

        console::render_console(out, &articles, request.category, &summaries)?;

        let html_path = match request.output_mode {
            OutputMode::Console => None,
            OutputMode::Html => {
                let document = html::render_html(&articles, request.category, &summaries);
                let path = html::save_html(&document, request.category, &self.output_dir).await?;
                writeln!(out, "HTML output saved to: {}", path.display())?;
                Some(path)
            }
        };

        info!(
            articles = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Briefing complete"
        );
        Ok(BriefingOutcome::Rendered {
            article_count: articles.len(),
            html_path,
        })
    }
}

/// Pick the API key: explicit value, then the environment, then `prompt`.
///
/// Blank values count as absent.
pub fn resolve_api_key<P>(explicit: Option<String>, env: Option<String>, prompt: P) -> Result<String>
where
    P: FnOnce() -> Result<String>,
{
    let present = |v: Option<String>| v.filter(|k| !k.trim().is_empty());

    if let Some(key) = present(explicit).or_else(|| present(env)) {
        return Ok(key);
    }
    present(Some(prompt()?)).ok_or_else(|| {
        BriefingError::Validation(format!(
            "A NewsAPI.org API key is required (pass --api-key or set {API_KEY_ENV})"
        ))
    })
}

/// Build the production summarizer, degrading to fallback-only summaries
/// when the LLM config cannot be loaded.
pub fn summarizer_from_config(llm_config: Option<&Path>) -> Summarizer<AskFnWrapper> {
    match AskFnWrapper::from_config_file(llm_config, SYSTEM_PROMPT) {
        Ok(client) => Summarizer::new(client),
        Err(e) => {
            warn!(error = %e, "LLM unavailable; summaries will be truncated descriptions");
            Summarizer::without_llm()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, ArticleSource, Category};
    use crate::summarizer::tests::ScriptedAsk;
    use std::cell::RefCell;

    /// Headline source that replays a canned result and records its inputs.
    struct CannedSource {
        result: RefCell<Option<Result<Vec<Article>>>>,
        calls: RefCell<Vec<(Category, String, u32)>>,
    }

    impl CannedSource {
        fn ok(articles: Vec<Article>) -> Self {
            Self {
                result: RefCell::new(Some(Ok(articles))),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn err(e: BriefingError) -> Self {
            Self {
                result: RefCell::new(Some(Err(e))),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl HeadlineSource for CannedSource {
        async fn top_headlines(
            &self,
            category: Category,
            country: &str,
            page_size: u32,
        ) -> Result<Vec<Article>> {
            self.calls
                .borrow_mut()
                .push((category, country.to_string(), page_size));
            self.result
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn article(title: &str, description: &str, source: &str) -> Article {
        Article {
            title: title.to_string(),
            description: Some(description.to_string()),
            source: Some(ArticleSource {
                name: Some(source.to_string()),
            }),
            url: Some(format!("https://example.com/{}", title.to_lowercase())),
            ..Default::default()
        }
    }

    fn request(category: Category, page_size: u32, mode: OutputMode) -> BriefingRequest {
        BriefingRequest {
            page_size,
            output_mode: mode,
            ..BriefingRequest::new(category, "test-key")
        }
    }

    #[tokio::test]
    async fn test_technology_briefing_without_llm_uses_fallback() {
        let long_description = "z".repeat(200);
        let source = CannedSource::ok(vec![
            article("Alpha", &long_description, "Wire A"),
            article("Beta", "Short teaser.", "Wire B"),
        ]);
        let briefing = Briefing::new(source, Summarizer::<ScriptedAsk>::without_llm(), "unused");

        let mut out = Vec::new();
        let outcome = briefing
            .run_once(&request(Category::Technology, 2, OutputMode::Console), &mut out)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            BriefingOutcome::Rendered {
                article_count: 2,
                html_path: None
            }
        );
        let calls = briefing.source.calls.borrow();
        assert_eq!(calls[0], (Category::Technology, "us".to_string(), 2));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Fetching technology news..."));
        assert!(text.contains("Found 2 articles."));
        assert!(text.contains("Summarizing article 1/2"));
        assert!(text.contains("Summarizing article 2/2"));
        assert!(text.contains("Daily News Briefing - Technology"));
        assert!(text.contains(&format!("│ {}...\n", "z".repeat(150))));
        assert!(text.contains("│ Short teaser.\n"));

        let first = text.find("#1").unwrap();
        let second = text.find("#2").unwrap();
        assert!(first < second);
        assert!(text[first..second].contains("Alpha"));
        assert!(text[second..].contains("Beta"));
    }

    #[tokio::test]
    async fn test_llm_summaries_are_used_in_order() {
        let source = CannedSource::ok(vec![
            article("One", "d1", "S"),
            article("Two", "d2", "S"),
        ]);
        let llm = ScriptedAsk::new(vec![Ok("LLM one."), Err("timeout")]);
        let briefing = Briefing::new(source, Summarizer::new(llm), "unused");

        let mut out = Vec::new();
        briefing
            .run_once(&request(Category::Science, 5, OutputMode::Console), &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("│ LLM one.\n"));
        assert!(text.contains("│ d2\n"));
    }

    #[tokio::test]
    async fn test_no_articles_is_not_an_error() {
        let briefing = Briefing::new(
            CannedSource::ok(Vec::new()),
            Summarizer::<ScriptedAsk>::without_llm(),
            "unused",
        );
        let mut out = Vec::new();
        let outcome = briefing
            .run_once(&request(Category::General, 5, OutputMode::Html), &mut out)
            .await
            .unwrap();

        assert_eq!(outcome, BriefingOutcome::NoArticles);
        assert_eq!(outcome.html_path(), None);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("No articles found."));
        assert!(!text.contains("Daily News Briefing"));
    }

    #[tokio::test]
    async fn test_upstream_error_aborts_run() {
        let briefing = Briefing::new(
            CannedSource::err(BriefingError::Upstream("apiKey is invalid".to_string())),
            Summarizer::<ScriptedAsk>::without_llm(),
            "unused",
        );
        let mut out = Vec::new();
        let err = briefing
            .run_once(&request(Category::Business, 5, OutputMode::Console), &mut out)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("apiKey is invalid"));
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Daily News Briefing"));
    }

    #[tokio::test]
    async fn test_html_mode_saves_and_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let briefing = Briefing::new(
            CannedSource::ok(vec![article("Gamma", "desc", "Wire")]),
            Summarizer::<ScriptedAsk>::without_llm(),
            dir.path(),
        );

        let mut out = Vec::new();
        let outcome = briefing
            .run_once(&request(Category::Health, 5, OutputMode::Html), &mut out)
            .await
            .unwrap();

        let path = outcome.html_path().unwrap().to_path_buf();
        assert!(path.starts_with(dir.path()));
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("<h2>Gamma</h2>"));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Daily News Briefing - Health"));
        assert!(text.contains(&format!("HTML output saved to: {}", path.display())));
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_console_output() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, "file, not dir").unwrap();

        let briefing = Briefing::new(
            CannedSource::ok(vec![article("Delta", "desc", "Wire")]),
            Summarizer::<ScriptedAsk>::without_llm(),
            blocker.join("out"),
        );
        let mut out = Vec::new();
        let err = briefing
            .run_once(&request(Category::Sports, 5, OutputMode::Html), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, BriefingError::Persistence { .. }));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("│ Delta"));
    }

    /// Sink that refuses progress lines and accepts everything else.
    struct NoProgressSink(Vec<u8>);

    impl Write for NoProgressSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if buf.starts_with(b"Summarizing") {
                return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
            }
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_progress_write_failure_is_reported() {
        let briefing = Briefing::new(
            CannedSource::ok(vec![article("Eps", "one", "S"), article("Zeta", "two", "S")]),
            Summarizer::<ScriptedAsk>::without_llm(),
            "unused",
        );
        let mut sink = NoProgressSink(Vec::new());
        let err = briefing
            .run_once(&request(Category::General, 5, OutputMode::Console), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, BriefingError::Io(_)));
        let text = String::from_utf8(sink.0).unwrap();
        assert!(text.contains("Found 2 articles."));
        assert!(!text.contains("Daily News Briefing"));
    }

    #[test]
    fn test_resolve_api_key_priority() {
        let never = || -> Result<String> { panic!("prompt should not run") };
        assert_eq!(
            resolve_api_key(Some("cli".into()), Some("env".into()), never).unwrap(),
            "cli"
        );
        assert_eq!(
            resolve_api_key(None, Some("env".into()), never).unwrap(),
            "env"
        );
        assert_eq!(
            resolve_api_key(Some("  ".into()), Some("env".into()), never).unwrap(),
            "env"
        );
        assert_eq!(
            resolve_api_key(None, None, || Ok("typed".to_string())).unwrap(),
            "typed"
        );
    }

    #[test]
    fn test_resolve_api_key_missing_everywhere() {
        let err = resolve_api_key(None, Some(String::new()), || Ok(String::new())).unwrap_err();
        assert!(matches!(err, BriefingError::Validation(_)));
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_summarizer_from_missing_config_has_no_llm() {
        let dir = tempfile::tempdir().unwrap();
        let summarizer = summarizer_from_config(Some(&dir.path().join("config.yaml")));
        assert!(!summarizer.has_llm());
    }
}
