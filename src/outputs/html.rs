//! Standalone HTML briefing.
//!
//! The document is self-contained (inline stylesheet, no scripts). Every
//! interpolated value is escaped, so arbitrary headlines cannot break the
//! markup and a parser recovers the original text.

use crate::error::{BriefingError, Result};
use crate::models::{Article, Category};
use crate::outputs::briefing_title;
use crate::utils::{briefing_date, escape_html, file_timestamp};
use chrono::{Local, NaiveDate};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};
use url::Url;

/// Default directory for saved briefings, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

const STYLE: &str = r#"        body {
            font-family: Arial, sans-serif;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #2c3e50;
            border-bottom: 2px solid #3498db;
            padding-bottom: 10px;
        }
        .date {
            color: #7f8c8d;
            font-style: italic;
            margin-bottom: 20px;
        }
        .article {
            border: 1px solid #e0e0e0;
            border-radius: 5px;
            padding: 15px;
            margin-bottom: 20px;
        }
        .article h2 {
            margin-top: 0;
            color: #2980b9;
        }
        .summary {
            font-style: italic;
            color: #34495e;
            margin: 10px 0;
        }
        .source {
            color: #7f8c8d;
            font-size: 0.9em;
        }
        a {
            color: #3498db;
            text-decoration: none;
        }
"#;

/// Render the briefing for today's local date.
pub fn render_html(articles: &[Article], category: Category, summaries: &[String]) -> String {
    html_document(articles, category, summaries, Local::now().date_naive())
}

/// Render the briefing with an explicit header date.
pub fn html_document(
    articles: &[Article],
    category: Category,
    summaries: &[String],
    date: NaiveDate,
) -> String {
    let title = escape_html(&briefing_title(category));
    let mut html = String::new();

    // writing into a String cannot fail
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{STYLE}    </style>
</head>
<body>
    <h1>{title}</h1>
    <div class="date">{date}</div>
"#,
        date = escape_html(&briefing_date(date)),
    );

    for (article, summary) in articles.iter().zip(summaries) {
        let _ = write!(
            html,
            r#"
    <div class="article">
        <h2>{}</h2>
        <div class="summary">{}</div>
        <div class="source">
            Source: <span class="source-name">{}</span> - <a href="{}" target="_blank">Read more</a>
        </div>
    </div>
"#,
            escape_html(article.display_title()),
            escape_html(summary),
            escape_html(article.source_name()),
            escape_html(link_target(article.url_or_empty())),
        );
    }

    html.push_str("\n</body>\n</html>\n");
    html
}

/// The `href` for an article link: the URL verbatim if it is absolute
/// http(s), otherwise empty.
fn link_target(url: &str) -> &str {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => url,
        _ => "",
    }
}

/// File name for a briefing saved at `timestamp` (`YYYYMMDD_HHMMSS`).
pub fn briefing_filename(category: Category, timestamp: &str) -> String {
    format!("news_briefing_{}_{}.html", category, timestamp)
}

/// Write `html` under `output_dir` and return the file's path.
///
/// The directory is created if needed. Names have one-second resolution, so
/// two saves for the same category within a second overwrite each other.
///
/// # Errors
///
/// [`BriefingError::Persistence`] if the directory or file cannot be written.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), %category))]
pub async fn save_html(html: &str, category: Category, output_dir: &Path) -> Result<PathBuf> {
    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create output directory");
        return Err(BriefingError::Persistence {
            path: output_dir.to_path_buf(),
            source: e,
        });
    }

    let path = output_dir.join(briefing_filename(category, &file_timestamp(Local::now())));
    fs::write(&path, html)
        .await
        .map_err(|e| BriefingError::Persistence {
            path: path.clone(),
            source: e,
        })?;

    info!(path = %path.display(), bytes = html.len(), "Wrote HTML briefing");
    Ok(path)
}
