//! Console briefing renderer.
//!
//! Writes into any [`Write`] sink so callers decide where the briefing goes
//! (stdout in the CLI, a `Vec<u8>` in tests).

use crate::models::{Article, Category};
use crate::outputs::briefing_title;
use crate::utils::briefing_date;
use chrono::{Local, NaiveDate};
use std::io::{self, Write};

const PANEL_WIDTH: usize = 60;

/// Print the briefing for today's local date.
pub fn render_console<W: Write>(
    out: &mut W,
    articles: &[Article],
    category: Category,
    summaries: &[String],
) -> io::Result<()> {
    write_briefing(out, articles, category, summaries, Local::now().date_naive())
}

/// Print the briefing with an explicit header date.
pub fn write_briefing<W: Write>(
    out: &mut W,
    articles: &[Article],
    category: Category,
    summaries: &[String],
    date: NaiveDate,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", briefing_title(category))?;
    writeln!(out, "{}", briefing_date(date))?;
    writeln!(out)?;

    for (i, (article, summary)) in articles.iter().zip(summaries).enumerate() {
        write_panel(out, i + 1, article, summary)?;
        writeln!(out)?;
    }
    out.flush()
}

fn write_panel<W: Write>(
    out: &mut W,
    index: usize,
    article: &Article,
    summary: &str,
) -> io::Result<()> {
    let label = format!("╭─ #{index} ");
    let fill = PANEL_WIDTH.saturating_sub(label.chars().count());
    writeln!(out, "{}{}", label, "─".repeat(fill))?;

    write_block(out, article.display_title())?;
    writeln!(out, "│")?;
    write_block(out, summary)?;
    writeln!(out, "│")?;
    writeln!(out, "│ Source: {}", article.source_name())?;
    writeln!(out, "│ Read more: {}", article.url_or_empty())?;

    writeln!(out, "╰{}", "─".repeat(PANEL_WIDTH - 1))
}

fn write_block<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    for line in text.lines() {
        writeln!(out, "│ {line}")?;
    }
    if text.is_empty() {
        writeln!(out, "│")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleSource;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    fn render(articles: &[Article], summaries: &[String]) -> String {
        let mut buf = Vec::new();
        write_briefing(&mut buf, articles, Category::Technology, summaries, date()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn article(title: &str, source: &str, url: &str) -> Article {
        Article {
            title: title.to_string(),
            source: Some(ArticleSource {
                name: Some(source.to_string()),
            }),
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_header_and_panels_in_order() {
        let articles = vec![
            article("First story", "Wire A", "https://a.example/1"),
            article("Second story", "Wire B", "https://b.example/2"),
        ];
        let summaries = vec!["Summary one.".to_string(), "Summary two.".to_string()];

        let out = render(&articles, &summaries);
        assert!(out.contains("Daily News Briefing - Technology\nTuesday, May 06, 2025\n"));

        let first = out.find("#1").unwrap();
        let second = out.find("#2").unwrap();
        assert!(first < second);
        assert!(out[first..second].contains("│ First story"));
        assert!(out[first..second].contains("│ Summary one."));
        assert!(out[first..second].contains("│ Source: Wire A"));
        assert!(out[first..second].contains("│ Read more: https://a.example/1"));
        assert!(out[second..].contains("│ Second story"));
    }

    #[test]
    fn test_missing_source_and_url_use_defaults() {
        let articles = vec![Article {
            title: "Bare".to_string(),
            ..Default::default()
        }];
        let out = render(&articles, &["s".to_string()]);
        assert!(out.contains("│ Source: Unknown source\n"));
        assert!(out.contains("│ Read more: \n"));
    }

    #[test]
    fn test_surplus_entries_are_dropped() {
        let articles = vec![
            article("Kept", "S", "u"),
            article("Dropped", "S", "u"),
        ];
        let out = render(&articles, &["only one".to_string()]);
        assert!(out.contains("Kept"));
        assert!(!out.contains("Dropped"));
        assert!(!out.contains("#2"));

        let out = render(&articles[..1], &["a".to_string(), "extra summary".to_string()]);
        assert!(!out.contains("extra summary"));
    }

    #[test]
    fn test_empty_briefing_has_header_only() {
        let out = render(&[], &[]);
        assert!(out.contains("Daily News Briefing - Technology"));
        assert!(!out.contains("#1"));
    }
}
