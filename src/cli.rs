//! Command-line interface definitions for News Briefing.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! `-h` is taken by `--html`, so help is only available as `--help`.

use crate::outputs::html::DEFAULT_OUTPUT_DIR;
use crate::sources::newsapi::BASE_URL;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Command-line arguments for the News Briefing application.
///
/// # Examples
///
/// ```sh
/// # Console briefing, prompting for anything missing
/// news_briefing
///
/// # Technology headlines, also saved as HTML
/// news_briefing technology -k YOUR_KEY --html
///
/// # Every morning at 08:00 through the user's crontab
/// news_briefing health -s 08:00 --cron
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about, disable_help_flag = true)]
pub struct Cli {
    /// News category (business, entertainment, general, health, science, sports, technology)
    pub category: Option<String>,

    /// NewsAPI.org API key (falls back to NEWS_API_KEY, then a prompt)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Output results as HTML
    #[arg(short = 'h', long = "html")]
    pub html: bool,

    /// Schedule daily run at specified time (24-hour format, e.g. '08:00')
    #[arg(short = 's', long = "schedule", value_name = "HH:MM")]
    pub schedule: Option<String>,

    /// Use crontab instead of the in-process scheduler (only with --schedule)
    #[arg(long)]
    pub cron: bool,

    /// 2-letter ISO 3166-1 country code
    #[arg(long, default_value = "us")]
    pub country: String,

    /// Number of headlines to fetch
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: u32,

    /// Directory HTML briefings are written to
    #[arg(long, env = "NEWS_BRIEFING_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Path to the awful_aj config.yaml used for summarization
    #[arg(long, env = "NEWS_BRIEFING_LLM_CONFIG")]
    pub llm_config: Option<PathBuf>,

    /// Root URL of the headlines API
    #[arg(long, env = "NEWS_API_BASE_URL", default_value = BASE_URL, hide = true)]
    pub news_api_url: String,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}
