//! # News Briefing
//!
//! Fetches the top headlines for one news category from NewsAPI.org,
//! summarizes each article through an OpenAI-compatible LLM, and prints a
//! briefing to the terminal, optionally saving it as HTML as well.
//!
//! ## Usage
//!
//! ```sh
//! news_briefing technology --api-key YOUR_KEY --html
//! news_briefing health --schedule 08:00          # in-process daily loop
//! news_briefing health --schedule 08:00 --cron   # install a crontab entry
//! ```
//!
//! ## Architecture
//!
//! Each run is a strictly sequential pipeline:
//! 1. **Fetch**: top headlines for the category ([`sources`])
//! 2. **Summarize**: one LLM call per article, truncation fallback on failure ([`summarizer`])
//! 3. **Render**: console panels, plus a saved HTML document on request ([`outputs`])
//!
//! [`scheduler`] repeats the pipeline daily, [`briefing`] wires it together.

use chrono::Local;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod briefing;
mod cli;
mod error;
mod models;
mod outputs;
mod scheduler;
mod sources;
mod summarizer;
mod utils;

use api::AskAsync;
use briefing::{API_KEY_ENV, Briefing, BriefingOutcome, resolve_api_key, summarizer_from_config};
use cli::Cli;
use error::Result;
use models::{BriefingRequest, Category, OutputMode, ScheduleSpec, TimeOfDay};
use scheduler::{DailyScheduler, install_crontab, setup_cron_job};
use sources::HeadlineSource;
use sources::newsapi::NewsApiClient;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,news_briefing=info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args.category, html = args.html, ?args.schedule, cron = args.cron, "Parsed CLI arguments");

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "News briefing failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<ExitCode> {
    let category = match args.category.as_deref() {
        Some(name) => name.parse::<Category>()?,
        None => prompt_category()?,
    };

    // Validate the schedule before asking for secrets.
    let schedule_time = args
        .schedule
        .as_deref()
        .map(str::parse::<TimeOfDay>)
        .transpose()?;

    let api_key = resolve_api_key(
        args.api_key.clone(),
        std::env::var(API_KEY_ENV).ok(),
        prompt_api_key,
    )?;

    let Some(time_of_day) = schedule_time else {
        if args.cron {
            warn!("--cron has no effect without --schedule");
        }
        return run_now(&args, category, api_key).await;
    };

    let spec = ScheduleSpec {
        time_of_day,
        category,
        api_key,
    };
    if args.cron {
        schedule_with_cron(&spec).await?;
    } else {
        schedule_in_process(&args, spec).await?;
    }
    Ok(ExitCode::SUCCESS)
}

fn build_request(args: &Cli, category: Category, api_key: String) -> BriefingRequest {
    BriefingRequest {
        country: args.country.clone(),
        page_size: args.page_size,
        output_mode: if args.html {
            OutputMode::Html
        } else {
            OutputMode::Console
        },
        ..BriefingRequest::new(category, api_key)
    }
}

fn build_briefing(
    args: &Cli,
    api_key: &str,
) -> Result<Briefing<NewsApiClient, api::AskFnWrapper>> {
    let client = NewsApiClient::new(api_key)?.with_base_url(&args.news_api_url)?;
    let summarizer = summarizer_from_config(args.llm_config.as_deref());
    if !summarizer.has_llm() {
        println!("LLM not configured; falling back to article descriptions.");
    }
    Ok(Briefing::new(client, summarizer, &args.output_dir))
}

async fn run_now(args: &Cli, category: Category, api_key: String) -> Result<ExitCode> {
    let request = build_request(args, category, api_key);
    let briefing = build_briefing(args, &request.api_key)?;

    let mut out = std::io::stdout();
    let outcome = briefing.run_once(&request, &mut out).await?;
    Ok(ExitCode::from(exit_status(&outcome)))
}

/// Process exit status for a one-off run: an empty briefing counts as failure.
fn exit_status(outcome: &BriefingOutcome) -> u8 {
    match outcome {
        BriefingOutcome::NoArticles => 1,
        BriefingOutcome::Rendered { .. } => 0,
    }
}

#[instrument(level = "info", skip_all, fields(category = %spec.category, at = %spec.time_of_day))]
async fn schedule_in_process(args: &Cli, spec: ScheduleSpec) -> Result<()> {
    let request = build_request(args, spec.category, spec.api_key);
    let briefing = build_briefing(args, &request.api_key)?;

    println!(
        "Scheduling daily news briefing for {} at {}",
        spec.category, spec.time_of_day
    );
    println!("Press Ctrl+C to stop the scheduler");

    let mut scheduler = DailyScheduler::new();
    scheduler.register(spec.time_of_day, Local::now().naive_local());
    for job in scheduler.jobs() {
        println!("Next run: {}", job.next_run.format("%Y-%m-%d %H:%M"));
    }

    let briefing = &briefing;
    let request = &request;
    scheduler
        .run(
            move || run_scheduled(briefing, request),
            async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!(error = %e, "Could not listen for Ctrl+C");
                }
            },
        )
        .await;

    debug!(state = ?scheduler.state(), "Scheduler loop exited");
    println!("Scheduler stopped.");
    Ok(())
}

async fn run_scheduled<S, A>(briefing: &Briefing<S, A>, request: &BriefingRequest)
where
    S: HeadlineSource,
    A: AskAsync,
{
    println!(
        "Running scheduled news briefing for {} at {}",
        request.category,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let mut out = std::io::stdout();
    match briefing.run_once(request, &mut out).await {
        Ok(BriefingOutcome::NoArticles) => warn!("Scheduled briefing found no articles"),
        Ok(BriefingOutcome::Rendered { article_count, .. }) => {
            info!(article_count, "Scheduled briefing finished")
        }
        Err(e) => {
            error!(error = %e, "Scheduled briefing failed");
            eprintln!("Error: {e}");
        }
    }
}

async fn schedule_with_cron(spec: &ScheduleSpec) -> Result<()> {
    let cron_cmd = setup_cron_job(spec)?;

    println!("Run this command to schedule with crontab:");
    println!("{cron_cmd}");

    let run_now = inquire::Confirm::new("Do you want to run this command now?")
        .with_default(false)
        .prompt()?;
    if run_now {
        install_crontab(&cron_cmd).await?;
        println!("Cron job scheduled successfully!");
    }
    Ok(())
}

fn prompt_category() -> Result<Category> {
    let choices = NewsApiClient::available_categories().to_vec();
    let default = choices
        .iter()
        .position(|c| *c == Category::Technology)
        .unwrap_or_default();
    let category = inquire::Select::new("Select a news category", choices)
        .with_starting_cursor(default)
        .prompt()?;
    Ok(category)
}

fn prompt_api_key() -> Result<String> {
    let key = inquire::Password::new("Enter your NewsAPI.org API key")
        .without_confirmation()
        .prompt()?;
    Ok(key)
}
