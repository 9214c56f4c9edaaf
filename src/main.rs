use anyhow::{Context, Result};
use job_feed::config::Config;
use job_feed::engine::CriteriaSet;
use job_feed::feed::http::HttpJobSource;
use job_feed::feed::types::JobPosting;
use job_feed::pipeline::{FeedCommand, FeedPipeline, FeedView};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

fn config_path() -> PathBuf {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("invalid logging filter")?;

    match &config.logging.file {
        Some(path) => {
            let log_file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(log_file)
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Translate one line of user input into a pipeline command.
fn parse_command(line: &str) -> Result<Option<FeedCommand>> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let cmd = match word {
        "" | "m" | "more" => Some(FeedCommand::LoadMore),
        "f" | "filter" => {
            let criteria: CriteriaSet = serde_json::from_str(rest.trim())
                .context("filter expects a JSON object, e.g. {\"companyName\":\"acme\"}")?;
            Some(FeedCommand::SetCriteria(criteria))
        }
        "c" | "clear" => Some(FeedCommand::SetCriteria(CriteriaSet::default())),
        "q" | "quit" | "exit" => Some(FeedCommand::Shutdown),
        _ => None,
    };
    Ok(cmd)
}

fn format_posting(index: usize, p: &JobPosting) -> String {
    let exp = p.min_exp.map(|e| format!("{}y+", e)).unwrap_or_else(|| "-".to_string());
    let salary = match (p.min_jd_salary, p.max_jd_salary) {
        (Some(min), Some(max)) => format!("{}-{}", min, max),
        (Some(min), None) => format!("{}+", min),
        (None, Some(max)) => format!("up to {}", max),
        (None, None) => "-".to_string(),
    };
    let currency = p.salary_currency_code.as_deref().unwrap_or("");
    format!(
        "{:>4}  {:<24} {:<14} {:<18} {:<10} {:>5}  {} {}",
        index + 1,
        p.company_name,
        p.job_role,
        p.location,
        p.tech_stack,
        exp,
        salary,
        currency,
    )
}

fn render(view: &FeedView) {
    println!();
    for (i, posting) in view.postings.iter().enumerate() {
        println!("{}", format_posting(i, posting));
    }
    if view.shows_no_results() {
        println!("  No jobs found matching the selected criteria.");
        println!("  Please try different filters.");
    }
    let time = view
        .updated_at
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
        .unwrap_or_default();
    println!(
        "  [{}] showing {} of {} loaded (next offset {}){}",
        time,
        view.postings.len(),
        view.accumulated,
        view.offset,
        if view.loading { "  loading..." } else { "" },
    );
    if let Some(err) = &view.last_error {
        println!("  last fetch failed: {}", err);
    }
    println!("  <enter> more | filter <json> | clear | quit");
}

async fn render_loop(mut view_rx: watch::Receiver<FeedView>) {
    while view_rx.changed().await.is_ok() {
        let view = view_rx.borrow_and_update().clone();
        render(&view);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = Config::load_or_default(&config_path())?;
    config.apply_env_overrides();
    init_logging(&config)?;

    println!();
    println!("  Job Feed v0.1.0");
    println!("  ===============");
    let source = HttpJobSource::new(&config.source.endpoint, config.source.request_timeout_ms)?;
    println!("  Source: {}", source.endpoint());

    let (pipeline, view_rx) = FeedPipeline::from_config(Arc::new(source), &config);
    let (cmd_tx, cmd_rx) = mpsc::channel::<FeedCommand>(16);

    let renderer = tokio::spawn(render_loop(view_rx));
    let engine = tokio::spawn(pipeline.run(cmd_rx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Some(cmd)) => {
                let quit = matches!(cmd, FeedCommand::Shutdown);
                if cmd_tx.send(cmd).await.is_err() || quit {
                    break;
                }
            }
            Ok(None) => println!("  unknown command: {}", line.trim()),
            Err(e) => println!("  {:#}", e),
        }
    }

    drop(cmd_tx);
    engine.await.context("feed pipeline task panicked")?;
    renderer.await.context("render task panicked")?;

    tracing::debug!("shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load_more() {
        assert!(matches!(parse_command("").unwrap(), Some(FeedCommand::LoadMore)));
        assert!(matches!(parse_command("more").unwrap(), Some(FeedCommand::LoadMore)));
    }

    #[test]
    fn test_parse_filter_json() {
        let cmd = parse_command(r#"filter {"companyName": "acme", "remote": ["remote"]}"#).unwrap();
        match cmd {
            Some(FeedCommand::SetCriteria(c)) => {
                assert_eq!(c.company_name.as_deref(), Some("acme"));
                assert_eq!(c.remote.len(), 1);
            }
            other => panic!("expected SetCriteria, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_clear_is_empty_criteria() {
        match parse_command("clear").unwrap() {
            Some(FeedCommand::SetCriteria(c)) => assert!(c.is_empty()),
            other => panic!("expected SetCriteria, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bad_filter_json() {
        assert!(parse_command("filter {not json").is_err());
    }

    #[test]
    fn test_parse_unknown() {
        assert!(parse_command("jump").unwrap().is_none());
    }

    #[test]
    fn test_format_posting_missing_numbers() {
        let p = JobPosting::new("Acme", "remote", "rust", "backend");
        let line = format_posting(0, &p);
        assert!(line.contains("Acme"));
        assert!(line.trim_start().starts_with('1'));
    }
}
