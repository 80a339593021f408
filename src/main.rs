//! Interactive entry point: build the retriever, then answer queries from
//! stdin until end-of-input.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use colored::Colorize;
use morphology::BarProgress;
use quote_retriever::{ChatSession, Granularity, Retriever, RetrieverConfig, SelectionMode};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file, when one exists.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = config_from_env()?;
    let mut progress = BarProgress::new();
    let retriever =
        Retriever::bootstrap(cfg, &mut progress).context("failed to initialize the retriever")?;

    tracing::info!("starting interactive session, end input to quit");
    serve(&retriever)
}

/// Blocking read loop: one query line in, one response line out.
///
/// End-of-input terminates the session cleanly.
fn serve(retriever: &Retriever) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut session = ChatSession::new();
    let mut rng = rand::thread_rng();

    loop {
        write!(stdout, "{} ", ">".green().bold())?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        let response = retriever.respond(&mut session, query, &mut rng);
        writeln!(stdout, "{}\n", response.text)?;
    }

    Ok(())
}

/// Assembles the retriever config from environment variables.
fn config_from_env() -> anyhow::Result<RetrieverConfig> {
    let dictionary = must_env("RIPOSTE_DICTIONARY")?;
    let corpus = must_env("RIPOSTE_CORPUS")?;

    let mut cfg = RetrieverConfig::new_default(dictionary, corpus);
    if let Some(path) = opt_env("RIPOSTE_STOPWORDS") {
        cfg.stopwords_path = Some(PathBuf::from(path));
    }
    if let Some(dir) = opt_env("RIPOSTE_CACHE_DIR") {
        cfg.cache_dir = PathBuf::from(dir);
    }
    if let Some(text) = opt_env("RIPOSTE_DEFAULT_RESPONSE") {
        cfg.default_response = text;
    }
    if let Some(mode) = opt_env("RIPOSTE_SELECTION") {
        cfg.selection = SelectionMode::parse(&mode)
            .ok_or_else(|| anyhow!("RIPOSTE_SELECTION: expected `randomized` or `best`"))?;
    }
    if let Some(granularity) = opt_env("RIPOSTE_GRANULARITY") {
        cfg.granularity = Granularity::parse(&granularity)
            .ok_or_else(|| anyhow!("RIPOSTE_GRANULARITY: expected `dialogue` or `line`"))?;
    }
    if let Some(flag) = opt_env("RIPOSTE_FILTER_RARE") {
        cfg.filter_rare = env_bool("RIPOSTE_FILTER_RARE", &flag)?;
    }
    if let Some(flag) = opt_env("RIPOSTE_CHOOSE_ANSWER") {
        cfg.choose_answer = env_bool("RIPOSTE_CHOOSE_ANSWER", &flag)?;
    }
    Ok(cfg)
}

/// Fetches a required, non-empty environment variable.
fn must_env(name: &'static str) -> anyhow::Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(anyhow!("missing required environment variable: {name}")),
    }
}

/// Fetches an optional environment variable (`None` if unset or empty).
fn opt_env(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_bool(name: &'static str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("{name}: expected a boolean, got `{value}`")),
    }
}
