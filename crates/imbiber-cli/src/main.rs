/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! imbiber CLI - Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use imbiber::{Bibliography, CitationRenderer, Error, Locale, NormalizedEntry};
use imbiber_bibtex::{CasePolicy, NameFormat};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod diagnostics;

use config::{Config, Settings};

#[derive(Parser, Debug)]
#[command(name = "imbiber")]
#[command(version)]
#[command(about = "Render BibTeX-style bibliographies as HTML citations", long_about = None)]
struct Cli {
    /// Bibliography files, read in order (the first definition of a key wins)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Render only this key (repeatable)
    #[arg(short = 'k', long = "key")]
    keys: Vec<String>,

    /// Language for connective words and month names (e.g. en, es)
    #[arg(short = 'l', long)]
    locale: Option<String>,

    /// Name order (given-family, family-given)
    #[arg(long)]
    name_format: Option<NameFormat>,

    /// Capitalization of titles (unchanged, sentence, title)
    #[arg(long)]
    title_case: Option<CasePolicy>,

    /// Print normalized entries as JSON instead of HTML
    #[arg(long)]
    json: bool,

    /// YAML file with default settings
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let flags = Config {
            locale: self.locale.clone(),
            name_format: self.name_format,
            title_case: self.title_case,
        };
        let file = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        Ok(flags.or(file).resolve())
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("imbiber={0},imbiber_bibtex={0},imbiber_cli={0}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli)
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let settings = cli.settings()?;
    tracing::debug!(?settings, "Resolved settings");

    let mut bibliography = Bibliography::new(settings.normalize);
    for path in &cli.files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        match bibliography.read_str(&text) {
            Ok(added) => {
                tracing::info!(path = %path.display(), added, "Read bibliography");
            }
            Err(Error::Parse { source, .. }) => {
                let color = std::io::stderr().is_terminal();
                let excerpt = diagnostics::render_parse_error(
                    &path.display().to_string(),
                    &text,
                    &source,
                    color,
                );
                eprint!("{}", excerpt);
                return Ok(ExitCode::FAILURE);
            }
            Err(err) => return Err(err.into()),
        }
    }

    let entries = select_entries(&bibliography, &cli.keys)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.json {
        serde_json::to_writer_pretty(&mut out, &entries).context("Failed to write JSON")?;
        writeln!(out)?;
        return Ok(ExitCode::SUCCESS);
    }

    let locale = Locale::load(&settings.locale)?;
    let renderer = CitationRenderer::new(locale, settings.name_format);
    for entry in entries {
        let html = renderer.render(entry);
        if html.is_empty() && cli.keys.is_empty() {
            continue;
        }
        writeln!(out, "{}", html.trim_end())?;
    }
    Ok(ExitCode::SUCCESS)
}

/// The requested entries, or every entry when no key was given.
fn select_entries<'a>(
    bibliography: &'a Bibliography,
    keys: &[String],
) -> Result<Vec<&'a NormalizedEntry>> {
    if keys.is_empty() {
        return Ok(bibliography.entries().collect());
    }
    keys.iter()
        .map(|key| {
            bibliography.get(key).ok_or_else(|| {
                anyhow::Error::new(Error::EntryNotFound { key: key.clone() })
            })
        })
        .collect()
}
