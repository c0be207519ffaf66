//! CLI entrypoint for ror-harvest
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use ror_application::{
    BatchProgressNotifier, HarvestError, HarvestSession, NoProgress, RunBatchError,
    RunBatchUseCase, SAMPLE_TEXT,
};
use ror_domain::{ExportKind, ExportLayout, OutputFormat};
use ror_infrastructure::{
    ConfigLoader, FileConfig, LocalArtifactSink, RorApiClient, SystemClipboard,
};
use ror_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::io::{IsTerminal, Read};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = load_config(&cli)?;
    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting ror-harvest");

    let text = read_input(&cli)?;
    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    let layout = if cli.extended {
        ExportLayout::Extended
    } else {
        config.output.layout()
    };

    let mut session = HarvestSession::new();

    // === Extraction ===
    let set = match session.extract(&text) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("{}", ConsoleFormatter::error(&e.to_string()));
            return Ok(());
        }
    };
    if !cli.quiet {
        eprintln!("{}", ConsoleFormatter::success(&ConsoleFormatter::extraction_message(set)));
    }

    if cli.copy {
        match session.copy_ids(&SystemClipboard::detect()) {
            Ok(_) => eprintln!("{}", ConsoleFormatter::success("IDs copied to clipboard!")),
            Err(e) => eprintln!("{}", ConsoleFormatter::error(&e.to_string())),
        }
    }

    // === Lookups ===
    let fetch = !cli.extract_only && format.needs_records();
    if fetch {
        let mut settings = config.registry_settings();
        if let Some(base_url) = &cli.base_url {
            settings = settings.with_base_url(base_url.clone());
        }
        let gateway = Arc::new(RorApiClient::new(settings)?);

        let token = CancellationToken::new();
        let ctrl_c = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctrl_c.cancel();
            }
        });

        let use_case = RunBatchUseCase::new(gateway)
            .with_policy(config.fetch_policy())
            .with_cancellation(token);

        let progress: Box<dyn BatchProgressNotifier> = if cli.quiet {
            Box::new(NoProgress)
        } else if std::io::stderr().is_terminal() {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        };

        match session.fetch(&use_case, progress.as_ref()).await {
            Ok(result) => {
                if !cli.quiet {
                    eprintln!(
                        "{}",
                        ConsoleFormatter::success(&ConsoleFormatter::summary_message(
                            &result.summary
                        ))
                    );
                }
            }
            Err(HarvestError::Batch(RunBatchError::Cancelled)) => {
                return Err(anyhow!("Cancelled; no results were written"));
            }
            Err(e) => return Err(e.into()),
        }
    }

    // === Output ===
    render(&session, format, layout, fetch)?;

    if cli.save {
        let directory = cli
            .out_dir
            .clone()
            .or_else(|| config.output.directory.clone());
        let sink = match directory {
            Some(dir) => LocalArtifactSink::new(dir),
            None => LocalArtifactSink::current_dir(),
        };
        let kinds: &[ExportKind] = if fetch {
            &[ExportKind::Ids, ExportKind::Json, ExportKind::Csv]
        } else {
            &[ExportKind::Ids]
        };
        for kind in kinds {
            match session.save(*kind, layout, &sink) {
                Ok(location) => {
                    eprintln!("{}", ConsoleFormatter::success(&format!("Saved {}", location)))
                }
                Err(e) => eprintln!("{}", ConsoleFormatter::error(&e.to_string())),
            }
        }
    }

    Ok(())
}

/// Resolve configuration from files or defaults
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate()?;
    debug!("Configuration: {:?}", config);
    Ok(config)
}

/// Text to scan, from `--sample`, `--text`, a file or stdin
fn read_input(cli: &Cli) -> Result<String> {
    if cli.sample {
        return Ok(SAMPLE_TEXT.to_string());
    }
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    if cli.reads_stdin() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    match &cli.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => Ok(String::new()),
    }
}

/// Write the requested format to stdout
fn render(
    session: &HarvestSession,
    format: OutputFormat,
    layout: ExportLayout,
    fetched: bool,
) -> Result<()> {
    let Some(set) = session.extracted() else {
        return Ok(());
    };

    match format {
        OutputFormat::Ids => println!("{}", set.to_text()),
        OutputFormat::Table => {
            print!("{}", ConsoleFormatter::format_ids(set));
            if fetched {
                print!("{}", ConsoleFormatter::format_table(session.records()));
            }
        }
        OutputFormat::Json | OutputFormat::Csv if !fetched => {
            // extract-only: nothing but identifiers to show
            println!("{}", set.to_text());
        }
        OutputFormat::Json => {
            println!("{}", session.export(ExportKind::Json, layout)?.contents);
        }
        OutputFormat::Csv => {
            print!("{}", session.export(ExportKind::Csv, layout)?.contents);
        }
    }
    Ok(())
}
