//! `sentinel`: check KDP book metadata before publishing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sentinel_core::{validate, BookRecord, Manuscript};
use sentinel_runtime::{AnalysisRunner, RuntimeConfig, SessionReport};

mod render;

use render::FormOptions;

/// Characters of extracted text shown without `--full`.
const EXTRACT_PREVIEW_CHARS: usize = 2000;

#[derive(Parser, Debug)]
#[command(name = "sentinel", version, about = "Check KDP book metadata before you publish")]
struct Cli {
    #[arg(long, short, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[arg(long, global = true, env = "SENTINEL_MODEL", help = "Model used for AI checks")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a record file (.json, .yaml or .yml)
    Validate {
        record: PathBuf,

        /// Manuscript for the AI manuscript checks
        #[arg(long)]
        manuscript: Option<PathBuf>,

        /// Rule checks only, no AI review
        #[arg(long)]
        offline: bool,

        /// Runtime config (YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Exit with status 2 when the report has errors
        #[arg(long)]
        strict: bool,
    },

    /// Suggest metadata from a manuscript and write the updated record
    Autofill {
        #[arg(long)]
        manuscript: PathBuf,

        /// Record to update; an empty record when omitted
        #[arg(long)]
        record: Option<PathBuf>,

        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the text extracted from a manuscript
    Extract {
        file: PathBuf,

        /// Print all of it instead of the opening
        #[arg(long)]
        full: bool,
    },

    /// Write an empty record to fill in
    Template {
        /// Output file (.json, .yaml or .yml); stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List the choices offered by the KDP setup forms
    Options {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return ExitCode::from(1);
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let model = cli.model.as_deref();

    match cli.command {
        Commands::Validate {
            record,
            manuscript,
            offline,
            config,
            format,
            strict,
        } => {
            let book = load_record(&record)?;
            let manuscript = manuscript.as_deref().map(load_manuscript).transpose()?;
            let validation = validate(&book);

            let ai = if offline {
                None
            } else {
                let config = load_config(config.as_deref(), model)?;
                match AnalysisRunner::from_config(config) {
                    Ok(runner) => Some(runner.run(&book, manuscript.as_ref()).await),
                    Err(e) => {
                        tracing::debug!(error = ?e, "AI runner unavailable");
                        eprintln!("AI review skipped: {}", e);
                        None
                    }
                }
            };

            let session = SessionReport::new(validation, ai);
            match format {
                OutputFormat::Text => print!("{}", render::session_text(&session, &book)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&session)?),
            }

            if strict && session.validation.has_errors() {
                return Ok(ExitCode::from(2));
            }
        }

        Commands::Autofill {
            manuscript,
            record,
            out,
            config,
        } => {
            let manuscript = load_manuscript(&manuscript)?;
            let mut book = match &record {
                Some(path) => load_record(path)?,
                None => BookRecord::default(),
            };

            let config = load_config(config.as_deref(), model)?;
            let runner = AnalysisRunner::from_config(config).context("AI auto-fill is not available")?;
            let suggestions = runner
                .autofill(&manuscript.text)
                .await
                .context("Auto-fill failed")?;

            let applied = describe_applied(suggestions.apply_to(&mut book));
            tracing::info!(fields = %applied, "auto-fill applied");
            eprintln!("Applied: {}", applied);
            write_record(&book, out.as_deref())?;
        }

        Commands::Extract { file, full } => {
            let manuscript = load_manuscript(&file)?;
            eprintln!("{}: {} characters", manuscript.name, manuscript.char_len());
            let text = if full {
                manuscript.text.as_str()
            } else {
                manuscript.excerpt(EXTRACT_PREVIEW_CHARS)
            };
            println!("{}", text);
        }

        Commands::Template { out } => {
            write_record(&BookRecord::default(), out.as_deref())?;
        }

        Commands::Options { format } => {
            let options = FormOptions::collect();
            match format {
                OutputFormat::Text => print!("{}", options.to_text()),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_record(path: &Path) -> Result<BookRecord> {
    let record =
        BookRecord::from_path(path).with_context(|| format!("Failed to load record '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), format = %record.book_format, "record loaded");
    Ok(record)
}

fn load_manuscript(path: &Path) -> Result<Manuscript> {
    let manuscript = Manuscript::from_path(path)
        .with_context(|| format!("Failed to read manuscript '{}'", path.display()))?;
    for note in &manuscript.notes {
        eprintln!("Note: {}", note);
    }
    Ok(manuscript)
}

fn load_config(path: Option<&Path>, model: Option<&str>) -> Result<RuntimeConfig> {
    let config = match path {
        Some(path) => RuntimeConfig::from_path(path)?,
        None => RuntimeConfig::default(),
    };
    Ok(config.with_model(model))
}

/// Serialize as YAML for .yaml/.yml outputs, JSON otherwise.
fn write_record(record: &BookRecord, out: Option<&Path>) -> Result<()> {
    let is_yaml = out
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let contents = if is_yaml {
        serde_yaml::to_string(record)?
    } else {
        record.to_json_pretty()?
    };

    match out {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("Failed to write '{}'", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", contents),
    }
    Ok(())
}

fn describe_applied(applied: Vec<&'static str>) -> String {
    if applied.is_empty() {
        "nothing (no usable suggestions)".to_string()
    } else {
        applied.join(", ")
    }
}
