//! Mudra CLI - Command-line interface for Synheart Mudra
//!
//! Commands:
//! - run: Process streaming frames from stdin (streaming mode)
//! - replay: Process a recorded session file (batch mode)
//! - validate: Validate frame record envelopes
//! - catalogue: Print zone and mudra display data
//! - config: Print the default session configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use synheart_mudra::encoder::FramePayload;
use synheart_mudra::gesture::GestureClassifier;
use synheart_mudra::schema::{FrameAdapter, FrameRecord, SCHEMA_VERSION};
use synheart_mudra::{Catalogue, ComputeError, MudraSession, SessionConfig, MUDRA_VERSION};

/// Mudra - On-device engine for gesture-guided meditation feedback
#[derive(Parser)]
#[command(name = "mudra")]
#[command(author = "Synheart AI Inc")]
#[command(version = MUDRA_VERSION)]
#[command(about = "Turn body landmark frames into meditation feedback state", long_about = None)]
struct Cli {
    /// Log pipeline activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process streaming frames from stdin (streaming mode)
    Run {
        /// Session configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the session summary to this file on exit
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Flush output after each frame
        #[arg(long, default_value = "true")]
        flush: bool,
    },

    /// Process a recorded session file (batch mode)
    Replay {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Session configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the session summary to this file
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Validate frame record envelopes
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print zone and mudra display data as JSON
    Catalogue {
        /// Session configuration file (JSON), decides which mudras are detectable
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the default session configuration as JSON
    Config,
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one frame per line)
    Ndjson,
    /// JSON array of frames
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one state record per line)
    Ndjson,
    /// JSON array of state records
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `--verbose` wins over `RUST_LOG`, which wins over the `warn` default
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), MudraCliError> {
    match cli.command {
        Commands::Run {
            config,
            summary,
            flush,
        } => cmd_run(config.as_deref(), summary.as_deref(), flush),

        Commands::Replay {
            input,
            output,
            input_format,
            output_format,
            config,
            summary,
        } => cmd_replay(
            &input,
            &output,
            input_format,
            output_format,
            config.as_deref(),
            summary.as_deref(),
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Catalogue { config } => cmd_catalogue(config.as_deref()),

        Commands::Config => {
            println!("{}", SessionConfig::default().to_json()?);
            Ok(())
        }
    }
}

fn cmd_run(
    config: Option<&Path>,
    summary: Option<&Path>,
    flush: bool,
) -> Result<(), MudraCliError> {
    let mut session = MudraSession::with_config(load_config(config)?)?;

    if atty::is(atty::Stream::Stdin) {
        eprintln!("Reading {} frames from stdin, one per line (Ctrl-D to finish)", SCHEMA_VERSION);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut skipped = 0usize;

    for (line_num, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match session.process_json(trimmed) {
            Ok(payload) => {
                writeln!(stdout, "{}", payload)?;
                if flush {
                    stdout.flush()?;
                }
            }
            Err(e) => {
                skipped += 1;
                warn!(line = line_num + 1, error = %e, "skipping malformed frame");
            }
        }
    }
    stdout.flush()?;

    debug!(
        frames = session.frames_processed(),
        skipped, "stream finished"
    );

    if let Some(summary_path) = summary {
        fs::write(summary_path, serde_json::to_string_pretty(&session.summary())?)?;
    }

    Ok(())
}

fn cmd_replay(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: Option<&Path>,
    summary: Option<&Path>,
) -> Result<(), MudraCliError> {
    let records = read_records(input, &input_format)?;
    if records.is_empty() {
        return Err(MudraCliError::NoFrames);
    }

    let mut session = MudraSession::with_config(load_config(config)?)?;

    let mut payloads: Vec<FramePayload> = Vec::with_capacity(records.len());
    for record in &records {
        let state = session.process_record(record)?;
        payloads.push(session.encoder().encode(&state, record.frame_id.as_deref()));
    }

    if let Some(summary_path) = summary {
        fs::write(summary_path, serde_json::to_string_pretty(&session.summary())?)?;
    }

    let output_data = format_output(&payloads, &output_format)?;
    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), MudraCliError> {
    let records = read_records(input, &input_format)?;

    let results = FrameAdapter::validate_records(&records);
    let report = ValidationReport {
        total_frames: records.len(),
        valid_frames: records.len() - results.len(),
        invalid_frames: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                frame_id: r.frame_id.clone(),
                error: r.result.as_ref().map(|e| e.to_string()).unwrap_or_default(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total frames:   {}", report.total_frames);
        println!("Valid frames:   {}", report.valid_frames);
        println!("Invalid frames: {}", report.invalid_frames);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Frame {} (index {}): {}",
                    err.frame_id.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_frames > 0 {
        Err(MudraCliError::ValidationFailed(report.invalid_frames))
    } else {
        Ok(())
    }
}

fn cmd_catalogue(config: Option<&Path>) -> Result<(), MudraCliError> {
    let config = load_config(config)?;
    let catalogue = Catalogue::new(&GestureClassifier::new(config.gesture));
    println!("{}", catalogue.to_json()?);
    Ok(())
}

// Helper functions

fn load_config(path: Option<&Path>) -> Result<SessionConfig, MudraCliError> {
    match path {
        Some(path) => Ok(SessionConfig::from_json(&fs::read_to_string(path)?)?),
        None => Ok(SessionConfig::default()),
    }
}

fn read_records(input: &Path, format: &InputFormat) -> Result<Vec<FrameRecord>, MudraCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            eprintln!("Reading frames from stdin (Ctrl-D to finish)");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let records = match format {
        InputFormat::Ndjson => FrameAdapter::parse_ndjson(&input_data)?,
        InputFormat::Json => FrameAdapter::parse_array(&input_data)?,
    };
    Ok(records)
}

fn format_output(payloads: &[FramePayload], format: &OutputFormat) -> Result<String, MudraCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::with_capacity(payloads.len());
            for payload in payloads {
                lines.push(serde_json::to_string(payload)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(payloads)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(payloads)?),
    }
}

// Error types

#[derive(Debug)]
enum MudraCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    NoFrames,
    ValidationFailed(usize),
}

impl From<io::Error> for MudraCliError {
    fn from(e: io::Error) -> Self {
        MudraCliError::Io(e)
    }
}

impl From<ComputeError> for MudraCliError {
    fn from(e: ComputeError) -> Self {
        MudraCliError::Compute(e)
    }
}

impl From<serde_json::Error> for MudraCliError {
    fn from(e: serde_json::Error) -> Self {
        MudraCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<MudraCliError> for CliError {
    fn from(e: MudraCliError) -> Self {
        match e {
            MudraCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            MudraCliError::Compute(e @ ComputeError::InvalidConfig(_)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'mudra config' to see the expected layout".to_string()),
            },
            MudraCliError::Compute(e @ ComputeError::InvalidFrame(_)) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'mudra validate' for details".to_string()),
            },
            MudraCliError::Compute(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some(format!("Ensure input matches {} schema", SCHEMA_VERSION)),
            },
            MudraCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            MudraCliError::NoFrames => CliError {
                code: "NO_FRAMES".to_string(),
                message: "No frames found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            MudraCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} frames failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_frames: usize,
    valid_frames: usize,
    invalid_frames: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    frame_id: Option<String>,
    error: String,
}
