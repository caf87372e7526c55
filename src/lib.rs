//! Remo: annotation records for an image/annotation management service.
//!
//! Remo models one labeling record per image (class labels plus an optional
//! bounding box or polygon), enforces the shape invariants the service
//! relies on, and reads and writes batches of such records.
//!
//! # Modules
//!
//! - [`annotation`]: The annotation model (Annotation, BoundingBox, Segment, Task) and its JSON/CSV forms
//! - [`validation`]: Batch validation and error reporting
//! - [`inspect`]: Batch statistics
//! - [`error`]: Error types for remo operations

pub mod annotation;
pub mod error;
pub mod inspect;
pub mod validation;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use annotation::{Annotation, Task};
pub use error::{AnnotationError, RemoError};

/// The remo CLI application.
#[derive(Parser)]
#[command(name = "remo")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log filter directive (e.g. 'debug' or 'remo=trace').
    #[arg(long, global = true, env = "REMO_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate an annotation file for errors and warnings.
    Validate(ValidateArgs),
    /// Convert an annotation file between formats.
    Convert(ConvertArgs),
    /// Show statistics for an annotation file.
    Inspect(InspectArgs),
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Input file to validate.
    input: PathBuf,

    /// Input format ('json' or 'csv').
    #[arg(long, default_value = "json")]
    format: String,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Input file.
    input: PathBuf,

    /// Output file.
    output: PathBuf,

    /// Input format ('json' or 'csv').
    #[arg(long, default_value = "json")]
    from: String,

    /// Output format ('json' or 'csv').
    #[arg(long, default_value = "json")]
    to: String,

    /// Keep only records of this task.
    #[arg(long)]
    task: Option<String>,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Input file to inspect.
    input: PathBuf,

    /// Input format ('json' or 'csv').
    #[arg(long, default_value = "json")]
    format: String,

    /// Number of labels to show in the histogram.
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Annotation file formats understood by the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AnnotationFormat {
    Json,
    Csv,
}

impl AnnotationFormat {
    fn parse(name: &str) -> Result<Self, RemoError> {
        match name {
            "json" | "remo-json" => Ok(AnnotationFormat::Json),
            "csv" | "remo-csv" => Ok(AnnotationFormat::Csv),
            other => Err(RemoError::UnsupportedFormat(format!(
                "'{}' (supported: json, csv)",
                other
            ))),
        }
    }

    fn read(self, path: &Path) -> Result<Vec<Annotation>, RemoError> {
        match self {
            AnnotationFormat::Json => annotation::io_json::read_annotations_json(path),
            AnnotationFormat::Csv => annotation::io_csv::read_annotations_csv(path),
        }
    }

    fn write(self, path: &Path, annotations: &[Annotation]) -> Result<(), RemoError> {
        match self {
            AnnotationFormat::Json => annotation::io_json::write_annotations_json(path, annotations),
            AnnotationFormat::Csv => annotation::io_csv::write_annotations_csv(path, annotations),
        }
    }
}

/// Run the remo CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), RemoError> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("remo {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Annotation records for the remo image management service.");
            println!();
            println!("Run 'remo --help' for usage information.");
            Ok(())
        }
    }
}

/// Installs a stderr `fmt` subscriber filtered by `directive`.
///
/// Falls back to `warn` when the directive does not parse. Does nothing if
/// a global subscriber is already set.
fn init_logging(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), RemoError> {
    let format = AnnotationFormat::parse(&args.format)?;
    let annotations = format.read(&args.input)?;
    tracing::info!(input = %args.input.display(), count = annotations.len(), "validating");

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_annotations(&annotations, &opts);

    match args.output.as_str() {
        "json" => {
            let json = report
                .to_json_string()
                .map_err(|source| RemoError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
            println!("{}", json);
        }
        _ => print!("{}", report),
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(RemoError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), RemoError> {
    let from = AnnotationFormat::parse(&args.from)?;
    let to = AnnotationFormat::parse(&args.to)?;
    let task = args
        .task
        .as_deref()
        .map(str::parse::<Task>)
        .transpose()?;

    let mut annotations = from.read(&args.input)?;
    let total = annotations.len();
    if let Some(task) = task {
        annotations.retain(|ann| ann.task() == task);
    }

    to.write(&args.output, &annotations)?;
    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        read = total,
        written = annotations.len(),
        "converted"
    );

    println!(
        "Converted {} of {} annotation(s): {} -> {}",
        annotations.len(),
        total,
        args.input.display(),
        args.output.display()
    );
    Ok(())
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), RemoError> {
    let format = AnnotationFormat::parse(&args.format)?;
    let annotations = format.read(&args.input)?;
    tracing::info!(input = %args.input.display(), count = annotations.len(), "inspecting");

    let opts = inspect::InspectOptions {
        top_labels: args.top,
        ..Default::default()
    };
    let report = inspect::inspect_annotations(&annotations, &opts);

    match args.output.as_str() {
        "json" => {
            let json =
                serde_json::to_string_pretty(&report).map_err(|source| RemoError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
            println!("{}", json);
        }
        _ => print!("{}", report),
    }

    Ok(())
}
