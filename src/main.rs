use std::path::PathBuf;

use clap::Parser;
use twb_audit::audit::{self, ReportOptions};
use twb_audit::{AuditError, Result};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;

    let basename = match cli.name {
        Some(name) => name,
        None => cli
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workbook".to_string()),
    };

    let options = ReportOptions {
        input: cli.input,
        output_dir: cli.out_dir,
        basename,
        background: cli.background,
        keep_dot: cli.keep_dot,
    };

    let paths = audit::document_workbook(&options)?;
    println!(
        "Workbook documentation written to {} and {}",
        paths.workbook.display(),
        paths.diagram.display()
    );
    Ok(())
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| AuditError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Document the calculated fields and parameters of a Tableau workbook."
)]
struct Cli {
    /// Path to the workbook definition (.twb) to document.
    input: PathBuf,

    /// Directory the report artifacts are written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Base name for the generated files; defaults to the input file stem.
    #[arg(long)]
    name: Option<String>,

    /// Background colour of the dependency diagram.
    #[arg(long, default_value = "#FFFFFF")]
    background: String,

    /// Keep the intermediate Graphviz source next to the rendered diagram.
    #[arg(long)]
    keep_dot: bool,
}
