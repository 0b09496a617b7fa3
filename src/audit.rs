use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::catalog::FieldCatalog;
use crate::error::{AuditError, Result};
use crate::extract;
use crate::graph::DependencyGraph;
use crate::io::{excel_write, graphviz, twb_read};
use crate::model::{Datasource, WorkbookReport};

/// Configuration for a single documentation run.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Workbook definition to document.
    pub input: PathBuf,
    /// Directory the artifacts are written into. Must already exist.
    pub output_dir: PathBuf,
    /// Base name shared by the generated files.
    pub basename: String,
    /// Diagram background colour as a hex string.
    pub background: String,
    /// Keep the intermediate Graphviz source beside the rendered diagram.
    pub keep_dot: bool,
}

/// Paths of the artifacts produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub diagram: PathBuf,
    pub workbook: PathBuf,
    pub dot: Option<PathBuf>,
}

/// Documents a workbook definition: extracts calculated fields and
/// parameters, builds the dependency graph, renders the diagram, and writes
/// the report workbook into the output directory.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %options.input.display(), output = %options.output_dir.display())
)]
pub fn document_workbook(options: &ReportOptions) -> Result<ReportPaths> {
    if !options.input.exists() {
        return Err(AuditError::MissingInput(options.input.clone()));
    }
    if !options.output_dir.is_dir() {
        return Err(AuditError::MissingOutputDir(options.output_dir.clone()));
    }

    let datasources = twb_read::read_datasources(&options.input)?;
    info!(datasource_count = datasources.len(), "parsed workbook definition");

    let (report, dependencies) = extract_report(datasources)?;
    info!(
        field_count = report.fields.len(),
        parameter_count = report.parameters.len(),
        edge_count = dependencies.edge_count(),
        "extracted records"
    );

    write_artifacts(options, &report, &dependencies)
}

/// Runs the extraction pipeline over parsed datasources: catalog first, then
/// resolution, then the dependency graph over the resolved records.
pub fn extract_report(
    datasources: Vec<Datasource>,
) -> Result<(WorkbookReport, DependencyGraph)> {
    let catalog = FieldCatalog::from_datasources(&datasources);
    debug!(catalog_size = catalog.len(), "field catalog built");

    let fields = extract::calculated_fields(&datasources, &catalog);
    let parameters = extract::parameters(&datasources)?;
    let dependencies = DependencyGraph::build(&fields, &catalog);

    let report = WorkbookReport {
        fields,
        parameters,
        datasources,
    };
    Ok((report, dependencies))
}

/// Stages every artifact under a temporary name and renames the set into
/// place only after all writes have succeeded, so a failed run leaves no
/// partial report behind.
#[instrument(level = "debug", skip_all, fields(basename = %options.basename))]
fn write_artifacts(
    options: &ReportOptions,
    report: &WorkbookReport,
    dependencies: &DependencyGraph,
) -> Result<ReportPaths> {
    let artifact = |extension: &str| {
        options
            .output_dir
            .join(format!("{}.{extension}", options.basename))
    };
    let paths = ReportPaths {
        diagram: artifact("png"),
        workbook: artifact("xlsx"),
        dot: options.keep_dot.then(|| artifact("dot")),
    };

    let dot_source = dependencies.to_dot(&options.background);
    if let Err(error) = stage_artifacts(&paths, report, &dot_source) {
        discard_staged(&paths);
        return Err(error);
    }

    fs::rename(staged(&paths.diagram), &paths.diagram)?;
    fs::rename(staged(&paths.workbook), &paths.workbook)?;
    if let Some(dot_path) = &paths.dot {
        fs::rename(staged(dot_path), dot_path)?;
    }

    debug!(diagram = %paths.diagram.display(), workbook = %paths.workbook.display(), "artifacts written");
    Ok(paths)
}

fn stage_artifacts(paths: &ReportPaths, report: &WorkbookReport, dot_source: &str) -> Result<()> {
    graphviz::render_png(dot_source, &staged(&paths.diagram))?;
    excel_write::write_report(&staged(&paths.workbook), report)?;
    if let Some(dot_path) = &paths.dot {
        fs::write(staged(dot_path), dot_source)?;
    }
    Ok(())
}

fn discard_staged(paths: &ReportPaths) {
    let _ = fs::remove_file(staged(&paths.diagram));
    let _ = fs::remove_file(staged(&paths.workbook));
    if let Some(dot_path) = &paths.dot {
        let _ = fs::remove_file(staged(dot_path));
    }
}

fn staged(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}
