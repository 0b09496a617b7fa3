use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, AuditError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests a workbook definition or emits the report artifacts.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the workbook definition is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the output directory does not exist.
    #[error("output directory not found: {0}")]
    MissingOutputDir(PathBuf),

    /// Raised when a parameter column omits an attribute the report needs.
    #[error("parameter column '{column}' is missing required attribute '{attribute}'")]
    MissingAttribute { column: String, attribute: String },

    /// Raised when the Graphviz `dot` executable cannot be found.
    #[error("the Graphviz 'dot' executable was not found on PATH")]
    GraphvizMissing,

    /// Raised when Graphviz exits unsuccessfully while rendering the diagram.
    #[error("diagram rendering failed: {0}")]
    Render(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
