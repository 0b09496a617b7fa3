use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{AuditError, Result};

/// Renders DOT source to a PNG file by piping it through the Graphviz `dot`
/// executable.
///
/// A missing executable maps to [`AuditError::GraphvizMissing`]; an
/// unsuccessful exit maps to [`AuditError::Render`] carrying whatever `dot`
/// printed to stderr.
pub fn render_png(dot_source: &str, output: &Path) -> Result<()> {
    let mut child = Command::new("dot")
        .arg("-Tpng")
        .arg("-o")
        .arg(output)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|error| match error.kind() {
            std::io::ErrorKind::NotFound => AuditError::GraphvizMissing,
            _ => AuditError::Io(error),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(dot_source.as_bytes())?;
    }

    let finished = child.wait_with_output()?;
    if !finished.status.success() {
        let stderr = String::from_utf8_lossy(&finished.stderr).trim().to_string();
        return Err(AuditError::Render(stderr));
    }
    Ok(())
}
