//! Office-to-PDF conversion through LibreOffice.
//!
//! The tool runs headless as a blocking subprocess writing into a
//! caller-provided scratch directory. Tool not installed, tool exited
//! non-zero, and expected output missing map to separate error variants so
//! callers can tell an environment problem from a malformed input.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{PipelineError, Result};

const CONVERSION_TOOL: &str = "libreoffice";

/// Convert an office document to PDF inside `scratch_dir`.
///
/// Returns the path of the produced PDF (inside `scratch_dir`; the caller
/// owns the scratch directory's lifetime).
pub(crate) fn convert_to_pdf(input: &Path, scratch_dir: &Path) -> Result<PathBuf> {
    let binary = which::which(CONVERSION_TOOL)
        .or_else(|_| which::which("soffice"))
        .map_err(|_| PipelineError::ConversionToolMissing {
            tool: CONVERSION_TOOL,
        })?;

    debug!(tool = %binary.display(), input = %input.display(), "running office conversion");

    let output = Command::new(&binary)
        .args(["--headless", "--convert-to", "pdf:writer_pdf_Export", "--outdir"])
        .arg(scratch_dir)
        .arg(input)
        .output()?;

    if !output.status.success() {
        return Err(PipelineError::ConversionToolFailed {
            tool: CONVERSION_TOOL,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    // LibreOffice names the output after the input file's stem.
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let expected = scratch_dir.join(format!("{stem}.pdf"));

    if !expected.exists() {
        return Err(PipelineError::ConversionOutputMissing(expected));
    }

    Ok(expected)
}
