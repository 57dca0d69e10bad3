use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use strum::{AsRefStr, Display};

use crate::edgar::parsing::types::CleaningResult;

/// Suffix appended to the input file stem.
pub const CLEANED_SUFFIX: &str = "_cleaned";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Txt,
    Json,
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create output directory {}", path.display()))?;
    Ok(())
}

/// `<output_dir>/<input stem>_cleaned.<txt|json>`
pub fn output_path(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    output_dir.join(format!("{}{}.{}", stem, CLEANED_SUFFIX, format))
}

/// Writes the rendered text (or the JSON form) of `result` next to the other
/// outputs and returns the path written.
pub fn write_result(
    output_dir: &Path,
    input: &Path,
    result: &CleaningResult,
    format: OutputFormat,
) -> Result<PathBuf> {
    ensure_dir(output_dir)?;
    let path = output_path(output_dir, input, format);
    let body = match format {
        OutputFormat::Txt => result.render(),
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
    };
    fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
