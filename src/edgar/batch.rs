//! Cleans many filings concurrently. Each document is read, cleaned and
//! written on its own; a failure is reported for that document only.

use anyhow::{anyhow, Context, Result};
use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

use crate::core::config::CleanerConfig;
use crate::edgar::parsing::Cleaner;
use crate::utils::dirs::{ensure_dir, write_result, OutputFormat};
use crate::utils::encoding::read_document;
use crate::utils::progress::BatchProgress;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub encodings: Vec<String>,
    pub jobs: usize,
    pub format: OutputFormat,
    pub show_progress: bool,
}

impl BatchOptions {
    pub fn from_config(config: &CleanerConfig, format: OutputFormat) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            encodings: config.encodings.clone(),
            jobs: config.jobs,
            format,
            show_progress: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned {
    pub input: PathBuf,
    pub output: PathBuf,
    pub tables: usize,
    pub warnings: usize,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub cleaned: Vec<Cleaned>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.cleaned.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Expands directories into the regular files they contain (not
/// recursively, hidden files skipped) and keeps file arguments as given.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries = Vec::new();
            for entry in fs::read_dir(input)
                .with_context(|| format!("Failed to list {}", input.display()))?
            {
                let path = entry?.path();
                let hidden = path
                    .file_name()
                    .map(|name| name.to_string_lossy().starts_with('.'))
                    .unwrap_or(true);
                if path.is_file() && !hidden {
                    entries.push(path);
                }
            }
            entries.sort();
            paths.extend(entries);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

/// Runs up to `options.jobs` documents at a time. Parsing is CPU-bound, so
/// each document runs on the blocking pool while the permit is held.
pub async fn process_paths(
    paths: Vec<PathBuf>,
    cleaner: Arc<Cleaner>,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    ensure_dir(&options.output_dir)?;

    let semaphore = Arc::new(Semaphore::new(options.jobs.max(1)));
    let progress = BatchProgress::new(paths.len() as u64, options.show_progress);
    let (tx, mut rx) = mpsc::channel::<(PathBuf, Result<Cleaned>)>(100);
    let mut handles = Vec::new();

    for path in paths {
        let tx = tx.clone();
        let cleaner = cleaner.clone();
        let semaphore = semaphore.clone();
        let progress = progress.clone();
        let options = options.clone();

        let handle = tokio::spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => {
                    progress.start_document(&display_name(&path));
                    let input = path.clone();
                    tokio::task::spawn_blocking(move || clean_file(&cleaner, &input, &options))
                        .await
                        .unwrap_or_else(|e| Err(anyhow!("Worker failed: {}", e)))
                }
                Err(e) => Err(anyhow!(e)),
            };
            progress.document_done();
            tx.send((path, outcome)).await
        });
        handles.push(handle);
    }

    drop(tx);

    let mut summary = BatchSummary::default();
    while let Some((path, outcome)) = rx.recv().await {
        match outcome {
            Ok(cleaned) => {
                info!(
                    "Cleaned {} -> {} ({} tables)",
                    path.display(),
                    cleaned.output.display(),
                    cleaned.tables
                );
                summary.cleaned.push(cleaned);
            }
            Err(e) => {
                error!("Error processing {}: {:#}", path.display(), e);
                summary.failed.push((path, format!("{:#}", e)));
            }
        }
    }

    for handle in handles {
        handle.await?.map_err(|e| anyhow!("Result channel closed: {}", e))?;
    }

    summary.cleaned.sort_by(|a, b| a.input.cmp(&b.input));
    summary.failed.sort_by(|a, b| a.0.cmp(&b.0));
    progress.finish(&format!(
        "{} cleaned, {} failed",
        summary.cleaned.len(),
        summary.failed.len()
    ));

    Ok(summary)
}

/// Read, clean and write one document.
pub fn clean_file(cleaner: &Cleaner, path: &Path, options: &BatchOptions) -> Result<Cleaned> {
    let document = read_document(path, &options.encodings)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    debug!("{} detected as {}", path.display(), document.format());

    let result = cleaner
        .clean(&document)
        .with_context(|| format!("Failed to clean {}", path.display()))?;
    for warning in &result.warnings {
        debug!("{}: {}", path.display(), warning);
    }

    let output = write_result(&options.output_dir, path, &result, options.format)?;
    Ok(Cleaned {
        input: path.to_path_buf(),
        output,
        tables: result.tables.len(),
        warnings: result.warnings.len(),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
