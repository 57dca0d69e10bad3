use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub const DEFAULT_MAX_DEPTH: usize = 512;
pub const DEFAULT_JOBS: usize = 4;
/// `auto` stands for the encoding `chardet` detects in the input bytes.
pub const DEFAULT_ENCODINGS: &[&str] = &["utf-8", "auto", "windows-1252"];
pub const DEFAULT_OUTPUT_DIR: &str = "cleaned_output";

#[derive(Clone, Debug)]
pub struct CleanerConfig {
    /// Parser backends reject trees nested deeper than this.
    pub max_depth: usize,
    /// Ordered list of encoding labels tried by the input reader.
    pub encodings: Vec<String>,
    /// Optional JSON file replacing the built-in tag vocabulary.
    pub vocabulary_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub jobs: usize,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            encodings: DEFAULT_ENCODINGS.iter().map(|e| e.to_string()).collect(),
            vocabulary_path: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            jobs: DEFAULT_JOBS,
        }
    }
}

impl CleanerConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(depth) = std::env::var("EDGAR_CLEAN_MAX_DEPTH") {
            config.max_depth = depth
                .parse()
                .map_err(|_| anyhow!("EDGAR_CLEAN_MAX_DEPTH must be a number, got {}", depth))?;
        }

        if let Ok(encodings) = std::env::var("EDGAR_CLEAN_ENCODINGS") {
            config.encodings = parse_encoding_list(&encodings);
            if config.encodings.is_empty() {
                return Err(anyhow!("EDGAR_CLEAN_ENCODINGS must name at least one encoding"));
            }
        }

        config.vocabulary_path = std::env::var("EDGAR_CLEAN_VOCABULARY")
            .ok()
            .map(PathBuf::from);

        if let Ok(dir) = std::env::var("EDGAR_CLEAN_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        if let Ok(jobs) = std::env::var("EDGAR_CLEAN_JOBS") {
            config.jobs = jobs
                .parse()
                .map_err(|_| anyhow!("EDGAR_CLEAN_JOBS must be a number, got {}", jobs))?;
        }
        config.jobs = config.jobs.max(1);

        Ok(config)
    }
}

pub fn parse_encoding_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
