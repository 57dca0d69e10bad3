use anyhow::{Context, Result};
use colored::*;
use edgar_clean::{
    core::config::{parse_encoding_list, CleanerConfig},
    edgar::{
        batch::{self, BatchOptions},
        parsing::Cleaner,
    },
    utils::dirs::OutputFormat,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "edgar-clean",
    about = "Clean SEC EDGAR filings into plain text and extracted tables"
)]
struct Opt {
    /// Filing files, or directories whose files should all be cleaned
    #[structopt(parse(from_os_str), required = true)]
    inputs: Vec<PathBuf>,

    /// Directory receiving <name>_cleaned.txt files
    #[structopt(short, long, parse(from_os_str))]
    output_dir: Option<PathBuf>,

    /// Documents cleaned at the same time
    #[structopt(short, long)]
    jobs: Option<usize>,

    /// Write the full result as JSON instead of the text layout
    #[structopt(long)]
    json: bool,

    /// Reject markup nested deeper than this
    #[structopt(long)]
    max_depth: Option<usize>,

    /// JSON file replacing the built-in tag vocabulary
    #[structopt(long, parse(from_os_str))]
    vocabulary: Option<PathBuf>,

    /// Comma separated encodings to try, `auto` for detection
    #[structopt(long)]
    encodings: Option<String>,

    /// Print the first N characters of every cleaned output
    #[structopt(long)]
    preview: Option<usize>,

    /// Hide the progress bar
    #[structopt(long)]
    no_progress: bool,
}

impl Opt {
    fn apply(&self, config: &mut CleanerConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs.max(1);
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if let Some(path) = &self.vocabulary {
            config.vocabulary_path = Some(path.clone());
        }
        if let Some(raw) = &self.encodings {
            let encodings = parse_encoding_list(raw);
            if !encodings.is_empty() {
                config.encodings = encodings;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let mut config = CleanerConfig::from_env()?;
    opt.apply(&mut config);

    let cleaner = Arc::new(Cleaner::from_config(&config).context("Failed to set up cleaner")?);
    let format = if opt.json {
        OutputFormat::Json
    } else {
        OutputFormat::Txt
    };
    let mut options = BatchOptions::from_config(&config, format);
    options.show_progress = !opt.no_progress;

    let paths = batch::collect_inputs(&opt.inputs)?;
    if paths.is_empty() {
        eprintln!("{}", "No input files found".red());
        std::process::exit(1);
    }

    let summary = batch::process_paths(paths, cleaner, &options).await?;

    for cleaned in &summary.cleaned {
        println!(
            "{} {} -> {}",
            "✓".green(),
            cleaned.input.display(),
            cleaned.output.display().to_string().blue()
        );
        if cleaned.warnings > 0 {
            println!(
                "  {}",
                format!("{} warnings, run with RUST_LOG=debug for details", cleaned.warnings)
                    .dimmed()
            );
        }
        if let Some(limit) = opt.preview {
            let text = fs::read_to_string(&cleaned.output)?;
            println!("{}\n", text.chars().take(limit).collect::<String>());
        }
    }
    for (input, error) in &summary.failed {
        eprintln!("{} {}: {}", "✗".red(), input.display(), error);
    }

    println!(
        "\n{} {} cleaned, {} failed",
        "Done:".bold(),
        summary.cleaned.len().to_string().green(),
        summary.failed.len().to_string().red()
    );

    if !summary.all_succeeded() {
        std::process::exit(1);
    }
    Ok(())
}
