use anyhow::{Context, Result};
use edgar_clean::{
    core::config::CleanerConfig, edgar::parsing::xbrl::parse_xbrl,
    utils::encoding::read_document,
};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "xbrl-parser", about = "Print the facts of an XBRL instance as JSON")]
struct Opt {
    /// Input file to parse
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Print only the `tag: value` text form
    #[structopt(long)]
    text: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    if !opt.input.exists() {
        eprintln!("Input file does not exist: {:?}", opt.input);
        std::process::exit(1);
    }

    let config = CleanerConfig::from_env()?;
    let document = read_document(&opt.input, &config.encodings)?;
    let result = parse_xbrl(document.content())
        .with_context(|| format!("Error parsing XBRL file {}", opt.input.display()))?;

    for warning in &result.warnings {
        log::warn!("{}", warning);
    }

    if opt.text {
        println!("{}", result.text);
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}
