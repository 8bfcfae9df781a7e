//! Replays list events against a numbering part.

use std::{io::Write, path::PathBuf};

use clap::Parser;
use list_numbering::{ListEvent, NumberingEngine, NumberingFeat, NumberingPart, Result};

/// Replays the list and heading events of a conversion and writes the
/// resulting `numbering.xml`.
#[derive(Debug, Clone, Parser)]
#[clap(name = "list-numbering", version)]
pub struct Args {
    /// Path to a JSON array of list events
    #[clap(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Path to an existing numbering part to continue
    #[clap(long, value_name = "NUMBERING_XML")]
    pub numbering: Option<PathBuf>,

    /// Path to output file, `-` for stdout
    #[clap(short, long, value_name = "OUTPUT", default_value = "-")]
    pub output: String,

    /// The left indentation added per list level, in twips
    #[clap(long, default_value_t = 720)]
    pub indent_unit: i32,

    /// Seeds the names of cloned definitions for reproducible output
    #[clap(long)]
    pub seed: Option<u64>,

    /// Logs every allocation decision
    #[clap(short, long)]
    pub verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _ = {
        use log::LevelFilter::*;
        env_logger::builder()
            .filter_module("list_numbering", if args.verbose { Debug } else { Info })
            .try_init()
    };

    run(args)
}

fn run(args: Args) -> Result<()> {
    let script = std::fs::read_to_string(&args.script)
        .map_err(|err| format!("failed to read script {:?}: {err}", args.script))?;
    let events: Vec<ListEvent> = serde_json::from_str(&script)?;

    let mut part = match &args.numbering {
        Some(path) => Some(NumberingPart::from_xml(&std::fs::read_to_string(path)?)?),
        None => None,
    };

    let feat = NumberingFeat {
        indent_unit: args.indent_unit,
        name_seed: args.seed,
        ..Default::default()
    };

    let mut engine = NumberingEngine::attach_with(&mut part, feat)?;
    for (index, event) in events.iter().enumerate() {
        if let Some(numbering) = engine.apply(event)? {
            log::info!(
                "event {index}: numId {} / ilvl {}",
                numbering.num_id,
                numbering.level
            );
        }
    }
    let xml = engine.store().to_xml();

    if args.output == "-" {
        std::io::stdout().write_all(xml.as_bytes())?;
    } else if let Err(err) = std::fs::write(&args.output, xml) {
        return Err(format!("failed to write file {:?}: {err}", args.output).into());
    }

    Ok(())
}
