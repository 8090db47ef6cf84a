//! espalier-flatten: flatten nested XML into CSV tables
//!
//! Usage:
//!   # Read XML from a file, write one CSV per table
//!   espalier-flatten data.xml --job job.json --output-dir ./tables
//!
//!   # Read XML from stdin, print tables to stdout
//!   cat data.xml | espalier-flatten --job job.json
//!
//! The job file declares what to extract:
//!
//! ```json
//! {
//!   "item_tag": "record",
//!   "units": [
//!     {"children": ["title", ["price", "currency"]], "parents": "listing", "target": "offers"}
//!   ],
//!   "headers": {"offers": ["title", "currency"]},
//!   "prefix": [],
//!   "skip": []
//! }
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use espalier::flatten::{ExtractionUnit, FlattenConfig, ProductPolicy, TableAccumulator};
use espalier::xml::Document;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "espalier-flatten")]
#[command(about = "Flatten nested XML into CSV tables", long_about = None)]
struct Args {
    /// Input XML file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Job file describing extraction units, headers, and the item tag
    #[arg(long, short = 'j')]
    job: PathBuf,

    /// Output directory for one .csv file per table
    /// If omitted, tables are printed to stdout
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// Emit every cartesian combination per parent context instead of the
    /// first aligned tuple only
    #[arg(long)]
    all_combinations: bool,

    /// Value used to pad rows shorter than their declared header width
    /// (default: empty string)
    #[arg(long)]
    null_sentinel: Option<String>,
}

/// Extraction job: the spec list plus the metadata the engine treats as
/// externally supplied (item tag, headers, row prefix, skip set).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobFile {
    item_tag: String,
    units: Vec<ExtractionUnit>,
    #[serde(default)]
    headers: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    prefix: Vec<String>,
    #[serde(default)]
    skip: HashSet<String>,
    #[serde(default)]
    product: Option<ProductPolicy>,
    #[serde(default)]
    null_sentinel: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let job_text = std::fs::read_to_string(&args.job)
        .with_context(|| format!("failed to read job file {}", args.job.display()))?;
    let job: JobFile = serde_json::from_str(&job_text)
        .with_context(|| format!("failed to parse job file {}", args.job.display()))?;

    let xml = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    // CLI flags win over job-file settings
    let product = if args.all_combinations {
        ProductPolicy::AllCombinations
    } else {
        job.product.unwrap_or(ProductPolicy::FirstOnly)
    };
    let sentinel = args
        .null_sentinel
        .or(job.null_sentinel)
        .unwrap_or_default();

    let document = Document::parse(&xml).context("failed to parse XML input")?;

    let mut accumulator = TableAccumulator::new();
    let processed = espalier::flatten_items(
        &document,
        &job.item_tag,
        &job.units,
        &job.prefix,
        &job.skip,
        FlattenConfig { product },
        &mut accumulator,
    )
    .context("flattening failed")?;
    log::info!("processed {} '{}' items", processed, job.item_tag);

    let tables = accumulator.finalize(&job.headers, &sentinel);

    if let Some(output_dir) = args.output_dir {
        espalier::export::write_tables(&tables, &output_dir)
            .context("failed to write CSV output")?;
    } else {
        let mut stdout = std::io::stdout();
        for (name, table) in &tables {
            use std::io::Write;
            writeln!(stdout, "# {name}")?;
            espalier::export::write_table(table, &mut stdout)?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
