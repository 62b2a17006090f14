//! corpaug - augments a tab-separated parallel corpus on the fly
//!
//! Usage:
//!   corpaug --config chain.json [--seed N] [--input corpus.tsv] [--output out.tsv]

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use corpaug::config::load_config;
use corpaug::Pipeline;

#[derive(Parser, Debug)]
#[command(name = "corpaug", version, about = "Alignment-preserving corpus augmentation")]
struct Cli {
    /// Modifier chain configuration (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Overrides the seed from the configuration
    #[arg(short, long)]
    seed: Option<u64>,

    /// Input records, one per line (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(cli: Cli) -> corpaug::Result<usize> {
    let mut config = load_config(&cli.config)?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    // Configuration errors surface here, before any record is read
    let mut pipeline = Pipeline::from_config(&config)?;

    let reader: Box<dyn io::BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let writer: Box<dyn io::Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    pipeline.process(reader, writer)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("corpaug: {}", e);
        process::exit(1);
    }
}
