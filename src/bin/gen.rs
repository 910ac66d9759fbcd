//! netdedupe-gen: CLI tool for building deduplicated blocklists.

use clap::{Parser, Subcommand};
use netdedupe::input::InputFormat;
use netdedupe::{create, generate, verify, Deduplicator, ListsConfig};
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "netdedupe-gen")]
#[command(version = "0.1.0")]
#[command(about = "Build deduplicated IP/CIDR and domain blocklists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download, deduplicate and write every list in a config file
    Generate {
        /// Lists configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory for list files
        #[arg(short, long, default_value = "lists")]
        output_dir: PathBuf,
    },

    /// Check generated lists against the previous git commit
    Verify {
        /// Directory containing the generated .txt lists
        dir: PathBuf,

        /// Maximum allowed change in line count, in percent
        threshold: f64,

        /// Allow list files to be deleted
        #[arg(long)]
        allow_deletions: bool,
    },

    /// Deduplicate a hostlist file (or stdin) and print the result
    Dedupe {
        /// Strategy: set, radix or domain
        #[arg(short, long, default_value = "set")]
        strategy: String,

        /// Input file, one entry per line (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { config, output_dir } => run_generate(&config, &output_dir),
        Commands::Verify {
            dir,
            threshold,
            allow_deletions,
        } => run_verify(&dir, threshold, allow_deletions),
        Commands::Dedupe { strategy, input } => run_dedupe(&strategy, input.as_ref()),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_generate(config: &PathBuf, output_dir: &PathBuf) -> Result<bool, Box<dyn std::error::Error>> {
    let config = ListsConfig::load(config)?;
    let reports = generate(&config, output_dir)?;

    for report in &reports {
        println!(
            "{}: {} entries from {} sources ({} failed, {} invalid, {} excluded)",
            report.name,
            report.entries,
            report.sources_ok,
            report.sources_failed,
            report.invalid,
            report.excluded
        );
    }
    println!("All lists generated in {:?}", output_dir);
    Ok(true)
}

fn run_verify(dir: &PathBuf, threshold: f64, allow_deletions: bool) -> Result<bool, Box<dyn std::error::Error>> {
    let report = verify(dir, threshold, allow_deletions)?;

    for path in &report.deleted {
        println!("{}: Deleted", path.display());
    }
    for v in &report.violations {
        println!(
            "{}: {} -> {} lines ({:+.2}% change) exceeds ±{:.1}% threshold",
            v.path.display(),
            v.old_lines,
            v.new_lines,
            v.percent,
            threshold
        );
    }
    Ok(report.passed())
}

fn run_dedupe(strategy: &str, input: Option<&PathBuf>) -> Result<bool, Box<dyn std::error::Error>> {
    let content = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut dedupe = create(strategy)?;
    let entries = InputFormat::Hostlist.parse_entries(&content, &Default::default())?;
    for entry in &entries {
        if let Err(e) = dedupe.add(entry) {
            log::warn!("Skipping entry: {}", e);
        }
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for entry in dedupe.all() {
        writeln!(out, "{}", entry)?;
    }
    out.flush()?;
    Ok(true)
}
