use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use lse::shannon_entropy;

#[derive(clap::Parser, Debug)]
#[command(name = "lse", about = "Calculates per-line n-gram Shannon entropy of its input")]
struct Cli {
    /// Size of n-gram window (1-4)
    #[arg(short, long = "ngrams", value_parser = clap::value_parser!(u64).range(1..=4))]
    n: Option<u64>,

    /// Input file to read from (standard input when omitted)
    #[arg(short = 'r', long)]
    read_file: Option<PathBuf>,

    /// Preserve original input column (line<TAB>entropy)
    #[arg(short, long)]
    verbose: bool,

    /// Output format: human or json
    #[arg(short, long, default_value = "human")]
    format: String,

    /// Compute lines in parallel
    #[arg(short, long)]
    jobs: bool,
}

#[derive(Debug, Deserialize)]
struct Config {
    ngrams: Option<usize>,
    verbose: Option<bool>,
}

/// Settings resolved once at startup; nothing downstream consults the
/// environment again.
#[derive(Debug)]
struct Settings {
    n: usize,
    verbose: bool,
    json: bool,
    parallel: bool,
    input: Option<PathBuf>,
}

#[derive(Debug, serde::Serialize)]
struct LineEntropy {
    line: String,
    entropy: f64,
}

fn load_config() -> Option<Config> {
    let cfg = dirs_next::config_dir()?.join("lse").join("config.toml");
    let buf = fs::read_to_string(&cfg).ok()?;
    match toml::from_str(&buf) {
        Ok(c) => Some(c),
        Err(e) => {
            log::debug!("ignoring malformed config {}: {}", cfg.display(), e);
            None
        }
    }
}

fn resolve_settings(cli: Cli) -> Result<Settings> {
    let config = load_config();
    let n = cli
        .n
        .map(|n| n as usize)
        .or_else(|| config.as_ref().and_then(|c| c.ngrams))
        .unwrap_or(1);
    if !(1..=4).contains(&n) {
        anyhow::bail!("ngrams must be between 1 and 4, got {}", n);
    }
    let verbose = cli.verbose || config.as_ref().and_then(|c| c.verbose).unwrap_or(false);
    let json = match cli.format.as_str() {
        "json" => true,
        "human" => false,
        other => anyhow::bail!("unknown output format: {}", other),
    };
    Ok(Settings { n, verbose, json, parallel: cli.jobs, input: cli.read_file })
}

fn read_lines(path: Option<&Path>) -> Result<Vec<String>> {
    let buf = match path {
        Some(p) => fs::read_to_string(p)
            .with_context(|| format!("failed to read input file {}", p.display()))?,
        None => {
            let mut s = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut s)
                .context("failed to read standard input")?;
            s
        }
    };
    // str::lines strips trailing \n and \r\n
    Ok(buf.lines().map(|l| l.to_string()).collect())
}

fn main() -> Result<()> {
    env_logger::init();
    let settings = resolve_settings(Cli::parse())?;
    log::debug!("resolved settings: {:?}", settings);

    let lines = read_lines(settings.input.as_deref())?;

    // each line is independent; rayon's indexed collect preserves input order
    let entropies: Vec<f64> = if settings.parallel {
        lines
            .par_iter()
            .map(|line| shannon_entropy(line, settings.n))
            .collect::<Result<_, _>>()?
    } else {
        lines
            .iter()
            .map(|line| shannon_entropy(line, settings.n))
            .collect::<Result<_, _>>()?
    };

    if settings.json {
        let records: Vec<LineEntropy> = lines
            .into_iter()
            .zip(entropies)
            .map(|(line, entropy)| LineEntropy { line, entropy })
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if settings.verbose {
        for (line, ent) in lines.iter().zip(&entropies) {
            println!("{}\t{}", line, ent);
        }
    } else {
        for ent in &entropies {
            println!("{}", ent);
        }
    }

    Ok(())
}
