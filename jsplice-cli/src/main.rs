//! jsplice CLI - convert and cross-check jsplice binary documents
//!
//! Subcommands:
//! - encode: JSON text -> binary
//! - decode: binary -> JSON text
//! - check: differential round-trip driver over line-delimited JSON

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use jsplice_codec::{binary_to_json, binary_validate, json_to_binary};
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "jsplice")]
#[command(about = "Compact binary JSON with path-addressed edits")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON text file to binary
    Encode {
        /// Input file, or '-' for stdin
        input: PathBuf,
        /// Output file; defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decode a binary file to JSON text
    Decode {
        /// Input file, or '-' for stdin
        input: PathBuf,
        /// Output file; defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Round-trip every line of a line-delimited JSON input twice and
    /// report divergence
    Check {
        /// Input file, or '-' for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
        /// Suppress the progress spinner
        #[arg(long)]
        quiet: bool,
    },
}

fn read_input(path: &PathBuf) -> Result<Vec<u8>, Box<dyn Error>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read(path)?)
    }
}

fn write_output(output: Option<PathBuf>, bytes: &[u8]) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => fs::write(path, bytes)?,
        None => io::stdout().write_all(bytes)?,
    }
    Ok(())
}

fn cmd_encode(input: PathBuf, output: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let text = String::from_utf8(read_input(&input)?)?;
    let binary = json_to_binary(&text)?;
    write_output(output, &binary)
}

fn cmd_decode(input: PathBuf, output: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let binary = read_input(&input)?;
    let mut json = binary_to_json(&binary)?;
    json.push('\n');
    write_output(output, json.as_bytes())
}

/// Outcome of checking one line
enum LineOutcome {
    Ok,
    Skipped(&'static str),
    Divergent(String),
}

/// Encode/decode the line twice over and compare the second-generation
/// texts and buffers; every produced buffer must also validate
fn check_line(line: &str) -> LineOutcome {
    let binary1 = match json_to_binary(line) {
        Ok(b) => b,
        Err(_) => return LineOutcome::Skipped("does not encode"),
    };

    let json1 = match binary_to_json(&binary1) {
        Ok(j) => j,
        Err(e) => return LineOutcome::Divergent(format!("binary1 does not decode: {}", e)),
    };

    let binary2 = match json_to_binary(&json1) {
        Ok(b) => b,
        Err(e) => return LineOutcome::Divergent(format!("json1 does not encode: {}", e)),
    };

    let json2 = match binary_to_json(&binary2) {
        Ok(j) => j,
        Err(e) => return LineOutcome::Divergent(format!("binary2 does not decode: {}", e)),
    };

    let binary3 = match json_to_binary(&json2) {
        Ok(b) => b,
        Err(e) => return LineOutcome::Divergent(format!("json2 does not encode: {}", e)),
    };

    let json3 = match binary_to_json(&binary3) {
        Ok(j) => j,
        Err(e) => return LineOutcome::Divergent(format!("binary3 does not decode: {}", e)),
    };

    for (name, binary) in [
        ("binary1", &binary1),
        ("binary2", &binary2),
        ("binary3", &binary3),
    ] {
        if let Err(e) = binary_validate(binary) {
            return LineOutcome::Divergent(format!("{} does not validate: {}", name, e));
        }
    }

    let json_same = json1 == json2 && json2 == json3;
    let binary_same = binary2 == binary3;

    if !json_same || !binary_same {
        return LineOutcome::Divergent(format!(
            "json_same={} binary_same={}",
            if json_same { "yes" } else { "no" },
            if binary_same { "yes" } else { "no" },
        ));
    }

    LineOutcome::Ok
}

fn cmd_check(input: PathBuf, quiet: bool) -> Result<ExitCode, Box<dyn Error>> {
    let reader: Box<dyn BufRead> = if input.as_os_str() == "-" {
        Box::new(io::BufReader::new(io::stdin()))
    } else {
        Box::new(io::BufReader::new(fs::File::open(&input)?))
    };

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template("{spinner} {pos} lines {msg}")?);
        bar
    };

    let mut checked: u64 = 0;
    let mut skipped: u64 = 0;
    let mut divergent: u64 = 0;

    for line in reader.lines() {
        let line = line?;
        progress.inc(1);

        if line.is_empty() {
            continue;
        }

        match check_line(&line) {
            LineOutcome::Ok => checked += 1,
            LineOutcome::Skipped(reason) => {
                skipped += 1;
                progress.suspend(|| println!("skipped ({}): {}", reason, line));
            }
            LineOutcome::Divergent(reason) => {
                divergent += 1;
                progress.suspend(|| println!("DIVERGENT ({}): {}", reason, line));
            }
        }
    }

    progress.finish_and_clear();
    println!(
        "{} checked, {} skipped, {} divergent",
        checked, skipped, divergent
    );

    if divergent > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode { input, output } => cmd_encode(input, output).map(|_| ExitCode::SUCCESS),
        Commands::Decode { input, output } => cmd_decode(input, output).map(|_| ExitCode::SUCCESS),
        Commands::Check { input, quiet } => cmd_check(input, quiet),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
