// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! `gbview`: print the report of every record in GenBank files.
//!
//! ```bash
//! gbview --width 80 --output report.txt sequence.gb
//! RUST_LOG=debug gbview sequence.gb
//! ```
//!
//! Exits with status 1 when a record could not be read.

use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use bio_genbank::{ParseOptions, Reader, Summary};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// GenBank flat files to read
    #[clap(required = true)]
    files: Vec<PathBuf>,

    /// Bases per line in the DNA section, 0 for a single line
    #[clap(long, short, default_value_t = 60)]
    width: usize,

    /// Also write the reports to this file
    #[clap(long, short)]
    output: Option<PathBuf>,

    /// Keep sequence letters in the case they are written in
    #[clap(long)]
    keep_case: bool,

    /// Do not log LOCUS lengths that differ from the sequence
    #[clap(long)]
    no_length_check: bool,

    /// Do not print the reports on standard output
    #[clap(long, short)]
    quiet: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => (),
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    }
}

/// Print every report; `Ok(false)` when some record failed.
fn run(args: &Args) -> Result<bool, Box<dyn Error>> {
    let options = ParseOptions::default()
        .preserve_case(args.keep_case)
        .check_length(!args.no_length_check);

    let mut output = match &args.output {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    let mut all_read = true;
    for path in &args.files {
        info!(path = %path.display(), "reading");
        let file = BufReader::new(File::open(path)?);
        for result in Reader::with_options(file, options.clone()) {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    all_read = false;
                    error!(path = %path.display(), "{}", e);
                    continue;
                }
            };
            let report = Summary::new(&record).line_width(args.width).to_string();
            if !args.quiet {
                stdout.write_all(report.as_bytes())?;
            }
            if let Some(out) = output.as_mut() {
                out.write_all(report.as_bytes())?;
            }
        }
    }

    if let Some(mut out) = output {
        out.flush()?;
        info!("report written");
    }
    Ok(all_read)
}
