//! Fabview - AMR dump inspector
//!
//! Entry point that handles CLI argument parsing and switches between a
//! one-shot statistics run and the interactive REPL.

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use fabview::cli::{load_dump, run_cli, Loaded, Session};
use fabview::{write_fab_stats, write_multifab_stats, ScanFormat};

/// Fabview: inspect FArrayBox / MultiFab dumps
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dump file to load at startup
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Print min/max statistics for --file and exit
    #[arg(long, default_value_t = false)]
    stats: bool,

    /// Component to report (default: all)
    #[arg(short, long)]
    comp: Option<usize>,

    /// Digits after the decimal point in min/max values
    #[arg(short, long)]
    precision: Option<usize>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    // 1. Parse command line arguments
    let args = Args::parse();

    // 2. Initialize logger with verbosity level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        },
    ))
    .init();

    let format = match args.precision {
        Some(p) => ScanFormat::with_precision(p),
        None => ScanFormat::default(),
    };
    format.validate()?;

    log::debug!("File: {:?}", args.file);
    log::debug!("Format: {:?}", format);

    // 3. Branch based on execution mode
    if args.stats {
        let Some(path) = args.file.as_ref() else {
            bail!("--stats needs --file <dump>");
        };
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let written = match load_dump(path)? {
            Loaded::Fab(fab) => write_fab_stats(&mut out, &fab, args.comp, &format),
            Loaded::MultiFab(mf) => write_multifab_stats(&mut out, &mf, args.comp, &format),
        };
        written.context("Writing statistics")?;
        return Ok(());
    }

    println!("[*] Fabview v{}", env!("CARGO_PKG_VERSION"));
    let mut session = Session::new(format);
    if let Some(path) = args.file.as_ref() {
        if let Err(e) = session.load(path) {
            log::error!("Load failed: {:#}", e);
            println!("[!] {:#}", e);
        }
    }
    run_cli(session)?;

    Ok(())
}
