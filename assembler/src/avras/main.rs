use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction::{Append, Set, SetTrue};
use clap::Parser;
use tracing::{event, span, Level};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use assembler::{assemble_files, AssemblyOptions};

/// Two-pass assembler for AVR microcontrollers
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// Files from which assembly source is read.  They are assembled
    /// as one program, in the order given.
    #[clap(action = Append, required = true)]
    inputs: Vec<OsString>,

    /// File to which the program image is written
    #[clap(action = Set, short = 'o', long)]
    output: PathBuf,

    /// Do not place an interrupt vector table in front of the
    /// program.
    #[clap(action = SetTrue, long)]
    no_vectors: bool,

    /// When set, print a listing of the program and its symbols.
    #[clap(action = SetTrue, long)]
    list: bool,
}

impl Cli {
    fn options(&self) -> AssemblyOptions {
        AssemblyOptions {
            vector_table: !self.no_vectors,
            list: self.list,
        }
    }
}

/// Send trace output to stderr, since stdout may carry the listing.
/// Set RUST_LOG to select which messages get printed (for example
/// RUST_LOG=assembler=debug).
fn init_tracing() -> Result<(), String> {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| {
            format!(
                "failed to initialise tracing filter (perhaps there is a problem with environment variables): {e}"
            )
        })?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
    Ok(())
}

fn main() -> ExitCode {
    unsafe { backtrace_on_stack_overflow::enable() };

    let cli = Cli::parse();
    if let Err(msg) = init_tracing() {
        eprintln!("{msg}");
        return ExitCode::FAILURE;
    }

    let span = span!(Level::ERROR, "assemble", inputs=?cli.inputs, output=?cli.output);
    let _enter = span.enter();
    match assemble_files(&cli.inputs, &cli.output, &cli.options()) {
        Ok(()) => {
            event!(Level::INFO, "assembly succeeded");
            ExitCode::SUCCESS
        }
        Err(e) => {
            event!(Level::DEBUG, "assembly failed: {e:?}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
