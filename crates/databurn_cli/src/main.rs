//! Databurn - burned-in timecode video to EDL/FCPXML.
//!
//! Thin front-end over `databurn_core`: parses arguments, initialises
//! tracing, renders pipeline progress and prints the result.

mod commands;
mod progress;

use clap::{Parser, Subcommand};
use databurn_core::logging::{self, LogLevel};

use commands::{CmdAssemble, CmdConfig, CmdRun};

/// Command-line arguments for databurn.
#[derive(Parser, Debug)]
#[command(name = "databurn")]
#[command(version)]
#[command(about = "Rebuild an edit from timecode and filenames burned into a video")]
#[command(long_about = "Databurn reads the source timecode and clip name burned into every \
    frame of a screener or reference export, repairs frames OCR could not read, and writes \
    the cut back out as a CMX EDL and/or FCPXML timeline.\n\n\
    EXAMPLES:\n    \
    databurn run reel_04.mov\n    \
    databurn run reel_04.mov -o reel_04.edl --fcpxml reel_04.fcpxml\n    \
    databurn assemble readings.json -o cut.edl\n    \
    databurn config")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// OCR a video and write its timeline.
    Run(CmdRun),
    /// Build a timeline from already-recognized frame texts (JSON).
    Assemble(CmdAssemble),
    /// Create the settings file if needed and print it.
    Config(CmdConfig),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_tracing(LogLevel::Warn.raised_by(cli.verbose));
    tracing::debug!("databurn {}", databurn_core::version());

    match cli.command {
        Command::Run(cmd) => cmd.execute(cli.verbose),
        Command::Assemble(cmd) => cmd.execute(cli.verbose),
        Command::Config(cmd) => cmd.execute(),
    }
}
