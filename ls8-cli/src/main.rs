//! LS-8 CLI — run, disassemble and assemble programs.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, input, load or assembly error
//! - 3: Runtime error

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ls8", version, about = "LS-8 8-bit computer emulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load an .ls8 image and execute it until HLT.
    Run {
        /// Program image (one binary byte per line, `#` comments).
        file: PathBuf,

        /// Log a trace line before every instruction.
        #[arg(long)]
        trace: bool,

        /// Stop with an error after this many instructions.
        #[arg(long, value_name = "N")]
        max_steps: Option<u64>,
    },

    /// Print an .ls8 image as an assembly listing.
    Disassemble {
        /// Program image to disassemble.
        file: PathBuf,
    },

    /// Assemble source text into an .ls8 image.
    Assemble {
        /// Assembly source.
        input: PathBuf,

        /// Output path. Defaults to the input with an .ls8 extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version go to stdout and succeed.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let trace = matches!(cli.command, Command::Run { trace: true, .. });
    init_logging(trace);

    let result = match cli.command {
        Command::Run {
            file,
            max_steps,
            ..
        } => commands::run(&file, max_steps),
        Command::Disassemble { file } => commands::disassemble(&file),
        Command::Assemble { input, output } => commands::assemble(&input, output.as_deref()),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

/// Send log records to stderr, filtered by `RUST_LOG`.
fn init_logging(trace: bool) {
    let mut filter = EnvFilter::from_default_env();
    if trace {
        if let Ok(directive) = "ls8_vm=trace".parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}
