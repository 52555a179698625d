//! remeval - CLI

use std::path::PathBuf;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use remeval::repl::{Evaluator, LineREPL};
use remeval::util::config::{load_config, Framing, ReplConfig};
use remeval::util::logger::{self, LogLevel};
use remeval::{run_loop, NAME, VERSION};
use tracing::debug;

/// Stack for the evaluation thread; deep call chains recurse on the host stack
const EVAL_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Evaluate JavaScript read from stdin, one JSON line per input
#[derive(Parser, Debug)]
#[command(name = "remeval")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    /// RON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Echo the input back in error outcomes
    #[arg(long)]
    echo_input: bool,

    /// Input framing
    #[arg(long, value_enum)]
    framing: Option<Framing>,

    /// Read size in bytes for chunk framing
    #[arg(long, value_name = "N")]
    chunk_size: Option<usize>,

    /// Nested calls allowed before evaluation fails
    #[arg(long, value_name = "N")]
    max_call_depth: Option<usize>,

    /// Log level for stderr
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Enable verbose output (debug logging)
    #[arg(short, long)]
    verbose: bool,

    /// Read input through a line editor
    #[arg(long)]
    interactive: bool,
}

impl Args {
    /// Config file settings overridden by flags
    fn to_config(&self) -> Result<ReplConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => ReplConfig::default(),
        };
        if self.echo_input {
            config.echo_input = true;
        }
        if let Some(framing) = self.framing {
            config.framing = framing;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(max_call_depth) = self.max_call_depth {
            config.max_call_depth = max_call_depth;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.verbose {
            config.log_level = LogLevel::Debug;
        }
        config.validate().context("Invalid options")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.to_config()?;
    logger::init_with_level(config.log_level);
    debug!("{} {} starting with {:?}", NAME, VERSION, config);

    let interactive = args.interactive;
    let worker = thread::Builder::new()
        .name("eval".to_string())
        .stack_size(EVAL_STACK_SIZE)
        .spawn(move || -> Result<()> {
            if interactive {
                let evaluator = Evaluator::new().with_max_call_depth(config.max_call_depth);
                LineREPL::new(evaluator, &config)?.run()
            } else {
                let stdin = std::io::stdin();
                run_loop(&config, stdin.lock(), std::io::stdout().lock())
            }
        })
        .context("Failed to spawn evaluation thread")?;

    worker
        .join()
        .map_err(|_| anyhow!("evaluation thread panicked"))?
}
