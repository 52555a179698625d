//! Stream loop
//!
//! Reads units from any reader, evaluates them, and writes one JSON line per
//! non-empty unit. `main` runs it over stdin/stdout; tests run it over
//! in-memory buffers.

use std::io::{BufRead, ErrorKind, Write};

use anyhow::Context as _;
use tracing::{debug, info};

use super::backend_trait::REPLBackend;
use super::commands::{CommandHandler, CommandResult};
use super::outcome::Outcome;
use crate::util::config::{Framing, ReplConfig};

/// Loop over a reader/writer pair
#[derive(Debug)]
pub struct LineLoop<B: REPLBackend> {
    backend: B,
    echo_input: bool,
    framing: Framing,
    chunk_size: usize,
}

impl<B: REPLBackend> LineLoop<B> {
    /// Create a loop with the framing and echo settings of `config`
    pub fn new(
        backend: B,
        config: &ReplConfig,
    ) -> Self {
        Self {
            backend,
            echo_input: config.echo_input,
            framing: config.framing,
            chunk_size: config.chunk_size.max(1),
        }
    }

    /// Run until the reader is exhausted
    ///
    /// Evaluation errors are reported as output lines; only I/O failures
    /// end the loop early.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> anyhow::Result<()> {
        info!("loop started ({:?} framing)", self.framing);
        match self.framing {
            Framing::Line => self.run_lines(&mut reader, &mut writer)?,
            Framing::Chunk => self.run_chunks(&mut reader, &mut writer)?,
        }
        let stats = self.backend.stats();
        info!(
            "loop finished: {} evaluations, {} errors, {:?}",
            stats.eval_count, stats.error_count, stats.total_time
        );
        Ok(())
    }

    fn run_lines<R: BufRead, W: Write>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
    ) -> anyhow::Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf).context("reading input")?;
            if read == 0 {
                return Ok(());
            }
            self.process_unit(&String::from_utf8_lossy(&buf), writer)?;
        }
    }

    fn run_chunks<R: BufRead, W: Write>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
    ) -> anyhow::Result<()> {
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            let read = match reader.read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).context("reading input"),
            };
            self.process_unit(&String::from_utf8_lossy(&buf[..read]), writer)?;
        }
    }

    /// Handle one unit; returns whether a line was written
    pub fn process_unit<W: Write>(
        &mut self,
        unit: &str,
        writer: &mut W,
    ) -> anyhow::Result<bool> {
        let input = unit.trim();
        if input.is_empty() {
            return Ok(false);
        }
        debug!("input: {}", input);

        let command = CommandHandler::new(&mut self.backend).handle(input);
        let line = match command {
            Some(CommandResult::Names(names)) => Outcome::Names(&names).to_line()?,
            None => {
                let result = self.backend.eval(input);
                Outcome::from_eval(&result, input, self.echo_input).to_line()?
            }
        };
        writeln!(writer, "{line}").context("writing output")?;
        writer.flush().context("flushing output")?;
        Ok(true)
    }

    /// Get the backend reference
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests;
