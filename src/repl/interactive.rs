//! Interactive front end with rustyline
//!
//! Same outcomes as the stream loop, read through a line editor with
//! in-memory history. Meant for a human at a terminal.

use std::io::{self, Write};

use anyhow::Context as _;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use super::backend_trait::REPLBackend;
use super::line::LineLoop;
use crate::util::config::ReplConfig;

/// Prompt shown before each line
pub const PROMPT: &str = "> ";

/// Line REPL
pub struct LineREPL<B: REPLBackend> {
    /// rustyline editor
    editor: DefaultEditor,
    /// Loop that evaluates and encodes each line
    inner: LineLoop<B>,
}

impl<B: REPLBackend> LineREPL<B> {
    /// Create a new line REPL
    pub fn new(
        backend: B,
        config: &ReplConfig,
    ) -> anyhow::Result<Self> {
        let editor = DefaultEditor::new().context("creating line editor")?;
        Ok(Self {
            editor,
            inner: LineLoop::new(backend, config),
        })
    }

    /// Run until Ctrl-D; Ctrl-C discards the current line
    pub fn run(&mut self) -> anyhow::Result<()> {
        info!("interactive loop started");
        let stdout = io::stdout();
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        // history is best effort
                        let _ = self.editor.add_history_entry(line.as_str());
                    }
                    let mut out = stdout.lock();
                    self.inner.process_unit(&line, &mut out)?;
                    out.flush().context("flushing output")?;
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e).context("reading input"),
            }
        }
        info!("interactive loop finished");
        Ok(())
    }

    /// Get the backend reference
    pub fn backend(&self) -> &B {
        self.inner.backend()
    }
}
