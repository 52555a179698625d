//! REPL Command Handler
//!
//! Handles reserved input tokens that bypass evaluation.

use super::backend_trait::REPLBackend;

/// Reports the names bound in the context
pub const ENV_COMMAND: &str = "env";

/// Command result
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Names bound in the context, in binding order
    Names(Vec<String>),
}

/// Command handler for REPL
pub struct CommandHandler<'a, B: REPLBackend> {
    backend: &'a mut B,
}

impl<'a, B: REPLBackend> CommandHandler<'a, B> {
    /// Create a new command handler
    pub fn new(backend: &'a mut B) -> Self {
        Self { backend }
    }

    /// Whether `line` is a command; compared after trimming, nothing else
    /// on the line is allowed
    pub fn is_command(line: &str) -> bool {
        line.trim() == ENV_COMMAND
    }

    /// Handle a command, `None` when `line` should be evaluated instead
    pub fn handle(
        &mut self,
        line: &str,
    ) -> Option<CommandResult> {
        if !Self::is_command(line) {
            return None;
        }
        Some(CommandResult::Names(
            self.backend
                .get_symbols()
                .into_iter()
                .map(|symbol| symbol.name)
                .collect(),
        ))
    }
}
