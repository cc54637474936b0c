use std::io::{self, IsTerminal};

/// Reports whether the standard streams are attached to a terminal.
pub trait TerminalClient {
    /// Returns whether stdout is an interactive terminal.
    fn stdout_is_terminal(&self) -> bool;

    /// Returns whether stderr is an interactive terminal.
    fn stderr_is_terminal(&self) -> bool;
}

/// Terminal client backed by the process's real standard streams.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SystemTerminalClient;

impl TerminalClient for SystemTerminalClient {
    fn stdout_is_terminal(&self) -> bool {
        io::stdout().is_terminal()
    }

    fn stderr_is_terminal(&self) -> bool {
        io::stderr().is_terminal()
    }
}
