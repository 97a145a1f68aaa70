//! Errors surfaced by command execution.

use crate::command::BoxError;
use crate::phase::Phase;

/// Errors returned from [`CommandTree::execute`](crate::CommandTree::execute)
/// and [`CommandTree::help`](crate::CommandTree::help).
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// No command matches the requested path.
    #[error("unknown command path: '{path}'")]
    UnknownCommand {
        /// The path that failed to resolve.
        path: String,
    },

    /// A delegate failed while running a lifecycle phase.
    #[error("{phase} failed for '{command}'")]
    PhaseFailed {
        /// Path of the invoked command.
        command: String,
        /// The phase whose delegate failed.
        phase: Phase,
        /// The delegate's error.
        #[source]
        source: BoxError,
    },

    /// The help renderer failed; no help text was produced.
    #[error("help for '{command}' was aborted")]
    Help {
        /// Path of the command help was requested for.
        command: String,
        /// The renderer's error.
        #[source]
        source: BoxError,
    },
}

impl CommandError {
    /// Returns the error produced by the failing callback, if any.
    ///
    /// Hook failures can be recovered from here with `downcast_ref`.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn core::error::Error + Send + Sync + 'static)> {
        match self {
            CommandError::UnknownCommand { .. } => None,
            CommandError::PhaseFailed { source, .. } | CommandError::Help { source, .. } => {
                Some(source.as_ref())
            }
        }
    }

    /// Returns the phase that failed, if the error came from a delegate.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        match self {
            CommandError::PhaseFailed { phase, .. } => Some(*phase),
            CommandError::UnknownCommand { .. } | CommandError::Help { .. } => None,
        }
    }
}
