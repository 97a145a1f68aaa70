//! Hook errors.

use core::fmt;
use std::io;

use trellis_tree::{BoxError, CommandId, TreeId};

use crate::phase::HookPhase;

/// Failure returned by a hook callback.
///
/// The value is opaque to the hook engine: the first failing hook halts its
/// chain and the error travels unchanged through the tree's error path, where
/// it can be recovered with
/// [`CommandError::cause`](trellis_tree::CommandError::cause) and
/// `downcast_ref::<HookError>()`.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl HookError {
    /// Creates a hook failure with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a hook failure wrapping another error.
    pub fn from_source(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for HookError {
    fn from(error: io::Error) -> Self {
        Self::from_source(error)
    }
}

impl From<fmt::Error> for HookError {
    fn from(error: fmt::Error) -> Self {
        Self::from_source(error)
    }
}

/// Errors that can occur during hook registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookRegistrationError {
    /// The command does not belong to the tree.
    #[error("command {command} does not belong to this tree")]
    UnknownCommand {
        /// The offending command ID.
        command: CommandId,
    },

    /// The `Hooks` handle is attached to a different tree.
    #[error("hooks attached to {expected} cannot register on {found}")]
    ForeignTree {
        /// The tree the handle is attached to.
        expected: TreeId,
        /// The tree passed to the registration call.
        found: TreeId,
    },

    /// A hook with this label already exists for the command and hook point.
    #[error("hook '{name}' already registered for {phase} on {command}")]
    DuplicateName {
        /// The command the hook was registered on.
        command: CommandId,
        /// The hook point where the duplicate was found.
        phase: HookPhase,
        /// The duplicate label.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::error::Error as _;

    #[test]
    fn message_only_error_has_no_source() {
        let error = HookError::new("denied");
        assert_eq!(error.to_string(), "denied");
        assert!(error.source().is_none());
    }

    #[test]
    fn io_errors_are_kept_as_source() {
        let error = HookError::from(io::Error::other("pipe closed"));
        assert_eq!(error.message(), "pipe closed");
        let source = error.source().expect("source should be kept");
        assert!(source.downcast_ref::<io::Error>().is_some());
    }

    #[test]
    fn duplicate_name_message() {
        let error = HookRegistrationError::DuplicateName {
            command: CommandId::new(2),
            phase: HookPhase::PreRun,
            name: "audit".into(),
        };
        assert_eq!(
            error.to_string(),
            "hook 'audit' already registered for pre-run on cmd_2"
        );
    }
}
