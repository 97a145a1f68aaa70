//! Minimal command tree for Trellis.
//!
//! `trellis_tree` models the command-line framework that lifecycle hooks
//! attach to. It deliberately offers a narrow extension surface:
//!
//! - [`CommandTree`] - Owns the commands and drives an invocation
//! - [`Command`] - A node with one delegate slot per [`Phase`] and an
//!   optional help renderer
//! - [`CommandContext`] - What a callback sees: tree, command, args, output
//!
//! It does not parse flags. Leading arguments that name subcommands select
//! the invoked command; everything after that is handed to callbacks as
//! positional arguments. `-h` and `--help` turn the invocation into a help
//! request.
//!
//! # Example
//!
//! ```
//! use trellis_tree::{CommandTree, Phase};
//!
//! let mut tree = CommandTree::new("app");
//! let root = tree.root();
//! tree.set_delegate(root, Phase::PreRun, Box::new(|ctx| {
//!     let path = ctx.path();
//!     writeln!(ctx.out(), "checking {path}")?;
//!     Ok(())
//! }));
//! tree.set_delegate(root, Phase::Run, Box::new(|ctx| {
//!     writeln!(ctx.out(), "running")?;
//!     Ok(())
//! }));
//!
//! let mut out: Vec<u8> = Vec::new();
//! tree.execute(&[], &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "checking app\nrunning\n");
//! ```

/// Command nodes and callback slot types.
pub mod command;

/// Per-invocation callback context.
pub mod context;

/// Execution errors.
pub mod error;

/// Default help renderer.
pub mod help;

/// Lifecycle phases.
pub mod phase;

/// The command tree and execution driver.
pub mod tree;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::command::{BoxError, Command, CommandId, Delegate, HelpFn, TreeId};
    pub use crate::context::CommandContext;
    pub use crate::error::CommandError;
    pub use crate::phase::Phase;
    pub use crate::tree::{Ancestry, CommandTree, HELP_FLAGS};
}

pub use command::{BoxError, Command, CommandId, Delegate, HelpFn, TreeId};
pub use context::CommandContext;
pub use error::CommandError;
pub use help::{default_help_fn, render_help};
pub use phase::Phase;
pub use tree::{Ancestry, CommandTree};
