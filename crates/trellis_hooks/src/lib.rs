//! Multi-subscriber lifecycle hooks for Trellis command trees.
//!
//! A [`CommandTree`](trellis_tree::CommandTree) offers exactly one delegate
//! slot per lifecycle phase. This crate lets any number of independent
//! callers attach hooks to any command at any phase without overwriting each
//! other or the tree's own callbacks.
//!
//! # Design Principles
//!
//! - Within one command, hooks execute in registration order
//! - Cascading (persistent) hooks execute ancestors first
//! - The first failing hook aborts its chain
//! - One adapter per (command, phase) slot, however many hooks it serves
//!
//! # Architecture
//!
//! - **Registry** ([`registry`]): per (command, hook point) ordered records
//! - **Resolution** ([`resolve`]): pure functions computing the ordered chain
//!   for an invocation, including the ancestor cascade and the help chain
//! - **Adapters** (internal): the delegate installed once per slot that runs
//!   the resolved chain
//! - **Help pathway** (internal): a one-time wrapper around the root's help
//!   renderer
//! - **API** ([`api`]): the [`Hooks`] registration entry points
//!
//! # Example
//!
//! ```
//! use trellis_hooks::{HookError, HookOptions, Hooks};
//! use trellis_tree::CommandTree;
//!
//! let mut tree = CommandTree::new("app");
//! let root = tree.root();
//! let deploy = tree.add_command(root, "deploy");
//!
//! let hooks = Hooks::attach(&mut tree);
//! hooks.on_persistent_pre_run(&mut tree, root, |ctx| {
//!     writeln!(ctx.out(), "loading config")?;
//!     Ok(())
//! }, HookOptions::new().run_on_help())?;
//! hooks.on_run(&mut tree, deploy, |ctx| {
//!     let (_, args, out) = ctx.split();
//!     if args.is_empty() {
//!         return Err(HookError::new("deploy needs a target"));
//!     }
//!     writeln!(out, "deploying {}", args.join(" "))?;
//!     Ok(())
//! }, HookOptions::new())?;
//! hooks.on_help(&mut tree, deploy, |ctx| {
//!     writeln!(ctx.out(), "see also: rollback")?;
//!     Ok(())
//! }, HookOptions::new())?;
//!
//! let mut out: Vec<u8> = Vec::new();
//! tree.execute(&["deploy".to_string(), "prod".to_string()], &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "loading config\ndeploying prod\n");
//!
//! let mut out: Vec<u8> = Vec::new();
//! tree.execute(&["deploy".to_string(), "--help".to_string()], &mut out).unwrap();
//! let help = String::from_utf8(out).unwrap();
//! assert!(help.starts_with("loading config\nsee also: rollback\nUsage:"));
//! # Ok::<(), trellis_hooks::HookRegistrationError>(())
//! ```

mod adapter;
mod help;

pub mod api;
pub mod error;
pub mod options;
pub mod phase;
pub mod registry;
pub mod resolve;

pub use api::Hooks;
pub use error::{HookError, HookRegistrationError};
pub use options::HookOptions;
pub use phase::HookPhase;
pub use registry::{HookFn, HookRecord, HookRegistry};
pub use resolve::{HookChain, HookFilter};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::api::Hooks;
    pub use crate::error::{HookError, HookRegistrationError};
    pub use crate::options::HookOptions;
    pub use crate::phase::HookPhase;
    pub use crate::registry::{HookRecord, HookRegistry};
    pub use crate::resolve::{HookChain, HookFilter};
}
