//! # Trellis Internal Library
//!
//! Re-exports the Trellis crates for convenience.

/// Command tree: routing, lifecycle delegates and help rendering.
pub use trellis_tree;

/// Multi-subscriber hooks layered over the command tree.
pub use trellis_hooks;

/// Logging setup.
pub use trellis_core;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use trellis_core::{TracingConfig, TracingFormat};
    pub use trellis_hooks::prelude::*;
    pub use trellis_tree::prelude::*;
}
