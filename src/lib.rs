//! Multi-subscriber lifecycle hooks for command trees.
//!
//! See [`trellis_hooks`] for the hook engine and [`trellis_tree`] for the
//! command tree it plugs into.

pub use trellis_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use trellis_internal::prelude::*;
}
