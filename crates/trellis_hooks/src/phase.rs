//! Hook points.
//!
//! Five hook points mirror the tree's lifecycle [`Phase`]s and share their
//! delegate slots. [`HookPhase::Help`] has no slot of its own; its hooks run
//! from the help pathway that wraps the root's help renderer.

use core::fmt;

use trellis_tree::Phase;

/// A point in a command's lifecycle that hooks can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookPhase {
    /// Before the invoked command's run, node-local.
    PreRun,
    /// The invoked command's main behavior, node-local.
    Run,
    /// After the invoked command's run, node-local.
    PostRun,
    /// Before pre-run, cascading from ancestors to the invoked command.
    PersistentPreRun,
    /// After post-run, cascading from ancestors to the invoked command.
    PersistentPostRun,
    /// When help is requested for a command.
    Help,
}

impl HookPhase {
    /// Every hook point.
    pub const ALL: [HookPhase; 6] = [
        HookPhase::PreRun,
        HookPhase::Run,
        HookPhase::PostRun,
        HookPhase::PersistentPreRun,
        HookPhase::PersistentPostRun,
        HookPhase::Help,
    ];

    /// Returns the delegate slot this hook point is served from.
    ///
    /// Help hooks return `None`.
    #[must_use]
    pub fn lifecycle(self) -> Option<Phase> {
        match self {
            HookPhase::PreRun => Some(Phase::PreRun),
            HookPhase::Run => Some(Phase::Run),
            HookPhase::PostRun => Some(Phase::PostRun),
            HookPhase::PersistentPreRun => Some(Phase::PersistentPreRun),
            HookPhase::PersistentPostRun => Some(Phase::PersistentPostRun),
            HookPhase::Help => None,
        }
    }

    /// Returns true for hook points whose hooks fire for descendants.
    #[must_use]
    pub fn is_cascading(self) -> bool {
        matches!(
            self,
            HookPhase::PersistentPreRun | HookPhase::PersistentPostRun
        )
    }

    /// Returns the hook point name in kebab case.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self.lifecycle() {
            Some(phase) => phase.name(),
            None => "help",
        }
    }
}

impl From<Phase> for HookPhase {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::PersistentPreRun => HookPhase::PersistentPreRun,
            Phase::PreRun => HookPhase::PreRun,
            Phase::Run => HookPhase::Run,
            Phase::PostRun => HookPhase::PostRun,
            Phase::PersistentPostRun => HookPhase::PersistentPostRun,
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
