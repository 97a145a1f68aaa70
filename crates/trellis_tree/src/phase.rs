//! Lifecycle phases of a command invocation.

use core::fmt;

/// A lifecycle phase with its own delegate slot on every [`Command`](crate::Command).
///
/// The tree runs the phases of an invocation in the order of [`Phase::ALL`].
/// Persistent phases are looked up on the invoked command first and then on
/// its ancestors; the nearest delegate wins. Node-local phases only consult
/// the invoked command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Runs before [`PreRun`](Self::PreRun); inherited by descendants.
    PersistentPreRun,
    /// Runs before [`Run`](Self::Run) on the invoked command only.
    PreRun,
    /// The command's main behavior.
    Run,
    /// Runs after [`Run`](Self::Run) on the invoked command only.
    PostRun,
    /// Runs after [`PostRun`](Self::PostRun); inherited by descendants.
    PersistentPostRun,
}

impl Phase {
    /// Every phase, in execution order.
    pub const ALL: [Phase; 5] = [
        Phase::PersistentPreRun,
        Phase::PreRun,
        Phase::Run,
        Phase::PostRun,
        Phase::PersistentPostRun,
    ];

    /// Returns true for phases that descendants inherit.
    #[must_use]
    pub fn is_persistent(self) -> bool {
        matches!(self, Phase::PersistentPreRun | Phase::PersistentPostRun)
    }

    /// Returns the phase name in kebab case.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Phase::PersistentPreRun => "persistent-pre-run",
            Phase::PreRun => "pre-run",
            Phase::Run => "run",
            Phase::PostRun => "post-run",
            Phase::PersistentPostRun => "persistent-post-run",
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_distinct_and_dense() {
        let slots: Vec<usize> = Phase::ALL.iter().map(|phase| phase.slot()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn only_outer_phases_are_persistent() {
        let persistent: Vec<Phase> = Phase::ALL
            .into_iter()
            .filter(|phase| phase.is_persistent())
            .collect();
        assert_eq!(
            persistent,
            vec![Phase::PersistentPreRun, Phase::PersistentPostRun]
        );
    }

    #[test]
    fn display_uses_kebab_case() {
        assert_eq!(Phase::PersistentPostRun.to_string(), "persistent-post-run");
        assert_eq!(Phase::Run.to_string(), "run");
    }
}
