//! Resolution of the ordered hook sequence for an invocation.
//!
//! Every function here is pure over a [`HookRegistry`] and a
//! [`CommandTree`]: it reads the records, walks parent links where needed,
//! and returns a [`HookChain`] without running anything.
//!
//! # Ordering
//!
//! - Node-local hook points: the invoked command's records, registration order.
//! - Cascading hook points: commands from the root down to the invoked one,
//!   each contributing its records in registration order.
//! - Help: the cascading pre-run chain and the invoked command's pre-run
//!   hooks (both limited to `run_on_help`), then help hooks from the invoked
//!   command up to the root, where ancestors only contribute persistent ones.

use std::sync::Arc;

use trellis_tree::{CommandContext, CommandId, CommandTree};

use crate::error::HookError;
use crate::phase::HookPhase;
use crate::registry::{HookRecord, HookRegistry};

/// An ordered sequence of hooks resolved for one invocation.
#[derive(Debug, Default, Clone)]
pub struct HookChain {
    hooks: Vec<(HookPhase, Arc<HookRecord>)>,
}

impl HookChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn extend(&mut self, phase: HookPhase, records: impl IntoIterator<Item = Arc<HookRecord>>) {
        self.hooks
            .extend(records.into_iter().map(|record| (phase, record)));
    }

    fn append(&mut self, mut other: HookChain) {
        self.hooks.append(&mut other.hooks);
    }

    /// Returns the number of hooks in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if the chain has no hooks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Iterates over the records in execution order.
    pub fn records(&self) -> impl Iterator<Item = &HookRecord> {
        self.hooks.iter().map(|(_, record)| record.as_ref())
    }

    /// Returns the labels of the hooks in execution order; unlabelled hooks
    /// are reported as `"<anonymous>"`.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.records()
            .map(|record| record.name().unwrap_or("<anonymous>"))
            .collect()
    }

    /// Runs the hooks in order, stopping at the first failure.
    ///
    /// Hooks that ran before the failure keep their side effects; none after
    /// it run.
    pub fn run(&self, ctx: &mut CommandContext<'_>) -> Result<(), HookError> {
        for (phase, record) in &self.hooks {
            tracing::trace!(
                %phase,
                hook = record.name().unwrap_or("<anonymous>"),
                owner = %record.owner(),
                command = %ctx.command(),
                "invoking hook"
            );
            if let Err(error) = record.invoke(ctx) {
                tracing::debug!(
                    %phase,
                    hook = record.name().unwrap_or("<anonymous>"),
                    command = %ctx.path(),
                    %error,
                    "hook failed, aborting chain"
                );
                return Err(error);
            }
        }
        Ok(())
    }
}

/// Which records a resolver keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookFilter {
    /// Every record.
    All,
    /// Only records registered with `run_on_help`.
    RunOnHelp,
}

impl HookFilter {
    fn keeps(self, record: &HookRecord) -> bool {
        match self {
            HookFilter::All => true,
            HookFilter::RunOnHelp => record.runs_on_help(),
        }
    }
}

fn filtered(
    registry: &HookRegistry,
    command: CommandId,
    phase: HookPhase,
    filter: HookFilter,
) -> impl Iterator<Item = Arc<HookRecord>> {
    registry
        .records(command, phase)
        .into_iter()
        .filter(move |record| filter.keeps(record))
}

/// Returns `command` and its ancestors ordered from the root down.
fn lineage(tree: &CommandTree, command: CommandId) -> Vec<CommandId> {
    let mut lineage: Vec<CommandId> = tree.ancestry(command).collect();
    lineage.reverse();
    lineage
}

/// Resolves hooks owned by exactly `command` for `phase`.
#[must_use]
pub fn resolve_local(
    registry: &HookRegistry,
    command: CommandId,
    phase: HookPhase,
    filter: HookFilter,
) -> HookChain {
    let mut chain = HookChain::new();
    chain.extend(phase, filtered(registry, command, phase, filter));
    chain
}

/// Resolves the cascading chain for `phase`: root's hooks first, the invoked
/// command's last, each command's hooks in registration order.
#[must_use]
pub fn resolve_cascade(
    registry: &HookRegistry,
    tree: &CommandTree,
    command: CommandId,
    phase: HookPhase,
    filter: HookFilter,
) -> HookChain {
    let mut chain = HookChain::new();
    for node in lineage(tree, command) {
        chain.extend(phase, filtered(registry, node, phase, filter));
    }
    chain
}

/// Resolves the persistent-pre-run chain for an invocation of `command`.
///
/// For root→A→B with r1 on root, r2 and r3 on A and r4 on B, invoking B
/// yields r1, r2, r3, r4.
#[must_use]
pub fn resolve_persistent_pre_run(
    registry: &HookRegistry,
    tree: &CommandTree,
    command: CommandId,
    filter: HookFilter,
) -> HookChain {
    resolve_cascade(registry, tree, command, HookPhase::PersistentPreRun, filter)
}

/// Resolves the persistent-post-run chain for an invocation of `command`.
#[must_use]
pub fn resolve_persistent_post_run(
    registry: &HookRegistry,
    tree: &CommandTree,
    command: CommandId,
) -> HookChain {
    resolve_cascade(
        registry,
        tree,
        command,
        HookPhase::PersistentPostRun,
        HookFilter::All,
    )
}

/// Resolves help hooks for a help request on `command`.
///
/// The invoked command's help hooks are always included; an ancestor's only
/// if registered as persistent. Order runs from the invoked command upward.
#[must_use]
pub fn resolve_help_hooks(
    registry: &HookRegistry,
    tree: &CommandTree,
    command: CommandId,
) -> HookChain {
    let mut chain = HookChain::new();
    for node in tree.ancestry(command) {
        let is_ancestor = node != command;
        chain.extend(
            HookPhase::Help,
            registry
                .records(node, HookPhase::Help)
                .into_iter()
                .filter(|record| !is_ancestor || record.is_persistent()),
        );
    }
    chain
}

/// Resolves everything the help pathway runs before the original renderer.
#[must_use]
pub fn resolve_help(registry: &HookRegistry, tree: &CommandTree, command: CommandId) -> HookChain {
    let mut chain = resolve_persistent_pre_run(registry, tree, command, HookFilter::RunOnHelp);
    chain.append(resolve_local(
        registry,
        command,
        HookPhase::PreRun,
        HookFilter::RunOnHelp,
    ));
    chain.append(resolve_help_hooks(registry, tree, command));
    chain
}

/// Resolves the chain an adapter runs for `phase` when `command` is invoked.
#[must_use]
pub fn resolve(
    registry: &HookRegistry,
    tree: &CommandTree,
    command: CommandId,
    phase: HookPhase,
) -> HookChain {
    match phase {
        HookPhase::PreRun | HookPhase::Run | HookPhase::PostRun => {
            resolve_local(registry, command, phase, HookFilter::All)
        }
        HookPhase::PersistentPreRun => {
            resolve_persistent_pre_run(registry, tree, command, HookFilter::All)
        }
        HookPhase::PersistentPostRun => resolve_persistent_post_run(registry, tree, command),
        HookPhase::Help => resolve_help(registry, tree, command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(
        registry: &HookRegistry,
        phase: HookPhase,
        owner: CommandId,
        name: &str,
        run_on_help: bool,
        persistent: bool,
    ) {
        registry
            .insert(
                phase,
                HookRecord::new(
                    owner,
                    Box::new(|_| Ok(())),
                    Some(name.to_owned()),
                    run_on_help,
                    persistent,
                ),
            )
            .unwrap();
    }

    fn chain_root_a_b() -> (CommandTree, CommandId, CommandId, CommandId) {
        let mut tree = CommandTree::new("root");
        let root = tree.root();
        let a = tree.add_command(root, "a");
        let b = tree.add_command(a, "b");
        (tree, root, a, b)
    }

    #[test]
    fn local_hooks_only_match_their_owner() {
        let (tree, root, a, _) = chain_root_a_b();
        let registry = HookRegistry::new();
        add(&registry, HookPhase::Run, root, "root-run", false, false);
        add(&registry, HookPhase::Run, a, "a-run-1", false, false);
        add(&registry, HookPhase::Run, a, "a-run-2", false, false);

        assert_eq!(
            resolve(&registry, &tree, a, HookPhase::Run).names(),
            vec!["a-run-1", "a-run-2"]
        );
        assert_eq!(
            resolve(&registry, &tree, root, HookPhase::Run).names(),
            vec!["root-run"]
        );
    }

    #[test]
    fn persistent_pre_run_orders_root_first() {
        let (tree, root, a, b) = chain_root_a_b();
        let registry = HookRegistry::new();
        add(&registry, HookPhase::PersistentPreRun, root, "r1", false, false);
        add(&registry, HookPhase::PersistentPreRun, a, "r2", false, false);
        add(&registry, HookPhase::PersistentPreRun, a, "r3", false, false);
        add(&registry, HookPhase::PersistentPreRun, b, "r4", false, false);

        assert_eq!(
            resolve(&registry, &tree, b, HookPhase::PersistentPreRun).names(),
            vec!["r1", "r2", "r3", "r4"]
        );
        assert_eq!(
            resolve(&registry, &tree, a, HookPhase::PersistentPreRun).names(),
            vec!["r1", "r2", "r3"]
        );
    }

    #[test]
    fn interleaved_registration_keeps_per_command_order() {
        let (tree, root, _, b) = chain_root_a_b();
        let registry = HookRegistry::new();
        add(&registry, HookPhase::PersistentPreRun, b, "b1", false, false);
        add(&registry, HookPhase::PersistentPreRun, root, "r1", false, false);
        add(&registry, HookPhase::PersistentPreRun, b, "b2", false, false);
        add(&registry, HookPhase::PersistentPreRun, root, "r2", false, false);

        assert_eq!(
            resolve(&registry, &tree, b, HookPhase::PersistentPreRun).names(),
            vec!["r1", "r2", "b1", "b2"]
        );
    }

    #[test]
    fn persistent_post_run_orders_root_first() {
        let (tree, root, a, b) = chain_root_a_b();
        let registry = HookRegistry::new();
        add(&registry, HookPhase::PersistentPostRun, b, "b", false, false);
        add(&registry, HookPhase::PersistentPostRun, root, "r1", false, false);
        add(&registry, HookPhase::PersistentPostRun, a, "a", false, false);
        add(&registry, HookPhase::PersistentPostRun, root, "r2", false, false);

        assert_eq!(
            resolve(&registry, &tree, b, HookPhase::PersistentPostRun).names(),
            vec!["r1", "r2", "a", "b"]
        );
    }

    #[test]
    fn help_resolution_filters_and_orders() {
        let (tree, root, a, b) = chain_root_a_b();
        let registry = HookRegistry::new();
        add(&registry, HookPhase::PersistentPreRun, root, "pp-root", true, false);
        add(&registry, HookPhase::PersistentPreRun, root, "pp-root-quiet", false, false);
        add(&registry, HookPhase::PersistentPreRun, b, "pp-b", true, false);
        add(&registry, HookPhase::PreRun, b, "pre-b", true, false);
        add(&registry, HookPhase::PreRun, b, "pre-b-quiet", false, false);
        add(&registry, HookPhase::PreRun, a, "pre-a", true, false);
        add(&registry, HookPhase::Help, root, "help-root", false, true);
        add(&registry, HookPhase::Help, a, "help-a-local", false, false);
        add(&registry, HookPhase::Help, a, "help-a", false, true);
        add(&registry, HookPhase::Help, b, "help-b", false, false);

        assert_eq!(
            resolve_help(&registry, &tree, b).names(),
            vec!["pp-root", "pp-b", "pre-b", "help-b", "help-a", "help-root"]
        );
        assert_eq!(
            resolve_help(&registry, &tree, a).names(),
            vec!["pp-root", "pre-a", "help-a-local", "help-a", "help-root"]
        );
    }

    #[test]
    fn empty_registry_resolves_empty_chains() {
        let (tree, _, _, b) = chain_root_a_b();
        let registry = HookRegistry::new();
        for phase in HookPhase::ALL {
            assert!(resolve(&registry, &tree, b, phase).is_empty());
        }
    }
}
