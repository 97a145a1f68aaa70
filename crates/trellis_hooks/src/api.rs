//! Hook registration API.
//!
//! [`Hooks`] is the entry point for attaching hooks to a [`CommandTree`].
//! A tree carries exactly one [`HookRegistry`], created by the first
//! [`Hooks::attach`]; every handle attached to that tree shares it, so
//! independent subscribers see one ordered set of hooks and one adapter per
//! slot.
//!
//! # Example
//!
//! ```
//! use trellis_hooks::{HookOptions, Hooks};
//! use trellis_tree::{CommandTree, Phase};
//!
//! let mut tree = CommandTree::new("app");
//! let root = tree.root();
//! let child = tree.add_command(root, "child");
//! tree.set_delegate(child, Phase::Run, Box::new(|ctx| {
//!     writeln!(ctx.out(), "run")?;
//!     Ok(())
//! }));
//!
//! let hooks = Hooks::attach(&mut tree);
//! hooks.on_persistent_pre_run(&mut tree, root, |ctx| {
//!     writeln!(ctx.out(), "R")?;
//!     Ok(())
//! }, HookOptions::new())?;
//! hooks.on_persistent_pre_run(&mut tree, child, |ctx| {
//!     writeln!(ctx.out(), "C")?;
//!     Ok(())
//! }, HookOptions::new())?;
//! hooks.on_pre_run(&mut tree, child, |ctx| {
//!     writeln!(ctx.out(), "P")?;
//!     Ok(())
//! }, HookOptions::new())?;
//!
//! let mut out: Vec<u8> = Vec::new();
//! tree.execute(&["child".to_string()], &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "R\nC\nP\nrun\n");
//! # Ok::<(), trellis_hooks::HookRegistrationError>(())
//! ```

use std::sync::Arc;

use trellis_tree::{CommandContext, CommandId, CommandTree, TreeId};

use crate::adapter::install_adapter;
use crate::error::{HookError, HookRegistrationError};
use crate::help::install_help_pathway;
use crate::options::HookOptions;
use crate::phase::HookPhase;
use crate::registry::{HookRecord, HookRegistry};

/// Registration handle for one command tree.
///
/// Handles are cheap to clone. Registering through a handle on any tree
/// other than the one it was attached to fails with
/// [`HookRegistrationError::ForeignTree`].
#[derive(Debug, Clone)]
pub struct Hooks {
    tree: TreeId,
    registry: Arc<HookRegistry>,
}

impl Hooks {
    /// Returns a handle on `tree`'s registry, creating the registry if this is
    /// the tree's first handle.
    #[must_use]
    pub fn attach(tree: &mut CommandTree) -> Self {
        let registry = tree.extension_or_insert_with(HookRegistry::new);
        Self {
            tree: tree.id(),
            registry,
        }
    }

    /// Returns the tree this handle registers on.
    #[must_use]
    pub fn tree(&self) -> TreeId {
        self.tree
    }

    /// Returns the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Registers a pre-run hook on `command`.
    ///
    /// With [`persistent`](HookOptions::persistent) the hook is registered as
    /// a persistent-pre-run hook instead.
    pub fn on_pre_run<F>(
        &self,
        tree: &mut CommandTree,
        command: CommandId,
        hook: F,
        options: HookOptions,
    ) -> Result<(), HookRegistrationError>
    where
        F: Fn(&mut CommandContext<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let phase = if options.is_persistent() {
            HookPhase::PersistentPreRun
        } else {
            HookPhase::PreRun
        };
        self.register(tree, phase, command, Box::new(hook), options)
    }

    /// Registers a run hook on `command`.
    pub fn on_run<F>(
        &self,
        tree: &mut CommandTree,
        command: CommandId,
        hook: F,
        options: HookOptions,
    ) -> Result<(), HookRegistrationError>
    where
        F: Fn(&mut CommandContext<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.register(tree, HookPhase::Run, command, Box::new(hook), options)
    }

    /// Registers a post-run hook on `command`.
    ///
    /// With [`persistent`](HookOptions::persistent) the hook is registered as
    /// a persistent-post-run hook instead.
    pub fn on_post_run<F>(
        &self,
        tree: &mut CommandTree,
        command: CommandId,
        hook: F,
        options: HookOptions,
    ) -> Result<(), HookRegistrationError>
    where
        F: Fn(&mut CommandContext<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let phase = if options.is_persistent() {
            HookPhase::PersistentPostRun
        } else {
            HookPhase::PostRun
        };
        self.register(tree, phase, command, Box::new(hook), options)
    }

    /// Registers a pre-run hook on `command` that also fires, root first,
    /// for every descendant invoked.
    pub fn on_persistent_pre_run<F>(
        &self,
        tree: &mut CommandTree,
        command: CommandId,
        hook: F,
        options: HookOptions,
    ) -> Result<(), HookRegistrationError>
    where
        F: Fn(&mut CommandContext<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.register(
            tree,
            HookPhase::PersistentPreRun,
            command,
            Box::new(hook),
            options,
        )
    }

    /// Registers a post-run hook on `command` that also fires, root first,
    /// for every descendant invoked.
    pub fn on_persistent_post_run<F>(
        &self,
        tree: &mut CommandTree,
        command: CommandId,
        hook: F,
        options: HookOptions,
    ) -> Result<(), HookRegistrationError>
    where
        F: Fn(&mut CommandContext<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.register(
            tree,
            HookPhase::PersistentPostRun,
            command,
            Box::new(hook),
            options,
        )
    }

    /// Registers a hook that runs when help is requested for `command`.
    ///
    /// With [`persistent`](HookOptions::persistent) it also runs for help on
    /// any descendant.
    pub fn on_help<F>(
        &self,
        tree: &mut CommandTree,
        command: CommandId,
        hook: F,
        options: HookOptions,
    ) -> Result<(), HookRegistrationError>
    where
        F: Fn(&mut CommandContext<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.register(tree, HookPhase::Help, command, Box::new(hook), options)
    }

    /// Wraps the root's help renderer with the help pathway now.
    ///
    /// Registration does this on demand; calling it up front pins the
    /// renderer that gets wrapped. Later calls are no-ops, as is a call with
    /// a tree this handle is not attached to.
    pub fn install_help_pathway(&self, tree: &mut CommandTree) {
        if tree.id() == self.tree {
            install_help_pathway(tree, &self.registry);
        }
    }

    fn register(
        &self,
        tree: &mut CommandTree,
        phase: HookPhase,
        command: CommandId,
        hook: Box<dyn Fn(&mut CommandContext<'_>) -> Result<(), HookError> + Send + Sync>,
        options: HookOptions,
    ) -> Result<(), HookRegistrationError> {
        if tree.id() != self.tree {
            return Err(HookRegistrationError::ForeignTree {
                expected: self.tree,
                found: tree.id(),
            });
        }
        if !tree.contains(command) {
            return Err(HookRegistrationError::UnknownCommand { command });
        }

        let run_on_help = options.runs_on_help();
        let persistent = options.is_persistent();
        let record = HookRecord::new(command, hook, options.into_name(), run_on_help, persistent);
        tracing::debug!(
            command = %tree.path(command),
            %phase,
            hook = record.name().unwrap_or("<anonymous>"),
            run_on_help,
            persistent,
            "registering hook"
        );
        self.registry.insert(phase, record)?;

        if let Some(lifecycle) = phase.lifecycle() {
            install_adapter(tree, &self.registry, command, lifecycle);
        }
        if run_on_help || phase == HookPhase::Help {
            install_help_pathway(tree, &self.registry);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_tree::Phase;

    #[test]
    fn persistent_option_reroutes_pre_and_post_run() {
        let mut tree = CommandTree::new("root");
        let root = tree.root();
        let hooks = Hooks::attach(&mut tree);

        hooks
            .on_pre_run(&mut tree, root, |_| Ok(()), HookOptions::new().persistent())
            .unwrap();
        hooks
            .on_post_run(&mut tree, root, |_| Ok(()), HookOptions::new().persistent())
            .unwrap();

        let registry = hooks.registry();
        assert_eq!(registry.hooks_for(root, HookPhase::PreRun), 0);
        assert_eq!(registry.hooks_for(root, HookPhase::PersistentPreRun), 1);
        assert_eq!(registry.hooks_for(root, HookPhase::PostRun), 0);
        assert_eq!(registry.hooks_for(root, HookPhase::PersistentPostRun), 1);
        assert!(tree.has_delegate(root, Phase::PersistentPreRun));
        assert!(tree.has_delegate(root, Phase::PersistentPostRun));
        assert!(!tree.has_delegate(root, Phase::PreRun));
    }

    #[test]
    fn unknown_command_is_rejected() {
        let mut tree = CommandTree::new("root");
        let hooks = Hooks::attach(&mut tree);
        let stranger = CommandId::new(42);

        let result = hooks.on_run(&mut tree, stranger, |_| Ok(()), HookOptions::new());

        assert_eq!(
            result,
            Err(HookRegistrationError::UnknownCommand { command: stranger })
        );
        assert_eq!(hooks.registry().adapter_installs(), 0);
    }

    #[test]
    fn duplicate_label_leaves_slot_untouched() {
        let mut tree = CommandTree::new("root");
        let root = tree.root();
        let hooks = Hooks::attach(&mut tree);

        hooks
            .on_run(&mut tree, root, |_| Ok(()), HookOptions::new().named("main"))
            .unwrap();
        let result = hooks.on_run(&mut tree, root, |_| Ok(()), HookOptions::new().named("main"));

        assert!(matches!(
            result,
            Err(HookRegistrationError::DuplicateName { .. })
        ));
        assert_eq!(hooks.registry().hooks_for(root, HookPhase::Run), 1);
        assert_eq!(hooks.registry().adapter_installs(), 1);
    }

    #[test]
    fn help_pathway_installs_only_when_needed() {
        let mut tree = CommandTree::new("root");
        let root = tree.root();
        let hooks = Hooks::attach(&mut tree);

        hooks
            .on_pre_run(&mut tree, root, |_| Ok(()), HookOptions::new())
            .unwrap();
        assert!(!hooks.registry().help_installed());

        hooks
            .on_pre_run(&mut tree, root, |_| Ok(()), HookOptions::new().run_on_help())
            .unwrap();
        assert!(hooks.registry().help_installed());
    }

    #[test]
    fn handles_on_one_tree_share_its_registry() {
        let mut tree = CommandTree::new("root");
        let root = tree.root();
        let first = Hooks::attach(&mut tree);
        let second = Hooks::attach(&mut tree);

        first
            .on_run(&mut tree, root, |_| Ok(()), HookOptions::new())
            .unwrap();
        second
            .on_run(&mut tree, root, |_| Ok(()), HookOptions::new())
            .unwrap();

        assert!(core::ptr::eq(first.registry(), second.registry()));
        assert_eq!(first.registry().hooks_for(root, HookPhase::Run), 2);
        assert_eq!(second.registry().adapter_installs(), 1);
    }

    #[test]
    fn foreign_tree_is_rejected() {
        let mut home = CommandTree::new("home");
        let mut other = CommandTree::new("other");
        let hooks = Hooks::attach(&mut home);
        let other_root = other.root();

        let result = hooks.on_run(&mut other, other_root, |_| Ok(()), HookOptions::new());

        assert_eq!(
            result,
            Err(HookRegistrationError::ForeignTree {
                expected: home.id(),
                found: other.id(),
            })
        );
        assert_eq!(hooks.registry().hook_count(HookPhase::Run), 0);
        assert!(!other.has_delegate(other_root, Phase::Run));
    }

    #[test]
    fn help_registration_installs_pathway() {
        let mut tree = CommandTree::new("root");
        let child = tree.add_command(tree.root(), "child");
        let hooks = Hooks::attach(&mut tree);

        hooks
            .on_help(&mut tree, child, |_| Ok(()), HookOptions::new())
            .unwrap();

        assert!(hooks.registry().help_installed());
        assert_eq!(hooks.registry().adapter_installs(), 0);
    }
}
