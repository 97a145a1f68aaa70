//! The help pathway.
//!
//! Help requests bypass the lifecycle entirely, so hooks that must also run
//! for help (`run_on_help`) and dedicated help hooks are served by wrapping
//! the root's help renderer once. Every command that inherits the root's
//! renderer goes through the wrapper:
//!
//! 1. persistent-pre-run hooks flagged `run_on_help`, root first
//! 2. the target's own pre-run hooks flagged `run_on_help`
//! 3. the target's help hooks, then persistent help hooks of its ancestors
//! 4. the original renderer
//!
//! A failing hook aborts the request before any help text is rendered.

use std::sync::Arc;

use trellis_tree::{CommandTree, default_help_fn};

use crate::registry::HookRegistry;
use crate::resolve::resolve_help;

/// Wraps the root's help renderer unless this registry already did.
pub(crate) fn install_help_pathway(tree: &mut CommandTree, registry: &Arc<HookRegistry>) {
    if !registry.mark_help_installed() {
        return;
    }

    let root = tree.root();
    let original = tree.take_help_fn(root).unwrap_or_else(default_help_fn);
    tracing::debug!(root = %tree.path(root), "installing help pathway");

    let registry = Arc::clone(registry);
    tree.set_help_fn(
        root,
        Box::new(move |ctx| {
            resolve_help(&registry, ctx.tree(), ctx.command()).run(ctx)?;
            original(ctx)
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HookError;
    use crate::phase::HookPhase;
    use crate::registry::HookRecord;
    use trellis_tree::CommandError;

    fn help_hook(owner: trellis_tree::CommandId, text: &'static str) -> HookRecord {
        HookRecord::new(
            owner,
            Box::new(move |ctx| {
                writeln!(ctx.out(), "{text}")?;
                Ok(())
            }),
            None,
            false,
            false,
        )
    }

    #[test]
    fn wraps_root_renderer_once() {
        let mut tree = CommandTree::new("root");
        let root = tree.root();
        tree.set_help_fn(
            root,
            Box::new(|ctx| {
                writeln!(ctx.out(), "usage")?;
                Ok(())
            }),
        );
        let registry = Arc::new(HookRegistry::new());
        registry
            .insert(HookPhase::Help, help_hook(root, "hook"))
            .unwrap();

        install_help_pathway(&mut tree, &registry);
        install_help_pathway(&mut tree, &registry);

        let mut out: Vec<u8> = Vec::new();
        tree.help(root, &[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hook\nusage\n");
    }

    #[test]
    fn failure_suppresses_help_text() {
        let mut tree = CommandTree::new("root");
        let root = tree.root();
        let registry = Arc::new(HookRegistry::new());
        registry
            .insert(HookPhase::Help, help_hook(root, "partial"))
            .unwrap();
        registry
            .insert(
                HookPhase::Help,
                HookRecord::new(
                    root,
                    Box::new(|_| Err(HookError::new("no help for you"))),
                    None,
                    false,
                    false,
                ),
            )
            .unwrap();
        install_help_pathway(&mut tree, &registry);

        let mut out: Vec<u8> = Vec::new();
        let err = tree.help(root, &[], &mut out).unwrap_err();

        assert!(matches!(err, CommandError::Help { .. }));
        assert_eq!(String::from_utf8(out).unwrap(), "partial\n");
    }
}
