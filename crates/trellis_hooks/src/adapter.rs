//! Lifecycle adapters: the single delegate per slot that fans out to hooks.

use std::sync::Arc;

use trellis_tree::{CommandId, CommandTree, Phase};

use crate::registry::HookRegistry;
use crate::resolve::resolve;

/// Installs the adapter for `command` and `phase` unless one is already there.
///
/// A delegate already occupying the slot is kept and called after the hooks
/// succeed, so the tree's own callback is not clobbered. A failing hook
/// skips it.
pub(crate) fn install_adapter(
    tree: &mut CommandTree,
    registry: &Arc<HookRegistry>,
    command: CommandId,
    phase: Phase,
) {
    if !registry.mark_adapter(command, phase.into()) {
        return;
    }

    let previous = tree.take_delegate(command, phase);
    tracing::debug!(
        command = %tree.path(command),
        %phase,
        wraps_existing = previous.is_some(),
        "installing hook adapter"
    );

    let registry = Arc::clone(registry);
    tree.set_delegate(
        command,
        phase,
        Box::new(move |ctx| {
            // Cascading phases resolve from the invoked command, which may be
            // a descendant of the adapter's owner.
            let chain = resolve(&registry, ctx.tree(), ctx.command(), phase.into());
            chain.run(ctx)?;
            if let Some(previous) = &previous {
                previous(ctx)?;
            }
            Ok(())
        }),
    );
}
