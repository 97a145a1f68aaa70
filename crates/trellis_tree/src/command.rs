//! Command nodes and their callback slots.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::context::CommandContext;
use crate::phase::Phase;

/// Boxed error returned by delegates and help renderers.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Callback stored in a command's per-phase delegate slot.
pub type Delegate = Box<dyn Fn(&mut CommandContext<'_>) -> Result<(), BoxError> + Send + Sync>;

/// Callback stored in a command's help-render slot.
pub type HelpFn = Box<dyn Fn(&mut CommandContext<'_>) -> Result<(), BoxError> + Send + Sync>;

/// Unique identifier for a command within its [`CommandTree`](crate::CommandTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub(crate) usize);

impl CommandId {
    /// Creates a command ID from a raw index.
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd_{}", self.0)
    }
}

/// Process-unique identifier for a [`CommandTree`](crate::CommandTree).
///
/// [`CommandId`]s are plain indices and mean nothing outside their tree;
/// the tree ID tells trees apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(pub(crate) u64);

impl TreeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree_{}", self.0)
    }
}

/// A node in the command tree.
///
/// Each command owns at most one delegate per [`Phase`] and optionally a help
/// renderer. Parent and child links are indices into the owning tree.
pub struct Command {
    pub(crate) id: CommandId,
    pub(crate) name: String,
    pub(crate) about: String,
    pub(crate) parent: Option<CommandId>,
    pub(crate) children: Vec<CommandId>,
    pub(crate) delegates: [Option<Delegate>; 5],
    pub(crate) help_fn: Option<HelpFn>,
}

impl Command {
    pub(crate) fn new(id: CommandId, name: String, parent: Option<CommandId>) -> Self {
        Self {
            id,
            name,
            about: String::new(),
            parent,
            children: Vec::new(),
            delegates: Default::default(),
            help_fn: None,
        }
    }

    /// Returns the command's ID.
    #[must_use]
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// Returns the name used to select this command on the command line.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the one-line description shown in help output.
    #[must_use]
    pub fn about(&self) -> &str {
        &self.about
    }

    /// Returns the parent command, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    /// Returns the direct subcommands in insertion order.
    #[must_use]
    pub fn children(&self) -> &[CommandId] {
        &self.children
    }

    /// Returns true if a delegate occupies the slot for `phase`.
    #[must_use]
    pub fn has_delegate(&self, phase: Phase) -> bool {
        self.delegates[phase.slot()].is_some()
    }

    /// Returns the delegate for `phase`, if any.
    #[must_use]
    pub fn delegate(&self, phase: Phase) -> Option<&Delegate> {
        self.delegates[phase.slot()].as_ref()
    }

    /// A command is runnable when its [`Phase::Run`] slot is filled.
    #[must_use]
    pub fn is_runnable(&self) -> bool {
        self.has_delegate(Phase::Run)
    }

}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots: Vec<Phase> = Phase::ALL
            .into_iter()
            .filter(|phase| self.has_delegate(*phase))
            .collect();
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("delegates", &slots)
            .field("help_fn", &self.help_fn.is_some())
            .finish()
    }
}
