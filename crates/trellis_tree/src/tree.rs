//! The command tree and its execution driver.

use core::any::{Any, TypeId};
use std::io;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::command::{Command, CommandId, Delegate, HelpFn, TreeId};
use crate::context::CommandContext;
use crate::error::CommandError;
use crate::help::{default_help_fn, render_help};
use crate::phase::Phase;

/// Arguments that turn an invocation into a help request.
pub const HELP_FLAGS: [&str; 2] = ["-h", "--help"];

/// A tree of commands rooted at a single root command.
///
/// The tree owns every [`Command`]; parent and child links are
/// [`CommandId`] indices. Each command exposes exactly one delegate slot per
/// [`Phase`] and one help-render slot, which is all the extension surface the
/// tree offers.
///
/// # Example
///
/// ```
/// use trellis_tree::{CommandTree, Phase};
///
/// let mut tree = CommandTree::new("app");
/// let serve = tree.add_command(tree.root(), "serve");
/// tree.set_delegate(serve, Phase::Run, Box::new(|ctx| {
///     let port = ctx.args().join(" ");
///     writeln!(ctx.out(), "serving {port}")?;
///     Ok(())
/// }));
///
/// let mut out: Vec<u8> = Vec::new();
/// let args = ["serve".to_string(), "8080".to_string()];
/// tree.execute(&args, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "serving 8080\n");
/// ```
#[derive(Debug)]
pub struct CommandTree {
    id: TreeId,
    commands: Vec<Command>,
    /// Shared state attached by extensions, one value per type.
    extensions: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl CommandTree {
    /// Creates a tree holding only a root command named `name`.
    ///
    /// The root starts with the [default help renderer](crate::render_help).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut root = Command::new(CommandId(0), name.into(), None);
        root.help_fn = Some(default_help_fn());
        Self {
            id: TreeId::next(),
            commands: vec![root],
            extensions: HashMap::new(),
        }
    }

    /// Returns the tree's process-unique ID.
    #[must_use]
    pub fn id(&self) -> TreeId {
        self.id
    }

    /// Returns the root command's ID.
    #[must_use]
    pub fn root(&self) -> CommandId {
        CommandId(0)
    }

    /// Adds a subcommand under `parent` and returns its ID.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_command(&mut self, parent: CommandId, name: impl Into<String>) -> CommandId {
        assert!(
            parent.0 < self.commands.len(),
            "parent {parent} does not belong to this tree"
        );
        let id = CommandId(self.commands.len());
        self.commands.push(Command::new(id, name.into(), Some(parent)));
        self.commands[parent.0].children.push(id);
        id
    }

    /// Sets the one-line description shown in help output.
    pub fn set_about(&mut self, id: CommandId, about: impl Into<String>) {
        self.command_mut(id).about = about.into();
    }

    /// Gets a command by ID.
    #[must_use]
    pub fn get(&self, id: CommandId) -> Option<&Command> {
        self.commands.get(id.0)
    }

    /// Returns true if `id` belongs to this tree.
    #[must_use]
    pub fn contains(&self, id: CommandId) -> bool {
        id.0 < self.commands.len()
    }

    /// Returns the command with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn command(&self, id: CommandId) -> &Command {
        &self.commands[id.0]
    }

    fn command_mut(&mut self, id: CommandId) -> &mut Command {
        &mut self.commands[id.0]
    }

    /// Returns the number of commands, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Always false: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the parent of `id`, or `None` for the root.
    #[must_use]
    pub fn parent(&self, id: CommandId) -> Option<CommandId> {
        self.get(id).and_then(Command::parent)
    }

    /// Iterates from `id` up to the root, both inclusive.
    pub fn ancestry(&self, id: CommandId) -> Ancestry<'_> {
        Ancestry {
            tree: self,
            next: self.contains(id).then_some(id),
        }
    }

    /// Returns the number of ancestors of `id`; the root has depth zero.
    #[must_use]
    pub fn depth(&self, id: CommandId) -> usize {
        self.ancestry(id).count().saturating_sub(1)
    }

    /// Returns the space separated command names from the root to `id`.
    #[must_use]
    pub fn path(&self, id: CommandId) -> String {
        let mut names: Vec<&str> = self
            .ancestry(id)
            .map(|ancestor| self.command(ancestor).name())
            .collect();
        names.reverse();
        names.join(" ")
    }

    /// Finds the command selected by the leading arguments.
    ///
    /// Arguments are consumed while they name a child of the current
    /// command; the rest are returned as positional arguments.
    #[must_use]
    pub fn find<'a>(&self, args: &'a [String]) -> (CommandId, &'a [String]) {
        let mut current = self.root();
        let mut consumed = 0;
        for arg in args {
            match self.child_named(current, arg) {
                Some(child) => {
                    current = child;
                    consumed += 1;
                }
                None => break,
            }
        }
        (current, &args[consumed..])
    }

    /// Resolves a path of subcommand names below the root.
    pub fn find_path(&self, names: &[&str]) -> Result<CommandId, CommandError> {
        let mut current = self.root();
        for name in names {
            current = self
                .child_named(current, name)
                .ok_or_else(|| CommandError::UnknownCommand {
                    path: names.join(" "),
                })?;
        }
        Ok(current)
    }

    fn child_named(&self, id: CommandId, name: &str) -> Option<CommandId> {
        self.command(id)
            .children()
            .iter()
            .copied()
            .find(|child| self.command(*child).name() == name)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Slots
    // ─────────────────────────────────────────────────────────────────────────

    /// Fills the delegate slot for `phase`, returning the previous occupant.
    pub fn set_delegate(
        &mut self,
        id: CommandId,
        phase: Phase,
        delegate: Delegate,
    ) -> Option<Delegate> {
        self.command_mut(id).delegates[phase.slot()].replace(delegate)
    }

    /// Empties the delegate slot for `phase`, returning its occupant.
    pub fn take_delegate(&mut self, id: CommandId, phase: Phase) -> Option<Delegate> {
        self.command_mut(id).delegates[phase.slot()].take()
    }

    /// Returns true if `id` has a delegate for `phase`.
    #[must_use]
    pub fn has_delegate(&self, id: CommandId, phase: Phase) -> bool {
        self.get(id).is_some_and(|command| command.has_delegate(phase))
    }

    /// Overrides the help renderer for `id` and its descendants.
    pub fn set_help_fn(&mut self, id: CommandId, help_fn: HelpFn) -> Option<HelpFn> {
        self.command_mut(id).help_fn.replace(help_fn)
    }

    /// Removes the help renderer override from `id`.
    pub fn take_help_fn(&mut self, id: CommandId) -> Option<HelpFn> {
        self.command_mut(id).help_fn.take()
    }

    /// Returns the renderer used for `id`: its own, or the nearest ancestor's.
    #[must_use]
    pub fn help_fn(&self, id: CommandId) -> Option<&HelpFn> {
        self.ancestry(id)
            .find_map(|ancestor| self.command(ancestor).help_fn.as_ref())
    }

    /// Returns the nearest delegate for a persistent `phase`, or the
    /// command's own delegate for a node-local one.
    fn delegate_for(&self, id: CommandId, phase: Phase) -> Option<(CommandId, &Delegate)> {
        if phase.is_persistent() {
            self.ancestry(id).find_map(|ancestor| {
                self.command(ancestor)
                    .delegate(phase)
                    .map(|delegate| (ancestor, delegate))
            })
        } else {
            self.command(id).delegate(phase).map(|delegate| (id, delegate))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Extensions
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the extension value of type `T`, if one is attached.
    #[must_use]
    pub fn extension<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let value = self.extensions.get(&TypeId::of::<T>())?;
        Arc::clone(value).downcast::<T>().ok()
    }

    /// Returns the extension value of type `T`, attaching `init()` first if
    /// the tree has none.
    ///
    /// Every caller asking for the same type gets the same shared value, which
    /// lives as long as the tree.
    pub fn extension_or_insert_with<T: Any + Send + Sync>(
        &mut self,
        init: impl FnOnce() -> T,
    ) -> Arc<T> {
        if let Some(existing) = self.extension::<T>() {
            return existing;
        }
        let value = Arc::new(init());
        let erased: Arc<dyn Any + Send + Sync> = Arc::<T>::clone(&value);
        self.extensions.insert(TypeId::of::<T>(), erased);
        value
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Routes `args` to a command and runs it.
    ///
    /// If any of [`HELP_FLAGS`] is present, or the selected command is not
    /// runnable, the help renderer runs instead of the lifecycle. Otherwise
    /// the phases run in [`Phase::ALL`] order and the first failing delegate
    /// stops the invocation.
    ///
    /// Returns the ID of the command that was selected.
    pub fn execute(
        &self,
        args: &[String],
        out: &mut dyn io::Write,
    ) -> Result<CommandId, CommandError> {
        let (id, rest) = self.find(args);

        if rest.iter().any(|arg| HELP_FLAGS.contains(&arg.as_str())) {
            let rest: Vec<String> = rest
                .iter()
                .filter(|arg| !HELP_FLAGS.contains(&arg.as_str()))
                .cloned()
                .collect();
            self.help(id, &rest, out)?;
            return Ok(id);
        }

        if !self.command(id).is_runnable() {
            tracing::debug!(command = %self.path(id), "command is not runnable, showing help");
            self.help(id, rest, out)?;
            return Ok(id);
        }

        self.run(id, rest, out)?;
        Ok(id)
    }

    /// Runs every lifecycle phase of `id` with `args`.
    pub fn run(
        &self,
        id: CommandId,
        args: &[String],
        out: &mut dyn io::Write,
    ) -> Result<(), CommandError> {
        tracing::debug!(command = %self.path(id), args = ?args, "executing command");

        let mut ctx = CommandContext::new(self, id, args, out);
        for phase in Phase::ALL {
            let Some((owner, delegate)) = self.delegate_for(id, phase) else {
                continue;
            };
            tracing::trace!(%phase, owner = %self.path(owner), "invoking delegate");
            delegate(&mut ctx).map_err(|source| CommandError::PhaseFailed {
                command: self.path(id),
                phase,
                source,
            })?;
        }
        Ok(())
    }

    /// Invokes the help renderer for `id`.
    pub fn help(
        &self,
        id: CommandId,
        args: &[String],
        out: &mut dyn io::Write,
    ) -> Result<(), CommandError> {
        tracing::debug!(command = %self.path(id), "rendering help");

        let mut ctx = CommandContext::new(self, id, args, out);
        let result = match self.help_fn(id) {
            Some(help_fn) => help_fn(&mut ctx),
            None => render_help(&mut ctx),
        };
        result.map_err(|source| CommandError::Help {
            command: self.path(id),
            source,
        })
    }
}

/// Iterator over a command and its ancestors, ending at the root.
#[derive(Debug, Clone)]
pub struct Ancestry<'a> {
    tree: &'a CommandTree,
    next: Option<CommandId>,
}

impl Iterator for Ancestry<'_> {
    type Item = CommandId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.command(current).parent();
        Some(current)
    }
}
