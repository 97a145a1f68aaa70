//! Per-invocation context handed to delegates, help renderers and hooks.

use std::io;

use crate::command::{Command, CommandId};
use crate::tree::CommandTree;

/// Everything a callback can see about the current invocation.
///
/// The context borrows the tree immutably, so callbacks can walk parents
/// and read sibling metadata, and borrows the caller's output channel
/// mutably for user-visible text.
pub struct CommandContext<'a> {
    tree: &'a CommandTree,
    command: CommandId,
    args: &'a [String],
    out: &'a mut dyn io::Write,
}

impl<'a> CommandContext<'a> {
    /// Creates a context for invoking `command` with `args`.
    #[must_use]
    pub fn new(
        tree: &'a CommandTree,
        command: CommandId,
        args: &'a [String],
        out: &'a mut dyn io::Write,
    ) -> Self {
        Self {
            tree,
            command,
            args,
            out,
        }
    }

    /// Returns the tree the invoked command belongs to.
    #[must_use]
    pub fn tree(&self) -> &'a CommandTree {
        self.tree
    }

    /// Returns the ID of the invoked command.
    #[must_use]
    pub fn command(&self) -> CommandId {
        self.command
    }

    /// Returns the invoked command node.
    #[must_use]
    pub fn node(&self) -> &'a Command {
        self.tree.command(self.command)
    }

    /// Returns the positional arguments left after subcommand routing.
    #[must_use]
    pub fn args(&self) -> &'a [String] {
        self.args
    }

    /// Returns the output channel for user-visible text.
    ///
    /// The channel borrows the whole context. Read arguments or the path
    /// first, or use [`split`](Self::split) to hold all of them at once.
    pub fn out(&mut self) -> &mut dyn io::Write {
        &mut *self.out
    }

    /// Splits the context into the invoked command, its arguments and the
    /// output channel.
    ///
    /// ```
    /// use trellis_tree::{CommandTree, Phase};
    ///
    /// let mut tree = CommandTree::new("app");
    /// let echo = tree.add_command(tree.root(), "echo");
    /// tree.set_delegate(echo, Phase::Run, Box::new(|ctx| {
    ///     let (node, args, out) = ctx.split();
    ///     writeln!(out, "{}: {}", node.name(), args.join(" "))?;
    ///     Ok(())
    /// }));
    ///
    /// let mut out: Vec<u8> = Vec::new();
    /// tree.execute(&["echo".to_string(), "hi".to_string()], &mut out).unwrap();
    /// assert_eq!(String::from_utf8(out).unwrap(), "echo: hi\n");
    /// ```
    pub fn split(&mut self) -> (&'a Command, &'a [String], &mut dyn io::Write) {
        (self.node(), self.args, &mut *self.out)
    }

    /// Returns the space separated path from the root to the invoked command.
    #[must_use]
    pub fn path(&self) -> String {
        self.tree.path(self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_exposes_node_args_and_output_together() {
        let mut tree = CommandTree::new("root");
        let child = tree.add_command(tree.root(), "child");
        let args = vec!["a".to_string(), "b".to_string()];
        let mut out: Vec<u8> = Vec::new();

        let mut ctx = CommandContext::new(&tree, child, &args, &mut out);
        let (node, rest, sink) = ctx.split();
        writeln!(sink, "{} {}", node.name(), rest.join(",")).unwrap();
        assert_eq!(ctx.path(), "root child");

        assert_eq!(out, b"child a,b\n");
    }
}
