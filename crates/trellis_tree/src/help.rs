//! Default help renderer.

use crate::command::{BoxError, HelpFn};
use crate::context::CommandContext;

/// Returns the renderer installed on every new tree's root.
#[must_use]
pub fn default_help_fn() -> HelpFn {
    Box::new(render_help)
}

/// Writes the usage text for the invoked command to the context's output.
///
/// ```text
/// <about>
///
/// Usage:
///   <path> [command]
///
/// Available Commands:
///   <name>  <about>
/// ```
pub fn render_help(ctx: &mut CommandContext<'_>) -> Result<(), BoxError> {
    let tree = ctx.tree();
    let node = ctx.node();
    let path = ctx.path();
    let out = ctx.out();

    if !node.about().is_empty() {
        writeln!(out, "{}", node.about())?;
        writeln!(out)?;
    }

    writeln!(out, "Usage:")?;
    if node.is_runnable() || node.children().is_empty() {
        writeln!(out, "  {} [args]", path)?;
    }
    if !node.children().is_empty() {
        writeln!(out, "  {} [command]", path)?;
        writeln!(out)?;
        writeln!(out, "Available Commands:")?;

        let width = node
            .children()
            .iter()
            .map(|child| tree.command(*child).name().len())
            .max()
            .unwrap_or(0);
        for child in node.children() {
            let child = tree.command(*child);
            writeln!(out, "  {:width$}  {}", child.name(), child.about())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::tree::CommandTree;

    #[test]
    fn lists_subcommands_aligned() {
        let mut tree = CommandTree::new("app");
        let root = tree.root();
        tree.set_about(root, "An app");
        let serve = tree.add_command(root, "serve");
        tree.set_about(serve, "Start the server");
        let db = tree.add_command(root, "db");
        tree.set_about(db, "Database tools");

        let mut out: Vec<u8> = Vec::new();
        tree.help(root, &[], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "An app\n\n\
             Usage:\n  app [command]\n\n\
             Available Commands:\n  serve  Start the server\n  db     Database tools\n"
        );
    }

    #[test]
    fn leaf_usage_uses_full_path() {
        let mut tree = CommandTree::new("app");
        let db = tree.add_command(tree.root(), "db");
        let migrate = tree.add_command(db, "migrate");

        let mut out: Vec<u8> = Vec::new();
        tree.help(migrate, &[], &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Usage:\n  app db migrate [args]\n"
        );
    }
}
