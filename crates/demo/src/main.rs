//! Example command tree with independent hook subscribers.
//!
//! # Usage
//!
//! ```bash
//! trellis-demo serve 9000
//! trellis-demo db migrate 42
//! trellis-demo db migrate --help
//! TRELLIS_LOG=trellis_hooks=trace trellis-demo db migrate
//! ```

use std::io::Write;
use std::process::ExitCode;

use trellis_core::TracingConfig;
use trellis_hooks::{HookError, HookOptions, HookPhase, HookRegistrationError, Hooks};
use trellis_tree::CommandTree;

fn build_app() -> Result<CommandTree, HookRegistrationError> {
    let mut tree = CommandTree::new("app");
    let root = tree.root();
    tree.set_about(root, "Trellis demo application");

    let serve = tree.add_command(root, "serve");
    tree.set_about(serve, "Start the server");
    let db = tree.add_command(root, "db");
    tree.set_about(db, "Database tools");
    let migrate = tree.add_command(db, "migrate");
    tree.set_about(migrate, "Apply pending migrations");

    // Each handle stands in for an independent plugin; both feed the tree's
    // one registry.
    let hooks = Hooks::attach(&mut tree);
    let db_plugin = Hooks::attach(&mut tree);

    hooks.on_persistent_pre_run(
        &mut tree,
        root,
        |ctx| {
            writeln!(ctx.out(), "[config] profile=dev")?;
            Ok(())
        },
        HookOptions::new().run_on_help().named("config"),
    )?;
    hooks.on_persistent_post_run(
        &mut tree,
        root,
        |ctx| {
            let path = ctx.path();
            writeln!(ctx.out(), "[done] {path}")?;
            Ok(())
        },
        HookOptions::new().named("report"),
    )?;
    hooks.on_help(
        &mut tree,
        root,
        |ctx| {
            writeln!(ctx.out(), "Trellis demo")?;
            Ok(())
        },
        HookOptions::new().persistent().named("banner"),
    )?;

    hooks.on_run(
        &mut tree,
        serve,
        |ctx| {
            let port = ctx.args().first().map_or("8080", String::as_str);
            if port.parse::<u16>().is_err() {
                return Err(HookError::new(format!("invalid port '{port}'")));
            }
            writeln!(ctx.out(), "serving on port {port}")?;
            Ok(())
        },
        HookOptions::new().named("serve"),
    )?;

    db_plugin.on_persistent_pre_run(
        &mut tree,
        db,
        |ctx| {
            writeln!(ctx.out(), "[db] connected")?;
            Ok(())
        },
        HookOptions::new().named("connect"),
    )?;
    db_plugin.on_pre_run(
        &mut tree,
        migrate,
        |ctx| {
            writeln!(ctx.out(), "[db] migration lock acquired")?;
            Ok(())
        },
        HookOptions::new().named("lock"),
    )?;
    db_plugin.on_run(
        &mut tree,
        migrate,
        |ctx| {
            let (_, args, out) = ctx.split();
            match args.first() {
                Some(target) => writeln!(out, "migrating to version {target}")?,
                None => writeln!(out, "migrating to latest")?,
            }
            Ok(())
        },
        HookOptions::new().named("migrate"),
    )?;
    db_plugin.on_help(
        &mut tree,
        migrate,
        |ctx| {
            writeln!(ctx.out(), "Migrations are read from ./migrations")?;
            Ok(())
        },
        HookOptions::new().named("migrate-help"),
    )?;

    tracing::debug!(
        pre_run_hooks = hooks.registry().hook_count(HookPhase::PersistentPreRun),
        adapters = hooks.registry().adapter_installs(),
        "demo app assembled"
    );

    Ok(tree)
}

fn main() -> ExitCode {
    TracingConfig::from_env().init();

    let tree = match build_app() {
        Ok(tree) => tree,
        Err(error) => {
            eprintln!("Error: {error}");
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut stdout = std::io::stdout().lock();

    match tree.execute(&args, &mut stdout) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            if let Err(flush_error) = stdout.flush() {
                eprintln!("Error: failed to flush output: {flush_error}");
            }
            eprintln!("Error: {error}");
            if let Some(cause) = error.cause() {
                eprintln!("  caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}
