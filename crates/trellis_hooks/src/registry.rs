//! Hook records and the registry that stores them.
//!
//! The registry keeps one ordered list per (command, hook point), so
//! registration order within a command is preserved directly and resolution
//! never has to reorder records. It also carries the install markers for
//! adapters and the help pathway. Each tree holds one registry as an
//! extension, so the markers and records live exactly as long as the tree.

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;
use trellis_tree::{CommandContext, CommandId};

use crate::error::{HookError, HookRegistrationError};
use crate::phase::HookPhase;

/// Signature of a hook callback.
pub type HookFn = dyn Fn(&mut CommandContext<'_>) -> Result<(), HookError> + Send + Sync;

// ─────────────────────────────────────────────────────────────────────────────
// HookRecord
// ─────────────────────────────────────────────────────────────────────────────

/// A registered hook. Immutable once created.
pub struct HookRecord {
    owner: CommandId,
    name: Option<String>,
    callback: Box<HookFn>,
    run_on_help: bool,
    persistent: bool,
}

impl HookRecord {
    /// Creates a record owned by `owner`.
    #[must_use]
    pub fn new(
        owner: CommandId,
        callback: Box<HookFn>,
        name: Option<String>,
        run_on_help: bool,
        persistent: bool,
    ) -> Self {
        Self {
            owner,
            name,
            callback,
            run_on_help,
            persistent,
        }
    }

    /// Returns the command the hook was registered on.
    #[must_use]
    pub fn owner(&self) -> CommandId {
        self.owner
    }

    /// Returns the hook's label, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns whether the hook also runs on help.
    #[must_use]
    pub fn runs_on_help(&self) -> bool {
        self.run_on_help
    }

    /// Returns whether the hook was registered as persistent.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Invokes the hook.
    pub fn invoke(&self, ctx: &mut CommandContext<'_>) -> Result<(), HookError> {
        (self.callback)(ctx)
    }
}

impl fmt::Debug for HookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRecord")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("run_on_help", &self.run_on_help)
            .field("persistent", &self.persistent)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistry
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct HookKey {
    command: CommandId,
    phase: HookPhase,
}

/// Registry of hook records, keyed by owning command and hook point.
///
/// # Thread Safety
///
/// Tables sit behind [`RwLock`]s so registration works through `&self`.
/// Records are handed out as [`Arc`]s and no lock is held while a hook runs,
/// which lets a hook register further hooks.
#[derive(Default)]
pub struct HookRegistry {
    /// Per (command, hook point) records in registration order.
    hooks: RwLock<HashMap<HookKey, Vec<Arc<HookRecord>>>>,
    /// (command, hook point) pairs whose delegate slot holds an adapter.
    adapters: RwLock<HashSet<HookKey>>,
    adapter_installs: AtomicUsize,
    help_installed: AtomicBool,
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to its owner's list for `phase`.
    ///
    /// Labelled records must be unique per command and hook point.
    pub fn insert(
        &self,
        phase: HookPhase,
        record: HookRecord,
    ) -> Result<(), HookRegistrationError> {
        let key = HookKey {
            command: record.owner,
            phase,
        };
        let mut hooks = self.hooks.write();
        let entries = hooks.entry(key).or_default();

        if let Some(name) = record.name()
            && entries.iter().any(|entry| entry.name() == Some(name))
        {
            return Err(HookRegistrationError::DuplicateName {
                command: key.command,
                phase,
                name: name.to_owned(),
            });
        }

        entries.push(Arc::new(record));
        Ok(())
    }

    /// Returns the records owned by `command` for `phase`, in registration order.
    #[must_use]
    pub fn records(&self, command: CommandId, phase: HookPhase) -> Vec<Arc<HookRecord>> {
        let hooks = self.hooks.read();
        hooks
            .get(&HookKey { command, phase })
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the number of hooks registered on `command` for `phase`.
    #[must_use]
    pub fn hooks_for(&self, command: CommandId, phase: HookPhase) -> usize {
        let hooks = self.hooks.read();
        hooks.get(&HookKey { command, phase }).map_or(0, Vec::len)
    }

    /// Returns the number of hooks registered for `phase` across all commands.
    #[must_use]
    pub fn hook_count(&self, phase: HookPhase) -> usize {
        let hooks = self.hooks.read();
        hooks
            .iter()
            .filter(|(key, _)| key.phase == phase)
            .map(|(_, entries)| entries.len())
            .sum()
    }

    /// Returns true if an adapter was installed for `command` and `phase`.
    #[must_use]
    pub fn adapter_installed(&self, command: CommandId, phase: HookPhase) -> bool {
        self.adapters.read().contains(&HookKey { command, phase })
    }

    /// Returns how many adapters have been installed in total.
    #[must_use]
    pub fn adapter_installs(&self) -> usize {
        self.adapter_installs.load(Ordering::Relaxed)
    }

    /// Returns true once the help pathway wraps the root's help renderer.
    #[must_use]
    pub fn help_installed(&self) -> bool {
        self.help_installed.load(Ordering::Acquire)
    }

    /// Marks the adapter for `command` and `phase` as installed.
    ///
    /// Returns false if it already was.
    pub(crate) fn mark_adapter(&self, command: CommandId, phase: HookPhase) -> bool {
        let inserted = self.adapters.write().insert(HookKey { command, phase });
        if inserted {
            self.adapter_installs.fetch_add(1, Ordering::Relaxed);
        }
        inserted
    }

    /// Marks the help pathway as installed. Returns false if it already was.
    pub(crate) fn mark_help_installed(&self) -> bool {
        !self.help_installed.swap(true, Ordering::AcqRel)
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.read().values().map(Vec::len).sum::<usize>())
            .field("adapters", &self.adapter_installs())
            .field("help_installed", &self.help_installed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: CommandId, name: Option<&str>) -> HookRecord {
        HookRecord::new(
            owner,
            Box::new(|_| Ok(())),
            name.map(str::to_owned),
            false,
            false,
        )
    }

    #[test]
    fn insert_keeps_registration_order_per_command() {
        let registry = HookRegistry::new();
        let a = CommandId::new(0);
        let b = CommandId::new(1);

        for name in ["first", "second", "third"] {
            registry
                .insert(HookPhase::PreRun, record(a, Some(name)))
                .expect("registration should succeed");
        }
        registry
            .insert(HookPhase::PreRun, record(b, Some("other")))
            .unwrap();

        let names: Vec<_> = registry
            .records(a, HookPhase::PreRun)
            .iter()
            .map(|record| record.name().unwrap().to_owned())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(registry.hooks_for(b, HookPhase::PreRun), 1);
        assert_eq!(registry.hook_count(HookPhase::PreRun), 4);
        assert_eq!(registry.hook_count(HookPhase::Run), 0);
    }

    #[test]
    fn duplicate_labels_are_rejected_per_command_and_phase() {
        let registry = HookRegistry::new();
        let a = CommandId::new(0);

        registry
            .insert(HookPhase::Run, record(a, Some("audit")))
            .unwrap();
        let result = registry.insert(HookPhase::Run, record(a, Some("audit")));
        assert_eq!(
            result,
            Err(HookRegistrationError::DuplicateName {
                command: a,
                phase: HookPhase::Run,
                name: "audit".into(),
            })
        );

        registry
            .insert(HookPhase::PostRun, record(a, Some("audit")))
            .expect("same label on another phase is allowed");
        registry
            .insert(HookPhase::Run, record(CommandId::new(1), Some("audit")))
            .expect("same label on another command is allowed");
        assert_eq!(registry.hooks_for(a, HookPhase::Run), 1);
        assert_eq!(registry.hooks_for(a, HookPhase::PostRun), 1);
    }

    #[test]
    fn unnamed_hooks_never_collide() {
        let registry = HookRegistry::new();
        let a = CommandId::new(0);
        registry.insert(HookPhase::Run, record(a, None)).unwrap();
        registry.insert(HookPhase::Run, record(a, None)).unwrap();
        assert_eq!(registry.hooks_for(a, HookPhase::Run), 2);
    }

    #[test]
    fn adapter_marks_are_idempotent() {
        let registry = HookRegistry::new();
        let a = CommandId::new(0);

        assert!(registry.mark_adapter(a, HookPhase::Run));
        assert!(!registry.mark_adapter(a, HookPhase::Run));
        assert!(registry.mark_adapter(a, HookPhase::PreRun));

        assert!(registry.adapter_installed(a, HookPhase::Run));
        assert!(!registry.adapter_installed(a, HookPhase::PostRun));
        assert_eq!(registry.adapter_installs(), 2);
    }

    #[test]
    fn help_mark_is_one_shot() {
        let registry = HookRegistry::new();
        assert!(!registry.help_installed());
        assert!(registry.mark_help_installed());
        assert!(!registry.mark_help_installed());
        assert!(registry.help_installed());
    }
}
