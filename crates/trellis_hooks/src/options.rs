//! Per-registration hook options.

/// Options accepted by every registration entry point.
///
/// # Example
///
/// ```
/// use trellis_hooks::HookOptions;
///
/// let options = HookOptions::new().run_on_help().named("load-config");
/// assert!(options.runs_on_help());
/// assert!(!options.is_persistent());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookOptions {
    run_on_help: bool,
    persistent: bool,
    name: Option<String>,
}

impl HookOptions {
    /// Creates options with every flag off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also runs the hook when help is requested.
    ///
    /// Honored for pre-run and persistent-pre-run hooks.
    #[must_use]
    pub fn run_on_help(mut self) -> Self {
        self.run_on_help = true;
        self
    }

    /// Makes the hook fire for descendants of its command.
    ///
    /// Pre-run and post-run hooks are registered as their persistent
    /// counterparts. Help hooks also fire for descendants' help.
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    /// Labels the hook in logs and in [`HookRegistry`](crate::HookRegistry)
    /// lookups. Labels are unique per command and hook point.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns whether the hook runs on help.
    #[must_use]
    pub fn runs_on_help(&self) -> bool {
        self.run_on_help
    }

    /// Returns whether the hook cascades to descendants.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Returns the hook's label, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn into_name(self) -> Option<String> {
        self.name
    }
}
