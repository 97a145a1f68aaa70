//! Logging setup for applications built on Trellis.
//!
//! The hook engine and the command tree log through [`tracing`]; nothing is
//! printed until a subscriber is installed. [`TracingConfig`] installs one.
//!
//! # Example
//!
//! ```
//! use trellis_core::{TracingConfig, TracingFormat};
//! use tracing::Level;
//!
//! TracingConfig::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .with_env_filter("trellis_hooks=trace,trellis_tree=debug")
//!     .init();
//! ```

use core::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "TRELLIS_LOG";

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "TRELLIS_LOG_FORMAT";

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

/// Returned when a format name is not one of `pretty`, `compact` or `json`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tracing format '{0}', expected pretty, compact or json")]
pub struct UnknownFormat(pub String);

impl FromStr for TracingFormat {
    type Err = UnknownFormat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(value.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Subscriber configuration.
///
/// Without an explicit filter, everything at or above `level` is shown.
/// A filter string uses the `target=level,target=level` directive syntax and
/// falls back to `level` when it does not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    level: Level,
    format: TracingFormat,
    env_filter: Option<String>,
    span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads [`LOG_ENV`] and [`LOG_FORMAT_ENV`] from the process environment.
    ///
    /// Unset variables keep their defaults, and so does an unrecognised
    /// format name.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading values through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(filter) = lookup(LOG_ENV).filter(|filter| !filter.trim().is_empty()) {
            config.env_filter = Some(filter);
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            config.format = format.parse().unwrap_or_default();
        }
        config
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets filter directives, e.g. `trellis_hooks=trace,trellis_tree=info`.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// The configured maximum level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The configured output format.
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    /// The configured filter directives, if any.
    pub fn env_filter(&self) -> Option<&str> {
        self.env_filter.as_deref()
    }

    /// Whether span enter/exit events are emitted.
    pub fn span_events(&self) -> bool {
        self.span_events
    }

    fn filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(span_events);

        match self.format {
            TracingFormat::Pretty => layer.pretty().boxed(),
            TracingFormat::Compact => layer.compact().boxed(),
            TracingFormat::Json => layer.json().boxed(),
        }
    }

    /// Installs the global subscriber.
    ///
    /// Returns `false` and leaves the existing subscriber in place when one
    /// is already installed, so several entry points may call this.
    pub fn init(&self) -> bool {
        let installed = tracing_subscriber::registry()
            .with(self.fmt_layer())
            .with(self.filter())
            .try_init()
            .is_ok();

        if installed {
            tracing::debug!(
                level = %self.level,
                format = ?self.format,
                filter = self.env_filter.as_deref().unwrap_or_default(),
                "tracing initialized"
            );
        }
        installed
    }
}
