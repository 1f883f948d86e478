//! Structured logging for JMAP plugin processes.
//!
//! Every plugin writes one JSON object per line to stdout so the hosting
//! platform can index the fields. The level and format come from the
//! environment ([`LogConfig::from_env`]); events and spans are emitted with
//! [`tracing`] throughout the workspace and rendered here.
//!
//! ```no_run
//! let _handle = logging::init(&logging::LogConfig::from_env())?;
//! tracing::info!(account_id = "u1", "plugin ready");
//! # Ok::<(), logging::LoggingError>(())
//! ```

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter};

pub mod buffer;
pub mod config;

pub use buffer::SharedBuffer;
pub use config::{LogConfig, LogFormat, LogLevel};

static LOGGING_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned once logging has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandle;

/// Errors encountered while configuring logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A level string did not name a known level.
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),
    /// A format string did not name a known format.
    #[error("invalid log format '{0}'")]
    InvalidFormat(String),
    /// Another global subscriber was already installed.
    #[error("failed to install logging subscriber: {0}")]
    Install(#[source] SetGlobalDefaultError),
}

/// Installs the global subscriber writing to stdout.
///
/// Only the first call installs anything; later calls return a fresh
/// [`LoggingHandle`] and leave the existing subscriber in place.
pub fn init(config: &LogConfig) -> Result<LoggingHandle, LoggingError> {
    LOGGING_GUARD
        .get_or_try_init(|| {
            tracing::subscriber::set_global_default(subscriber(config, std::io::stdout))
                .map_err(LoggingError::Install)
        })
        .map(|_| LoggingHandle)
}

/// Builds a subscriber for `config` that writes to `writer`.
///
/// JSON output flattens event fields to the top level and includes the
/// current span (name and fields) under `span`.
pub fn subscriber<W>(config: &LogConfig, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = fmt::Subscriber::builder()
        .with_max_level(config.level.as_filter())
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);

    match config.format {
        LogFormat::Json => Box::new(
            builder
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .finish(),
        ),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    }
}
