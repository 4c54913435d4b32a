//! Browser console logging for the portal.
//!
//! # Design
//! - One `tracing` subscriber per page, installed before the config fetch so
//!   its warnings are not lost.
//! - The level filter is reloadable and narrowed once the config is known.
//! - Formatted lines are forwarded to the console method matching their level.

use std::io;

use prokode_auth::defaults;
use tracing::{Level, Metadata, Registry};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, reload};

/// Handle for adjusting the installed subscriber.
pub(crate) struct Telemetry {
    filter: reload::Handle<EnvFilter, Registry>,
}

impl Telemetry {
    /// Replace the level filter, keeping the current one if `level` is invalid.
    pub(crate) fn set_level(&self, level: &str) {
        let filter = match EnvFilter::try_new(level.trim()) {
            Ok(filter) => filter,
            Err(err) => {
                tracing::warn!(level, error = %err, "ignoring invalid log level");
                return;
            }
        };
        if let Err(err) = self.filter.modify(|current| *current = filter) {
            tracing::warn!(error = %err, "failed to update log level");
        }
    }
}

/// Install the console subscriber. Returns `None` when one is already set.
pub(crate) fn init() -> Option<Telemetry> {
    let (filter, handle) = reload::Layer::new(EnvFilter::new(defaults::LOG_LEVEL));
    let console = fmt::layer()
        .with_writer(ConsoleMakeWriter)
        .without_time()
        .with_ansi(false)
        .with_target(false);
    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .try_init()
        .ok()?;
    Some(Telemetry { filter: handle })
}

#[derive(Clone, Copy)]
struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and emits it when dropped.
struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    const fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        if self.level == Level::ERROR {
            gloo::console::error!(line);
        } else if self.level == Level::WARN {
            gloo::console::warn!(line);
        } else if self.level == Level::INFO {
            gloo::console::info!(line);
        } else {
            gloo::console::debug!(line);
        }
    }
}
