//! Diagnostics for the launcher
//!
//! Everything goes to stderr so launcher output never mixes with the
//! launched script's stdout. Setting `SCALA_SCRIPT_DEBUG` (to any value)
//! turns the debug channel on; otherwise `RUST_LOG` applies and the default
//! is silence.

use std::fmt as std_fmt;
use std::io::{self, IsTerminal};

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    fmt::{self, format::Writer},
    prelude::*,
    EnvFilter,
};

/// Environment variable that switches the debug channel on
pub const DEBUG_ENV: &str = "SCALA_SCRIPT_DEBUG";

/// Custom formatter that shows "scala-script" instead of full module path
struct LauncherFormatter {
    with_ansi: bool,
}

impl<S, N> FormatEvent<S, N> for LauncherFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std_fmt::Result {
        let meta = event.metadata();

        write!(
            writer,
            "{} ",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ")
        )?;

        if self.with_ansi {
            let level_style = match *meta.level() {
                tracing::Level::ERROR => "\x1b[31m", // Red
                tracing::Level::WARN => "\x1b[33m",  // Yellow
                tracing::Level::INFO => "\x1b[32m",  // Green
                tracing::Level::DEBUG => "\x1b[34m", // Blue
                tracing::Level::TRACE => "\x1b[35m", // Magenta
            };
            write!(
                writer,
                "{}{:5}(scala-script)\x1b[0m: ",
                level_style,
                meta.level()
            )?;
        } else {
            write!(writer, "{:5}(scala-script): ", meta.level())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Install the global tracing subscriber.
///
/// `SCALA_SCRIPT_DEBUG` set: everything down to debug level.
/// Otherwise `RUST_LOG` is honored and the default is off.
pub fn init() {
    let filter = if std::env::var_os(DEBUG_ENV).is_some() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"))
    };

    let with_ansi = io::stderr().is_terminal();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .event_format(LauncherFormatter { with_ansi })
                .with_writer(io::stderr),
        )
        .init();
}
