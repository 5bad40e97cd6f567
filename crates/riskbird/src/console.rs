use colored::{ColoredString, Colorize};
use indicatif::MultiProgress;
use std::fmt;
use std::io::{self, Write};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

/// Install the console subscriber: `[TAG]: message` lines on stderr, drawn above any
/// progress bars in `multi`.
pub(crate) fn init(multi: MultiProgress) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .event_format(ConsoleFormat)
        .with_writer(ConsoleWriter { multi })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

// format
// ----------------------------------------------------------------------------

/// Formats events as `[ERR]: message`, without timestamps or targets.
pub(crate) struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            write!(writer, "{}: ", colored_tag(level))?;
        } else {
            write!(writer, "{}: ", tag(level))?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

pub(crate) fn tag(level: Level) -> &'static str {
    match level {
        Level::ERROR => "[ERR]",
        Level::WARN => "[WARN]",
        Level::INFO => "[INFO]",
        Level::DEBUG => "[DEBUG]",
        _ => "[TRACE]",
    }
}

fn colored_tag(level: Level) -> ColoredString {
    let tag = tag(level);
    match level {
        Level::ERROR => tag.red().bold(),
        Level::WARN => tag.yellow(),
        Level::INFO => tag.green(),
        _ => tag.dimmed(),
    }
}

// writer
// ----------------------------------------------------------------------------

/// Hands out one buffer per event; the buffer is flushed to stderr with the progress bars
/// suspended, so log lines never tear through a bar.
#[derive(Clone)]
pub(crate) struct ConsoleWriter {
    multi: MultiProgress,
}

pub(crate) struct SuspendedLine {
    multi: MultiProgress,
    buf: Vec<u8>,
}

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = SuspendedLine;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedLine {
            multi: self.multi.clone(),
            buf: Vec::new(),
        }
    }
}

impl Write for SuspendedLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for SuspendedLine {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let buf = std::mem::take(&mut self.buf);
        self.multi.suspend(|| {
            let _ = io::stderr().lock().write_all(&buf);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags() {
        assert_eq!(tag(Level::ERROR), "[ERR]");
        assert_eq!(tag(Level::WARN), "[WARN]");
        assert_eq!(tag(Level::INFO), "[INFO]");
    }

    #[test]
    fn line_is_buffered_until_dropped() {
        let writer = ConsoleWriter {
            multi: MultiProgress::new(),
        };
        let mut line = writer.make_writer();
        line.write_all(b"[INFO]: hello\n").unwrap();
        assert_eq!(line.buf, b"[INFO]: hello\n");
    }
}
