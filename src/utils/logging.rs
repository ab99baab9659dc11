use std::{fmt, path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::{level_filters::LevelFilter, Event, Subscriber};
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{
        format::Writer,
        writer::{BoxMakeWriter, MakeWriterExt},
        FmtContext, FormatEvent, FormatFields,
    },
    registry::LookupSpan,
};

pub const LOG_PREFIX: &str = "idlehook";

/// Maps the number of `-v` flags onto a tracing level. Warnings and errors are always shown.
pub fn verbosity_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Writes every event as `<program>: <message>`, the way command line tools report on stderr.
pub struct ProgramPrefixed {
    program: String,
}

impl ProgramPrefixed {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for ProgramPrefixed
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
        write!(writer, "{}: ", self.program)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Sends logs to stderr and, when `log_dir` is given, also to a daily rotated file there.
pub fn enable_logging(program: &str, verbosity: u8, log_dir: Option<&Path>) -> Result<()> {
    let writer = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::Builder::new()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix(LOG_PREFIX)
                .build(dir)?;
            BoxMakeWriter::new(std::io::stderr.and(appender))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!(
            "{}={}",
            env!("CARGO_PKG_NAME").replace("-", "_"),
            verbosity_level(verbosity),
        )))
        .event_format(ProgramPrefixed::new(program))
        .with_writer(writer)
        .try_init()
        .map_err(anyhow::Error::msg)?;
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});

/// Writer collecting everything logged through it, for checking log output in tests.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct CapturedWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedWriter {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[cfg(test)]
impl std::io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedWriter {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::{verbosity_level, CapturedWriter, ProgramPrefixed};

    #[test]
    fn test_verbosity_level() {
        assert_eq!(verbosity_level(0), LevelFilter::WARN);
        assert_eq!(verbosity_level(1), LevelFilter::INFO);
        assert_eq!(verbosity_level(2), LevelFilter::DEBUG);
        assert_eq!(verbosity_level(3), LevelFilter::TRACE);
        assert_eq!(verbosity_level(7), LevelFilter::TRACE);
    }

    #[test]
    fn test_lines_are_prefixed_with_program() {
        let captured = CapturedWriter::default();
        let subscriber = tracing_subscriber::fmt()
            .event_format(ProgramPrefixed::new("./idlehook"))
            .with_writer(captured.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("$? = {}", 130);
        });

        assert_eq!(captured.contents(), "./idlehook: $? = 130\n");
    }
}
