use std::fmt::Write as FmtWrite;

use anyhow::Result;
use flexi_logger::{DeferredNow, Logger, LoggerHandle, Record};
use textwrap::{termwidth, Options};

/// Start console logging. Keep the returned handle alive until exit.
pub fn setup() -> Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str("info")?
        .format(multiline_format)
        .start()?;
    log::debug!("Adjust the log level by setting RUST_LOG. By default RUST_LOG=info");
    Ok(handle)
}

/// Wraps each record to the terminal width, with a marker on the first line
/// so multi-line records stay readable.
pub fn multiline_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let size = termwidth().min(80);
    let wrap_options = Options::new(size)
        .initial_indent("┏ ")
        .subsequent_indent("┃ ");

    let mut full_line = String::new();
    // Formatting into a String only fails if a Display impl does.
    let _ = writeln!(
        full_line,
        "{} [{}] [{}:{}]",
        record.level(),
        now.now().format("%H:%M:%S%.3f"),
        record.module_path().unwrap_or("<unnamed>"),
        record.line().unwrap_or(0),
    );
    let _ = write!(full_line, "{}", record.args());

    writeln!(w, "{}", textwrap::fill(&full_line, wrap_options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_prefixed_and_wrapped() {
        let mut out = Vec::new();
        let mut now = DeferredNow::new();
        let record = Record::builder()
            .args(format_args!(
                "depth field rejected because the text could not be parsed as a number, \
                 the previous chart is kept and the user is shown the generic message, \
                 this line is long enough to wrap at least twice on any terminal width"
            ))
            .level(log::Level::Warn)
            .module_path(Some("nbcalibrator::form"))
            .line(Some(42))
            .build();
        multiline_format(&mut out, &mut now, &record).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("┏ WARN ["));
        assert!(lines[0].ends_with("[nbcalibrator::form:42]"));
        assert!(lines.len() > 2);
        assert!(lines[1..].iter().all(|line| line.starts_with("┃ ")));
    }
}
