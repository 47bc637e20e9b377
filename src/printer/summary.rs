// src/printer/summary.rs

//! Functions to print a [`Summary`] for CLI option `--summary`.
//!
//! [`Summary`]: crate::readers::summary::Summary

use std::io::{Result, Write};
use std::time::Duration;

use crate::data::datetime::DateTimeLOpt;
use crate::readers::summary::Summary;

/// Datetime format for printing `Summary` datetimes.
pub const DATETIMEFMT: &str = "%Y-%m-%dT%H:%M:%S%.9f%:z";

fn write_datetime<W: Write>(writer: &mut W, label: &str, dt_opt: &DateTimeLOpt) -> Result<()> {
    match dt_opt {
        Some(dt) => writeln!(writer, "{} {}", label, dt.format(DATETIMEFMT)),
        None => writeln!(writer, "{}", label),
    }
}

/// Write the `summary` of one run to `writer`.
///
/// `source` is the log file path or the journal command.
pub fn write_summary<W: Write>(
    writer: &mut W,
    summary: &Summary,
    source: &str,
    elapsed: Duration,
) -> Result<()> {
    writeln!(writer, "Summary:\n")?;
    writeln!(writer, "Source                 : {}", source)?;
    writeln!(writer, "Lines read             : {}", summary.lines)?;
    writeln!(writer, "Syntax errors          : {}", summary.syntax_errors)?;
    writeln!(writer, "vmconsole payloads     : {}", summary.payloads)?;
    writeln!(writer, "  decoded              : {}", summary.decoded)?;
    writeln!(writer, "  raw                  : {}", summary.raw)?;
    writeln!(writer, "  invalid timestamps   : {}", summary.ts_invalid)?;
    write_datetime(writer, "Datetime earliest      :", &summary.dt_earliest)?;
    write_datetime(writer, "Datetime latest        :", &summary.dt_latest)?;
    match &summary.error {
        Some(err) => writeln!(writer, "First error            : {}", err)?,
        None => writeln!(writer, "First error            :")?,
    }
    writeln!(writer, "Elapsed                : {:?}", elapsed)?;

    writer.flush()
}

/// Print the `summary` to stderr.
pub fn print_summary(summary: &Summary, source: &str, elapsed: Duration) {
    let mut stderr_lock = std::io::stderr().lock();
    if let Err(_err) = write_summary(&mut stderr_lock, summary, source, elapsed) {
        // XXX: nowhere else to report this
        crate::de_err!("write_summary error {}", _err);
    }
}
