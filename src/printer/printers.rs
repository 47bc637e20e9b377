// src/printer/printers.rs

//! Printers for [`SubRecord`s], implementing the trait
//! [`SubRecordPrinter`].
//!
//! * A [`ConsolePrinter`] prints each sub-record as soon as it is given.
//! * A [`MessagePrinter`] holds the message of each sub-record until
//!   [`finish`] is called.
//!
//! [`SubRecord`s]: crate::data::subrecord::SubRecord
//! [`finish`]: SubRecordPrinter::finish

use std::io::{
    Result,
    Write,
};

use crate::common::NLu8a;
use crate::data::subrecord::{LogEntry, SubRecord};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
#[doc(hidden)]
pub use ::termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// globals and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`Color`] for printing `level` values `error`, `fatal`, `panic`.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_LEVEL_ERROR: Color = Color::Red;
/// [`Color`] for printing `level` values `warn`, `warning`.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_LEVEL_WARN: Color = Color::Yellow;
/// [`Color`] for printing `level` values `debug`, `trace`.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_LEVEL_DEBUG: Color = Color::Blue;

/// The [`Color`] for printing the `level` of a [`LogEntry`], if any.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub fn level_color(level: &str) -> Option<Color> {
    match level.to_ascii_lowercase().as_str() {
        "error" | "fatal" | "panic" => Some(COLOR_LEVEL_ERROR),
        "warn" | "warning" => Some(COLOR_LEVEL_WARN),
        "debug" | "trace" => Some(COLOR_LEVEL_DEBUG),
        _ => None,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SubRecordPrinter
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The output sink of [`parse_log`].
///
/// [`parse_log`]: crate::readers::logparser::parse_log
pub trait SubRecordPrinter {
    /// Print the `subrecord` decoded from the `vmconsole` `payload`.
    fn print(&mut self, payload: &str, subrecord: &SubRecord) -> Result<()>;

    /// Called once after the last `print`.
    fn finish(&mut self) -> Result<()>;
}

/// Prints each sub-record as one line, immediately.
///
/// A [`SubRecord::Decoded`] is printed as
/// `"{ts} {name} {level} {source} {subsystem}: {msg}"`.
/// A [`SubRecord::Raw`] is printed unchanged.
pub struct ConsolePrinter<W: WriteColor> {
    writer: W,
}

impl<W: WriteColor> std::fmt::Debug for ConsolePrinter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsolePrinter")
            .field("color", &self.writer.supports_color())
            .finish()
    }
}

impl<W: WriteColor> ConsolePrinter<W> {
    pub fn new(writer: W) -> ConsolePrinter<W> {
        ConsolePrinter { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn print_entry(&mut self, entry: &LogEntry) -> Result<()> {
        write!(self.writer, "{} {} ", entry.ts, entry.name)?;
        match level_color(&entry.level) {
            Some(color) if self.writer.supports_color() => {
                self.writer.set_color(ColorSpec::new().set_fg(Some(color)))?;
                write!(self.writer, "{}", entry.level)?;
                self.writer.reset()?;
            }
            _ => write!(self.writer, "{}", entry.level)?,
        }
        writeln!(self.writer, " {} {}: {}", entry.source, entry.subsystem, entry.msg)
    }
}

impl<W: WriteColor> SubRecordPrinter for ConsolePrinter<W> {
    fn print(&mut self, _payload: &str, subrecord: &SubRecord) -> Result<()> {
        match subrecord {
            SubRecord::Raw(raw) => {
                self.writer.write_all(raw.as_bytes())?;
                self.writer.write_all(&NLu8a)
            }
            SubRecord::Decoded(entry) => self.print_entry(entry),
        }
    }

    fn finish(&mut self) -> Result<()> {
        defñ!();
        self.writer.flush()
    }
}

/// Holds one line per sub-record until [`finish`], then prints the held
/// lines in the order given.
///
/// The line is the `msg` of a decoded sub-record, or the payload if the
/// sub-record could not be decoded or has an empty `msg`.
///
/// [`finish`]: SubRecordPrinter::finish
pub struct MessagePrinter<W: Write> {
    writer: W,
    lines: Vec<String>,
}

impl<W: Write> std::fmt::Debug for MessagePrinter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagePrinter")
            .field("lines", &self.lines.len())
            .finish()
    }
}

impl<W: Write> MessagePrinter<W> {
    pub fn new(writer: W) -> MessagePrinter<W> {
        MessagePrinter {
            writer,
            lines: Vec::new(),
        }
    }

    /// Count of lines held.
    pub fn count_held(&self) -> usize {
        self.lines.len()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SubRecordPrinter for MessagePrinter<W> {
    fn print(&mut self, payload: &str, subrecord: &SubRecord) -> Result<()> {
        let line: &str = match subrecord {
            SubRecord::Decoded(entry) if !entry.msg.is_empty() => entry.msg.as_str(),
            _ => payload,
        };
        self.lines.push(String::from(line));

        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        defn!("{} lines", self.lines.len());
        for line in self.lines.drain(..) {
            self.writer.write_all(line.as_bytes())?;
            self.writer.write_all(&NLu8a)?;
        }
        defx!();
        self.writer.flush()
    }
}
