// src/readers/logparser.rs

//! Implements [`parse_log`], the driver of a [`LogfmtDecoder`] and a
//! [`SubRecordPrinter`].
//!
//! [`LogfmtDecoder`]: crate::readers::logfmtdecoder::LogfmtDecoder
//! [`SubRecordPrinter`]: crate::printer::printers::SubRecordPrinter

use std::io::{
    Error,
    ErrorKind,
    Read,
};

use crate::common::{Count, ResultS3};
use crate::data::subrecord::{vmconsole_payload, SubRecord};
use crate::e_wrn;
use crate::printer::printers::SubRecordPrinter;
use crate::readers::hexbytereader::ERR_EMPTY_INPUT;
use crate::readers::logfmtdecoder::{LogfmtDecoder, Record};
use crate::readers::summary::Summary;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::thiserror::Error;

/// Fatal errors of [`parse_log`].
#[derive(Debug, Error)]
pub enum LogParseError {
    /// The source could not be read; `line` is the count of lines
    /// successfully read before the error.
    #[error("failed to read log after line {line}: {source}")]
    Read {
        line: Count,
        #[source]
        source: Error,
    },
    #[error("failed to write output: {0}")]
    Write(#[source] Error),
}

impl LogParseError {
    /// The source had zero bytes.
    pub fn is_empty_input(&self) -> bool {
        match self {
            LogParseError::Read { source, .. } => {
                source.kind() == ErrorKind::InvalidData
                    && source.to_string().starts_with(ERR_EMPTY_INPUT)
            }
            LogParseError::Write(_) => false,
        }
    }
}

/// Handle one `record`; print the sub-record of its `vmconsole` payload.
fn process_record<P>(record: &Record, printer: &mut P, summary: &mut Summary) -> Result<(), LogParseError>
where
    P: SubRecordPrinter + ?Sized,
{
    if let Some(payload) = vmconsole_payload(record) {
        let subrecord = SubRecord::decode(payload);
        summary.update_subrecord(&subrecord);
        printer
            .print(payload, &subrecord)
            .map_err(LogParseError::Write)?;
    }
    if let Some(err) = record.error.as_ref() {
        e_wrn!("failed to parse: {}", err);
        summary.update_syntax_error(err);
    }

    Ok(())
}

/// Read all logfmt records from `reader` and print the `vmconsole`
/// sub-records with `printer`.
///
/// A logfmt syntax error is printed to stderr and processing continues with
/// the next line. An error reading `reader` or writing with `printer` stops
/// processing.
///
/// `reader` is expected to be a [`HexByteFileReader`] or a
/// [`HexByteStreamReader`].
///
/// [`HexByteFileReader`]: crate::readers::hexbytereader::HexByteFileReader
/// [`HexByteStreamReader`]: crate::readers::hexbytereader::HexByteStreamReader
pub fn parse_log<R, P>(reader: R, printer: &mut P) -> Result<Summary, LogParseError>
where
    R: Read,
    P: SubRecordPrinter + ?Sized,
{
    defn!();
    let mut decoder = LogfmtDecoder::new(reader);
    let mut summary = Summary::new();
    loop {
        let record: Record = match decoder.next_record() {
            ResultS3::Found(record) => record,
            ResultS3::Done => break,
            ResultS3::Err(err) => {
                defx!("next_record error {}", err);
                return Err(LogParseError::Read {
                    line: decoder.count_lines(),
                    source: err,
                });
            }
        };
        summary.lines = record.line_num;
        process_record(&record, printer, &mut summary)?;
    }
    printer.finish().map_err(LogParseError::Write)?;
    defx!("{:?}", summary);

    Ok(summary)
}
