// src/readers/summary.rs

//! Implements `Summary` statistics tracking struct.

use crate::common::Count;
use crate::data::datetime::{parse_time, DateTimeLOpt};
use crate::data::subrecord::SubRecord;
use crate::readers::logfmtdecoder::LogfmtSyntaxError;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Accumulated statistics about one run of [`parse_log`].
///
/// For CLI option `--summary`.
///
/// [`parse_log`]: crate::readers::logparser::parse_log
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    /// count of logfmt lines read
    pub lines: Count,
    /// count of `vmconsole` payloads found
    pub payloads: Count,
    /// count of payloads decoded to a `LogEntry`
    pub decoded: Count,
    /// count of payloads that could not be decoded
    pub raw: Count,
    /// count of lines with a logfmt syntax error
    pub syntax_errors: Count,
    /// count of decoded `LogEntry` with an unparseable `ts`
    pub ts_invalid: Count,
    /// earliest valid `ts` of a decoded `LogEntry`
    pub dt_earliest: DateTimeLOpt,
    /// latest valid `ts` of a decoded `LogEntry`
    pub dt_latest: DateTimeLOpt,
    /// The first logfmt syntax error, if any, as a `String`.
    pub error: Option<String>,
}

impl Summary {
    pub fn new() -> Summary {
        Summary::default()
    }

    /// Update the counts and datetimes for one `subrecord`.
    pub fn update_subrecord(&mut self, subrecord: &SubRecord) {
        self.payloads += 1;
        let entry = match subrecord {
            SubRecord::Raw(_) => {
                self.raw += 1;
                return;
            }
            SubRecord::Decoded(entry) => entry,
        };
        self.decoded += 1;
        match parse_time(&entry.ts) {
            Ok(dt) => {
                if self.dt_earliest.map_or(true, |dt_e| dt < dt_e) {
                    self.dt_earliest = Some(dt);
                }
                if self.dt_latest.map_or(true, |dt_l| dt > dt_l) {
                    self.dt_latest = Some(dt);
                }
            }
            Err(_err) => {
                defñ!("parse_time error {}", _err);
                self.ts_invalid += 1;
            }
        }
    }

    /// Update the counts for one logfmt syntax `error`.
    pub fn update_syntax_error(&mut self, error: &LogfmtSyntaxError) {
        self.syntax_errors += 1;
        if self.error.is_none() {
            self.error = Some(error.to_string());
        }
    }
}
