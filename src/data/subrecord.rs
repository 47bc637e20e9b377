// src/data/subrecord.rs

//! Implements [`LogEntry`] and [`SubRecord`], the JSON-encoded
//! sub-record carried by the `vmconsole` key of a logfmt [`Record`].
//!
//! [`Record`]: crate::readers::logfmtdecoder::Record

use crate::common::KEY_VMCONSOLE;
use crate::readers::logfmtdecoder::Record;

use ::serde::{Deserialize, Deserializer};
use ::serde_json::{Map, Value};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// The fixed fields of a decoded `vmconsole` sub-record.
///
/// Unrecognized JSON fields are ignored. Missing fields and `null` fields
/// are empty.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct LogEntry {
    #[serde(deserialize_with = "null_as_empty")]
    pub msg: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub level: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub ts: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub source: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub version: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub pid: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub subsystem: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub sandbox: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn decode_object(payload: &str) -> Result<LogEntry, ::serde_json::Error> {
    let object: Map<String, Value> = ::serde_json::from_str(payload)?;

    LogEntry::deserialize(Value::Object(object))
}

/// A `vmconsole` payload, decoded or not.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubRecord {
    /// The payload is a JSON object of the expected shape.
    Decoded(LogEntry),
    /// The payload could not be decoded; the original payload string.
    Raw(String),
}

impl SubRecord {
    /// Decode `payload` as a JSON object into a [`LogEntry`]. Failure to
    /// decode is not an error; it becomes a [`SubRecord::Raw`].
    ///
    /// Only a JSON object is accepted. A derived struct `Deserialize`
    /// would also fill the fields from a JSON array, by position.
    pub fn decode(payload: &str) -> SubRecord {
        match decode_object(payload) {
            Ok(entry) => SubRecord::Decoded(entry),
            Err(_err) => {
                defñ!("decode failed {}; raw {:?}", _err, payload);
                SubRecord::Raw(String::from(payload))
            }
        }
    }

    pub const fn is_raw(&self) -> bool {
        matches!(self, SubRecord::Raw(_))
    }

    /// The decoded `LogEntry`, if any.
    pub const fn entry(&self) -> Option<&LogEntry> {
        match self {
            SubRecord::Decoded(entry) => Some(entry),
            SubRecord::Raw(_) => None,
        }
    }
}

/// The value of the first `vmconsole` key of the `record` that has a
/// non-empty value. Pairs after it are not examined.
pub fn vmconsole_payload(record: &Record) -> Option<&str> {
    record
        .pairs
        .iter()
        .find(|kv| kv.key == KEY_VMCONSOLE && !kv.value.is_empty())
        .map(|kv| kv.value.as_str())
}
