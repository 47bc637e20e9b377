// src/data/mod.rs

//! Data representations for _vclib_.
//!
//! ## Definitions of data
//!
//! A "record" is one line of a logfmt log, tokenized into `key=value`
//! pairs by a [`LogfmtDecoder`].
//!
//! A "payload" is the value of the `vmconsole` key of a record.
//!
//! A [`SubRecord`] is a payload decoded into a [`LogEntry`], or the raw
//! payload string if it could not be decoded.
//!
//! [`LogfmtDecoder`]: crate::readers::logfmtdecoder::LogfmtDecoder
//! [`SubRecord`]: crate::data::subrecord::SubRecord
//! [`LogEntry`]: crate::data::subrecord::LogEntry

pub mod datetime;
pub mod subrecord;
