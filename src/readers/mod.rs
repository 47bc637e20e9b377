// src/readers/mod.rs

//! "Readers" for _vclib_.
//!
//! ## Overview of readers
//!
//! * [`parse_log`] drives a [`LogfmtDecoder`] to derive [`Record`s].
//! * A `LogfmtDecoder` reads from a [`HexByteFileReader`] or a
//!   [`HexByteStreamReader`].
//! * A `HexByteFileReader` reads a [`File`]. A `HexByteStreamReader`
//!   reads the stdout of a [`JournalFollower`].
//!
//! <br/>
//!
//! * `HexByteFileReader` and `HexByteStreamReader` only handle `u8` bytes
//!   and implement the trait [`Read`].
//! * A `LogfmtDecoder` converts `u8` to `String` only for keys and values.
//!
//! [`parse_log`]: crate::readers::logparser::parse_log
//! [`LogfmtDecoder`]: crate::readers::logfmtdecoder::LogfmtDecoder
//! [`Record`s]: crate::readers::logfmtdecoder::Record
//! [`HexByteFileReader`]: crate::readers::hexbytereader::HexByteFileReader
//! [`HexByteStreamReader`]: crate::readers::hexbytereader::HexByteStreamReader
//! [`JournalFollower`]: crate::readers::journalfollower::JournalFollower
//! [`File`]: std::fs::File
//! [`Read`]: std::io::Read

pub mod hexbytereader;
pub mod journalfollower;
pub mod logfmtdecoder;
pub mod logparser;
pub mod summary;
