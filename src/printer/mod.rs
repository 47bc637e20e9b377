// src/printer/mod.rs

//! Printers for user-facing output, [`SubRecord`s] to stdout and the
//! `--summary` to stderr.
//!
//! [`SubRecord`s]: crate::data::subrecord::SubRecord

pub mod printers;
pub mod summary;
