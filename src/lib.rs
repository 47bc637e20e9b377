// src/lib.rs

//! _vclib_ extracts the JSON `vmconsole` sub-records embedded in logfmt
//! logs.
//!
//! See [`readers`] for an overview of the processing.

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
