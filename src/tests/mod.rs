// src/tests/mod.rs

//! Tests for _vclib_.
//!
//! Tests are placed at `src/tests/`, inside the `vclib`. This is a
//! reasonable trade-off of separation and access.
//!
//! Tests placed at top-level path `tests/` do not have crate-internal
//! visibility.

pub mod common;
pub mod hexbytereader_tests;
pub mod printers_tests;
