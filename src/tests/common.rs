// src/tests/common.rs

//! Common data and helpers for tests.

use std::io::{Error, ErrorKind, Read, Result};

/// A well-formed `vmconsole` payload, all fields.
pub const PAYLOAD_BOOT: &str = r#"{"msg":"boot complete","level":"info","ts":"2018-01-01T00:00:00.123456789Z","source":"x","subsystem":"y","name":"z"}"#;
/// The `ConsolePrinter` line of `PAYLOAD_BOOT`.
pub const PAYLOAD_BOOT_PRINTED: &str = "2018-01-01T00:00:00.123456789Z z info x y: boot complete\n";

/// Two logfmt lines, the second with a `vmconsole` payload.
pub const LINES_2: &str = "k=v1\nvmconsole={\"msg\":\"hi\"}\n";

/// A `Read` that always fails.
pub struct FailingReader {}

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Err(Error::new(ErrorKind::BrokenPipe, "FailingReader"))
    }
}

/// A `Read` that returns `data` then fails.
pub struct FailAfterReader<'a> {
    pub data: &'a [u8],
}

impl<'a> Read for FailAfterReader<'a> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.data.is_empty() {
            return Err(Error::new(ErrorKind::BrokenPipe, "FailAfterReader"));
        }
        let sz = self.data.len().min(buf.len());
        buf[..sz].copy_from_slice(&self.data[..sz]);
        self.data = &self.data[sz..];

        Ok(sz)
    }
}

/// Read all of `reader` with calls to `read` using a buffer of `bufsz`.
/// Panics if any single `read` returns more than `bufsz` or errors.
pub fn read_all_bufsz<R: Read>(reader: &mut R, bufsz: usize) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    let mut buf: Vec<u8> = vec![0; bufsz];
    loop {
        let sz = match reader.read(&mut buf) {
            Ok(sz) => sz,
            Err(err) => panic!("read error {}", err),
        };
        assert!(sz <= bufsz, "read {} bytes into buffer of {}", sz, bufsz);
        if sz == 0 {
            break;
        }
        out.extend_from_slice(&buf[..sz]);
    }

    out
}
