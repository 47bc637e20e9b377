// src/readers/hexbytereader.rs

//! Implements the "hex byte" escaping readers, [`HexByteFileReader`] and
//! [`HexByteStreamReader`].
//!
//! Both readers implement [`Read`] and emit the bytes of the underlying
//! source with every `\x` rewritten to `\\x`. A logfmt tokenizer would
//! otherwise reject `\x` as an invalid escape sequence within a quoted
//! value, or mangle it. After escaping, the tokenizer unescapes `\\x` back
//! to the literal text `\x`.
//!
//! * A `HexByteFileReader` reads the entire source on the first call to
//!   `read`, escapes it once, then copies out of the escaped bytes.
//! * A `HexByteStreamReader` reads the source one line at a time and
//!   never holds more than one escaped line. It is for unbounded sources
//!   like the stdout of `journalctl --follow`.
//!
//! Both readers produce identical bytes for the same input, with one
//! exception: a final line without a terminating newline is given one by
//! the `HexByteStreamReader`.
//!
//! [`Read`]: std::io::Read

use std::io::{
    BufRead,
    BufReader,
    Error,
    ErrorKind,
    Read,
    Result,
};

use crate::common::{Bytes, Count, NLu8};
use crate::debug::printers::buffer_to_String_noraw;

use ::bstr::ByteSlice;
use ::more_asserts::debug_assert_le;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

/// The escape sequence that is rewritten.
pub const HEX_ESCAPE: &[u8] = br"\x";
/// `HEX_ESCAPE` rewritten so the backslash is itself escaped.
pub const HEX_ESCAPE_ESCAPED: &[u8] = br"\\x";
/// An already-escaped `HEX_ESCAPE_ESCAPED` after the first replacement
/// pass escaped it again.
pub const HEX_ESCAPE_OVERESCAPED: &[u8] = br"\\\x";

/// Error message prefix for an input with zero bytes.
pub const ERR_EMPTY_INPUT: &str = "empty input";

/// Rewrite every `\x` in `data` to `\\x`.
///
/// Done in two passes. The first pass rewrites every `\x` to `\\x`. The
/// second pass rewrites every `\\\x` to `\\x`, undoing the first pass for
/// input that was already escaped. The passes must run in this order.
///
/// The transform is idempotent.
pub fn escape_hex_bytes(data: &[u8]) -> Bytes {
    if data.find(HEX_ESCAPE).is_none() {
        return Bytes::from(data);
    }
    let escaped: Bytes = data.replace(HEX_ESCAPE, HEX_ESCAPE_ESCAPED);

    escaped.replace(HEX_ESCAPE_OVERESCAPED, HEX_ESCAPE_ESCAPED)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HexByteFileReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Escaping reader for a finite source, typically a [`File`].
///
/// The entire source is read and escaped during the first call to `read`.
/// An empty source is an error of kind `InvalidData`, prefixed
/// [`ERR_EMPTY_INPUT`].
///
/// [`File`]: std::fs::File
pub struct HexByteFileReader<R: Read> {
    /// the underlying source, `None` after it has been read
    reader: Option<R>,
    /// escaped contents of the source, `None` until the first `read`
    data: Option<Bytes>,
    /// how much of `data` has been copied out to the caller
    offset: usize,
}

impl<R: Read> std::fmt::Debug for HexByteFileReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HexByteFileReader")
            .field("loaded", &self.data.is_some())
            .field("len", &self.len())
            .field("offset", &self.offset)
            .finish()
    }
}

impl<R: Read> HexByteFileReader<R> {
    pub fn new(reader: R) -> HexByteFileReader<R> {
        defñ!();
        HexByteFileReader {
            reader: Some(reader),
            data: None,
            offset: 0,
        }
    }

    /// Length of the escaped data. `0` until the first `read`.
    pub fn len(&self) -> usize {
        match &self.data {
            Some(data) => data.len(),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of escaped bytes not yet copied out to the caller.
    pub fn remaining(&self) -> usize {
        self.len() - self.offset
    }

    /// Read and escape the entire source. Only the first call does work.
    fn load(&mut self) -> Result<()> {
        if self.data.is_some() {
            return Ok(());
        }
        defn!();
        let mut bytes: Bytes = Bytes::new();
        if let Some(reader) = self.reader.as_mut() {
            reader.read_to_end(&mut bytes)?;
        }
        defo!("read {} bytes", bytes.len());
        if bytes.is_empty() {
            defx!("return Err {}", ERR_EMPTY_INPUT);
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("{}: file is empty", ERR_EMPTY_INPUT),
            ));
        }
        let escaped = escape_hex_bytes(&bytes);
        defx!("escaped {} bytes to {} bytes", bytes.len(), escaped.len());
        self.data = Some(escaped);
        self.offset = 0;
        // the source is no longer needed
        self.reader = None;

        Ok(())
    }
}

impl<R: Read> Read for HexByteFileReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.load()?;
        let data: &Bytes = match &self.data {
            Some(data) => data,
            None => return Ok(0),
        };
        let remaining = data.len() - self.offset;
        let limit = remaining.min(buf.len());
        buf[..limit].copy_from_slice(&data[self.offset..self.offset + limit]);
        self.offset += limit;
        debug_assert_le!(self.offset, data.len(), "offset beyond data");

        Ok(limit)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HexByteStreamReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Escaping reader for an unbounded source, e.g. a subprocess pipe.
///
/// Lines are read and escaped lazily, one line per refill of the pending
/// buffer. Every line delivered ends with a newline.
pub struct HexByteStreamReader<R: Read> {
    reader: BufReader<R>,
    /// escaped bytes of the current line, including the trailing newline
    pending: Bytes,
    /// how much of `pending` has been copied out to the caller
    pending_offset: usize,
    /// the underlying source returned end-of-data
    eof: bool,
    /// count of lines read from the underlying source
    lines: Count,
}

impl<R: Read> std::fmt::Debug for HexByteStreamReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HexByteStreamReader")
            .field("pending", &buffer_to_String_noraw(self.pending_bytes()))
            .field("eof", &self.eof)
            .field("lines", &self.lines)
            .finish()
    }
}

impl<R: Read> HexByteStreamReader<R> {
    pub fn new(reader: R) -> HexByteStreamReader<R> {
        defñ!();
        HexByteStreamReader {
            reader: BufReader::new(reader),
            pending: Bytes::new(),
            pending_offset: 0,
            eof: false,
            lines: 0,
        }
    }

    /// Count of lines read from the underlying source.
    pub fn count_lines(&self) -> Count {
        self.lines
    }

    /// Escaped bytes not yet copied out to the caller.
    pub fn pending_bytes(&self) -> &[u8] {
        &self.pending[self.pending_offset..]
    }

    /// Read the next line of the underlying source, escape it, and store it
    /// as the pending bytes. Returns `false` at end of the source.
    fn refill(&mut self) -> Result<bool> {
        debug_assert!(self.pending_bytes().is_empty(), "refill with pending bytes");
        if self.eof {
            return Ok(false);
        }
        let mut line: Bytes = Bytes::new();
        let count = self.reader.read_until(NLu8, &mut line)?;
        if count == 0 {
            defñ!("end of source after {} lines", self.lines);
            self.eof = true;
            return Ok(false);
        }
        self.lines += 1;
        if line.last() == Some(&NLu8) {
            line.pop();
        }
        let mut escaped: Bytes = escape_hex_bytes(&line);
        escaped.push(NLu8);
        defñ!("line {}: {:?}", self.lines, buffer_to_String_noraw(&escaped));
        self.pending = escaped;
        self.pending_offset = 0;

        Ok(true)
    }
}

impl<R: Read> Read for HexByteStreamReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let pending: &[u8] = &self.pending[self.pending_offset..];
            if !pending.is_empty() {
                let size = pending.len().min(buf.len());
                buf[..size].copy_from_slice(&pending[..size]);
                self.pending_offset += size;
                if self.pending_offset == self.pending.len() {
                    self.pending.clear();
                    self.pending_offset = 0;
                }

                return Ok(size);
            }
            if !self.refill()? {
                return Ok(0);
            }
        }
    }
}
