// src/readers/logfmtdecoder.rs

//! Implements a [`LogfmtDecoder`], the driver of deriving [`Record`s]
//! from a source of logfmt bytes.
//!
//! A logfmt line is a sequence of whitespace-separated `key=value` tokens.
//! A value is either bare, e.g. `level=info`, or quoted, e.g.
//! `msg="hello world"`. Quoted values are unescaped; `\"`, `\\`, `\/`,
//! `\b`, `\f`, `\n`, `\r`, `\t` and `\uXXXX` are recognized and any other
//! escape is a syntax error. This is why `\x` must be escaped to `\\x`
//! by a [`HexByteFileReader`] or [`HexByteStreamReader`] before the bytes
//! reach a `LogfmtDecoder`.
//!
//! A bare value may embed `"`-delimited segments, e.g.
//! `vmconsole={"msg":"boot complete"}`. Whitespace within a segment is part
//! of the value. Bare values are never unescaped.
//!
//! [`Record`s]: self::Record
//! [`HexByteFileReader`]: crate::readers::hexbytereader::HexByteFileReader
//! [`HexByteStreamReader`]: crate::readers::hexbytereader::HexByteStreamReader

use std::io::{
    BufRead,
    BufReader,
    Error,
    Read,
};

use crate::common::{
    Bytes,
    Count,
    NLu8,
    ResultS3,
};
use crate::debug::printers::buffer_to_String_noraw;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};
use ::thiserror::Error;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A single `key=value` token of a logfmt line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl KeyVal {
    pub fn new(key: &str, value: &str) -> KeyVal {
        KeyVal {
            key: String::from(key),
            value: String::from(value),
        }
    }
}

/// Why a logfmt line could not be completely tokenized.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SyntaxErrorReason {
    #[error("unexpected '='")]
    UnexpectedEquals,
    #[error("unexpected '\"'")]
    UnexpectedQuote,
    #[error("unterminated quoted value")]
    UnterminatedQuote,
    #[error("invalid escape sequence")]
    InvalidEscape,
}

/// A logfmt syntax error at a 1-based `line` and 1-based byte `column`.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("logfmt syntax error at line {line}, column {column}: {reason}")]
pub struct LogfmtSyntaxError {
    pub line: Count,
    pub column: usize,
    pub reason: SyntaxErrorReason,
}

/// The tokenized `KeyVal`s of one logfmt line, in the order they appear.
///
/// If tokenizing stopped early then `error` is set and `pairs` holds the
/// `KeyVal`s found before the error.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Record {
    /// 1-based line number
    pub line_num: Count,
    pub pairs: Vec<KeyVal>,
    pub error: Option<LogfmtSyntaxError>,
}

impl Record {
    /// Value of the first pair with `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| kv.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// tokenizing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Internal result of scanning one part of a line; the error is the
/// reason and a 0-based byte index.
type ScanResult<T> = std::result::Result<T, (SyntaxErrorReason, usize)>;

#[inline(always)]
const fn is_whitespace(c: u8) -> bool {
    c <= b' '
}

fn bytes_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parse the 4 hex digits at `at` of a `\uXXXX` escape.
fn hex4(line: &[u8], at: usize) -> Option<u32> {
    let digits = line.get(at..at + 4)?;
    if !digits.iter().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let s = std::str::from_utf8(digits).ok()?;

    u32::from_str_radix(s, 16).ok()
}

/// Scan and unescape the quoted value whose opening `"` is at `start`.
/// Returns the unescaped value and the index just past the closing `"`.
fn scan_quoted(line: &[u8], start: usize) -> ScanResult<(String, usize)> {
    let mut value: Bytes = Bytes::with_capacity(line.len() - start);
    let mut pos = start + 1;
    while pos < line.len() {
        match line[pos] {
            b'"' => return Ok((bytes_to_string(&value), pos + 1)),
            b'\\' => {
                let esc = match line.get(pos + 1) {
                    Some(c) => *c,
                    None => return Err((SyntaxErrorReason::UnterminatedQuote, start)),
                };
                match esc {
                    b'"' | b'\\' | b'/' => value.push(esc),
                    b'b' => value.push(0x08),
                    b'f' => value.push(0x0C),
                    b'n' => value.push(b'\n'),
                    b'r' => value.push(b'\r'),
                    b't' => value.push(b'\t'),
                    b'u' => {
                        let mut cp = match hex4(line, pos + 2) {
                            Some(cp) => cp,
                            None => return Err((SyntaxErrorReason::InvalidEscape, pos)),
                        };
                        pos += 6;
                        // UTF-16 surrogate pair
                        if (0xD800..0xDC00).contains(&cp)
                            && line.get(pos) == Some(&b'\\')
                            && line.get(pos + 1) == Some(&b'u')
                        {
                            if let Some(lo) = hex4(line, pos + 2) {
                                if (0xDC00..0xE000).contains(&lo) {
                                    cp = 0x10000 + ((cp - 0xD800) << 10) + (lo - 0xDC00);
                                    pos += 6;
                                }
                            }
                        }
                        let c = char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER);
                        let mut buf = [0u8; 4];
                        value.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                        continue;
                    }
                    _ => return Err((SyntaxErrorReason::InvalidEscape, pos)),
                }
                pos += 2;
            }
            c => {
                value.push(c);
                pos += 1;
            }
        }
    }

    Err((SyntaxErrorReason::UnterminatedQuote, start))
}

/// Scan the bare value starting at `start`.
/// Returns the value and the index just past it.
fn scan_bare(line: &[u8], start: usize) -> ScanResult<(String, usize)> {
    let mut pos = start;
    let mut segment_start: Option<usize> = None;
    while pos < line.len() {
        let c = line[pos];
        if segment_start.is_some() {
            match c {
                b'\\' => pos += 1,
                b'"' => segment_start = None,
                _ => {}
            }
            pos += 1;
            continue;
        }
        match c {
            c if is_whitespace(c) => break,
            b'"' => segment_start = Some(pos),
            b'=' => return Err((SyntaxErrorReason::UnexpectedEquals, pos)),
            _ => {}
        }
        pos += 1;
    }
    if let Some(at) = segment_start {
        return Err((SyntaxErrorReason::UnterminatedQuote, at));
    }
    let end = pos.min(line.len());

    Ok((bytes_to_string(&line[start..end]), end))
}

/// Tokenize one logfmt `line` (without the trailing newline) into a
/// [`Record`].
pub fn parse_line(line: &[u8], line_num: Count) -> Record {
    let mut record = Record {
        line_num,
        pairs: Vec::new(),
        error: None,
    };
    if let Err((reason, at)) = scan_pairs(line, &mut record.pairs) {
        defñ!("line {} error {} at {}: {:?}", line_num, reason, at, buffer_to_String_noraw(line));
        record.error = Some(LogfmtSyntaxError {
            line: line_num,
            column: at + 1,
            reason,
        });
    }

    record
}

fn scan_pairs(line: &[u8], pairs: &mut Vec<KeyVal>) -> ScanResult<()> {
    let len = line.len();
    let mut pos: usize = 0;
    loop {
        while pos < len && is_whitespace(line[pos]) {
            pos += 1;
        }
        if pos >= len {
            return Ok(());
        }
        // key
        let key_start = pos;
        while pos < len {
            match line[pos] {
                c if is_whitespace(c) => break,
                b'=' => break,
                b'"' => return Err((SyntaxErrorReason::UnexpectedQuote, pos)),
                _ => pos += 1,
            }
        }
        if pos == key_start {
            return Err((SyntaxErrorReason::UnexpectedEquals, pos));
        }
        let key = bytes_to_string(&line[key_start..pos]);
        // key without a value
        if pos >= len || is_whitespace(line[pos]) {
            pairs.push(KeyVal { key, value: String::new() });
            continue;
        }
        // skip '='
        pos += 1;
        if pos >= len || is_whitespace(line[pos]) {
            pairs.push(KeyVal { key, value: String::new() });
            continue;
        }
        let (value, end) = if line[pos] == b'"' {
            scan_quoted(line, pos)?
        } else {
            scan_bare(line, pos)?
        };
        pairs.push(KeyVal { key, value });
        pos = end;
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogfmtDecoder
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Derives [`Record`s] from any source of logfmt bytes, one line at a time.
///
/// A line with a syntax error is still returned as a `Record` with the
/// error set; the next call to [`next_record`] continues with the next
/// line.
///
/// [`Record`s]: self::Record
/// [`next_record`]: LogfmtDecoder::next_record
pub struct LogfmtDecoder<R: Read> {
    reader: BufReader<R>,
    /// reused buffer of the current line
    line: Bytes,
    /// count of lines read
    line_num: Count,
}

impl<R: Read> std::fmt::Debug for LogfmtDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogfmtDecoder")
            .field("line_num", &self.line_num)
            .finish()
    }
}

impl<R: Read> LogfmtDecoder<R> {
    pub fn new(reader: R) -> LogfmtDecoder<R> {
        LogfmtDecoder {
            reader: BufReader::new(reader),
            line: Bytes::with_capacity(1024),
            line_num: 0,
        }
    }

    /// Count of lines read so far.
    pub fn count_lines(&self) -> Count {
        self.line_num
    }

    /// Read and tokenize the next line.
    ///
    /// Returns `Done` at end of input and `Err` if the underlying source
    /// failed.
    pub fn next_record(&mut self) -> ResultS3<Record, Error> {
        self.line.clear();
        match self.reader.read_until(NLu8, &mut self.line) {
            Ok(0) => {
                defñ!("Done after {} lines", self.line_num);
                ResultS3::Done
            }
            Ok(_) => {
                self.line_num += 1;
                if self.line.last() == Some(&NLu8) {
                    self.line.pop();
                }

                ResultS3::Found(parse_line(&self.line, self.line_num))
            }
            Err(err) => {
                defñ!("read_until error {}", err);
                ResultS3::Err(err)
            }
        }
    }
}
