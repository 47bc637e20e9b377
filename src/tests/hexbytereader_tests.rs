// src/tests/hexbytereader_tests.rs

//! tests for `hexbytereader.rs`

#![allow(non_snake_case)]

use std::fs::File;
use std::io::{Cursor, ErrorKind, Read};

use crate::debug::helpers::{create_temp_file, create_temp_file_bytes};
use crate::readers::hexbytereader::{
    escape_hex_bytes,
    HexByteFileReader,
    HexByteStreamReader,
    ERR_EMPTY_INPUT,
};
use crate::tests::common::{
    read_all_bufsz,
    FailingReader,
    LINES_2,
};

use ::test_case::test_case;

// -------------------------------------------------------------------------------------------------
// escape_hex_bytes

#[test_case(b"", b""; "empty")]
#[test_case(b"abc", b"abc"; "no escapes")]
#[test_case(br"a\nb", br"a\nb"; "other escape")]
#[test_case(br"a\xFFb", br"a\\xFFb"; "one")]
#[test_case(br"a\\xFFb", br"a\\xFFb"; "already escaped")]
#[test_case(br"\x1b[0m\x1b[1m", br"\\x1b[0m\\x1b[1m"; "two")]
#[test_case(br"\x", br"\\x"; "only")]
#[test_case(br"x\", br"x\"; "trailing backslash")]
#[test_case(br"\\\x", br"\\\x"; "three backslashes")]
#[test_case(b"\\x\n\\x\n", b"\\\\x\n\\\\x\n"; "two lines")]
fn test_escape_hex_bytes(input: &[u8], expect: &[u8]) {
    let escaped = escape_hex_bytes(input);
    assert_eq!(
        escaped.as_slice(), expect,
        "\ninput  {:?}\nexpect {:?}\nactual {:?}\n",
        String::from_utf8_lossy(input),
        String::from_utf8_lossy(expect),
        String::from_utf8_lossy(&escaped),
    );
}

#[test_case(br"a\xFFb")]
#[test_case(br"a\\xFFb")]
#[test_case(br"\\\\x")]
#[test_case(br"\x\x\\x\\\x")]
#[test_case(br#"vmconsole="{\"msg\":\"\x1b[0m\"}""#)]
fn test_escape_hex_bytes_idempotent(input: &[u8]) {
    let once = escape_hex_bytes(input);
    let twice = escape_hex_bytes(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_escape_hex_bytes_identity_without_escape() {
    let input: Vec<u8> = (0..=255u8).filter(|b| *b != b'\\').collect();
    assert_eq!(escape_hex_bytes(&input), input);
}

// -------------------------------------------------------------------------------------------------
// HexByteFileReader

#[test_case(1)]
#[test_case(2)]
#[test_case(5)]
#[test_case(1024)]
fn test_HexByteFileReader_bufsz(bufsz: usize) {
    let input = br"a=1 b=\x00" as &[u8];
    let mut reader = HexByteFileReader::new(Cursor::new(input));
    let out = read_all_bufsz(&mut reader, bufsz);
    assert_eq!(out.as_slice(), br"a=1 b=\\x00");
    assert_eq!(reader.remaining(), 0);
    assert_eq!(reader.len(), out.len());
}

#[test]
fn test_HexByteFileReader_file() {
    let ntf = create_temp_file(LINES_2);
    let file = File::open(ntf.path()).unwrap();
    let mut reader = HexByteFileReader::new(file);
    let out = read_all_bufsz(&mut reader, 3);
    assert_eq!(out.as_slice(), LINES_2.as_bytes());
}

#[test]
fn test_HexByteFileReader_no_trailing_newline_unchanged() {
    let mut reader = HexByteFileReader::new(Cursor::new(b"a=1"));
    let out = read_all_bufsz(&mut reader, 64);
    assert_eq!(out.as_slice(), b"a=1");
}

#[test]
fn test_HexByteFileReader_empty() {
    let ntf = create_temp_file_bytes(b"");
    let file = File::open(ntf.path()).unwrap();
    let mut reader = HexByteFileReader::new(file);
    let mut buf = [0u8; 8];
    let err = reader.read(&mut buf).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert!(err.to_string().starts_with(ERR_EMPTY_INPUT), "{}", err);
    assert!(reader.is_empty());
}

#[test]
fn test_HexByteFileReader_error() {
    let mut reader = HexByteFileReader::new(FailingReader {});
    let mut buf = [0u8; 8];
    let err = reader.read(&mut buf).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BrokenPipe);
}

#[test]
fn test_HexByteFileReader_eof_repeats() {
    let mut reader = HexByteFileReader::new(Cursor::new(b"ab"));
    let mut buf = [0u8; 8];
    assert_eq!(reader.read(&mut buf).unwrap(), 2);
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
}

// -------------------------------------------------------------------------------------------------
// HexByteStreamReader

#[test_case(1; "smaller than a line 1")]
#[test_case(3; "smaller than a line 3")]
#[test_case(5; "equal to first line")]
#[test_case(23; "equal to second line")]
#[test_case(28; "equal to all")]
#[test_case(1024; "larger than all")]
fn test_HexByteStreamReader_bufsz(bufsz: usize) {
    let mut reader = HexByteStreamReader::new(Cursor::new(LINES_2.as_bytes()));
    let out = read_all_bufsz(&mut reader, bufsz);
    assert_eq!(
        out.as_slice(), LINES_2.as_bytes(),
        "\nexpect {:?}\nactual {:?}\n", LINES_2, String::from_utf8_lossy(&out),
    );
    assert_eq!(reader.count_lines(), 2);
}

#[test_case(1)]
#[test_case(4)]
#[test_case(7)]
#[test_case(64)]
fn test_HexByteStreamReader_escapes(bufsz: usize) {
    let input = b"a=\\x01\nb=\\\\x02\n\nc=\\x03" as &[u8];
    let expect = b"a=\\\\x01\nb=\\\\x02\n\nc=\\\\x03\n" as &[u8];
    let mut reader = HexByteStreamReader::new(Cursor::new(input));
    let out = read_all_bufsz(&mut reader, bufsz);
    assert_eq!(
        out.as_slice(), expect,
        "\nexpect {:?}\nactual {:?}\n",
        String::from_utf8_lossy(expect), String::from_utf8_lossy(&out),
    );
    assert_eq!(reader.count_lines(), 4);
}

/// pending bytes hold at most one line
#[test]
fn test_HexByteStreamReader_pending_one_line() {
    let mut reader = HexByteStreamReader::new(Cursor::new(LINES_2.as_bytes()));
    let mut buf = [0u8; 2];
    assert_eq!(reader.read(&mut buf).unwrap(), 2);
    assert_eq!(&buf, b"k=");
    assert_eq!(reader.pending_bytes(), b"v1\n");
    assert_eq!(reader.count_lines(), 1);
    assert_eq!(reader.read(&mut buf).unwrap(), 2);
    assert_eq!(&buf, b"v1");
    assert_eq!(reader.read(&mut buf).unwrap(), 1);
    assert_eq!(buf[0], b'\n');
    assert_eq!(reader.pending_bytes(), b"");
    // next read refills from the second line
    assert_eq!(reader.read(&mut buf).unwrap(), 2);
    assert_eq!(&buf, b"vm");
    assert_eq!(reader.count_lines(), 2);
}

#[test]
fn test_HexByteStreamReader_empty() {
    let mut reader = HexByteStreamReader::new(Cursor::new(b""));
    let mut buf = [0u8; 8];
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
    assert_eq!(reader.count_lines(), 0);
}

#[test]
fn test_HexByteStreamReader_zero_bufsz() {
    let mut reader = HexByteStreamReader::new(Cursor::new(b"a\n"));
    let mut buf = [0u8; 0];
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
    assert_eq!(reader.count_lines(), 0);
}

#[test]
fn test_HexByteStreamReader_error() {
    let mut reader = HexByteStreamReader::new(FailingReader {});
    let mut buf = [0u8; 8];
    let err = reader.read(&mut buf).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BrokenPipe);
}

/// both readers produce the same bytes for input ending in a newline
#[test_case(LINES_2.as_bytes())]
#[test_case(b"a=\\x01\n\n\\\\x\n")]
fn test_HexByteReaders_same(input: &[u8]) {
    let mut reader_f = HexByteFileReader::new(Cursor::new(input));
    let mut reader_s = HexByteStreamReader::new(Cursor::new(input));
    let out_f = read_all_bufsz(&mut reader_f, 3);
    let out_s = read_all_bufsz(&mut reader_s, 3);
    assert_eq!(out_f, out_s);
}
