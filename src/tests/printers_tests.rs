// src/tests/printers_tests.rs

//! tests for `printers.rs`

#![allow(non_snake_case)]

use crate::data::subrecord::{LogEntry, SubRecord};
use crate::printer::printers::{
    level_color,
    Color,
    ConsolePrinter,
    MessagePrinter,
    NoColor,
    SubRecordPrinter,
    COLOR_LEVEL_DEBUG,
    COLOR_LEVEL_ERROR,
    COLOR_LEVEL_WARN,
};
use crate::tests::common::{PAYLOAD_BOOT, PAYLOAD_BOOT_PRINTED};

use ::termcolor::Ansi;
use ::test_case::test_case;

fn entry_msg_level(msg: &str, level: &str) -> LogEntry {
    LogEntry {
        msg: String::from(msg),
        level: String::from(level),
        ts: String::from("2018-01-01T00:00:00.1Z"),
        name: String::from("n"),
        source: String::from("s"),
        subsystem: String::from("ss"),
        ..Default::default()
    }
}

fn output_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

#[test_case("error", Some(COLOR_LEVEL_ERROR))]
#[test_case("ERROR", Some(COLOR_LEVEL_ERROR))]
#[test_case("fatal", Some(COLOR_LEVEL_ERROR))]
#[test_case("panic", Some(COLOR_LEVEL_ERROR))]
#[test_case("warn", Some(COLOR_LEVEL_WARN))]
#[test_case("Warning", Some(COLOR_LEVEL_WARN))]
#[test_case("debug", Some(COLOR_LEVEL_DEBUG))]
#[test_case("trace", Some(COLOR_LEVEL_DEBUG))]
#[test_case("info", None)]
#[test_case("", None)]
fn test_level_color(level: &str, expect: Option<Color>) {
    assert_eq!(level_color(level), expect);
}

// -------------------------------------------------------------------------------------------------
// ConsolePrinter

#[test]
fn test_ConsolePrinter_decoded() {
    let mut printer = ConsolePrinter::new(NoColor::new(Vec::<u8>::new()));
    let subrecord = SubRecord::decode(PAYLOAD_BOOT);
    printer.print(PAYLOAD_BOOT, &subrecord).unwrap();
    printer.finish().unwrap();
    let out = output_string(printer.into_inner().into_inner());
    assert_eq!(out, PAYLOAD_BOOT_PRINTED);
}

#[test]
fn test_ConsolePrinter_empty_fields() {
    let mut printer = ConsolePrinter::new(NoColor::new(Vec::<u8>::new()));
    let subrecord = SubRecord::Decoded(LogEntry::default());
    printer.print("{}", &subrecord).unwrap();
    let out = output_string(printer.into_inner().into_inner());
    assert_eq!(out, "    : \n");
}

#[test]
fn test_ConsolePrinter_raw() {
    let mut printer = ConsolePrinter::new(NoColor::new(Vec::<u8>::new()));
    printer.print("not-json", &SubRecord::decode("not-json")).unwrap();
    printer.print(r"a\x1b", &SubRecord::Raw(String::from(r"a\x1b"))).unwrap();
    printer.finish().unwrap();
    let out = output_string(printer.into_inner().into_inner());
    assert_eq!(out, "not-json\na\\x1b\n");
}

#[test]
fn test_ConsolePrinter_color() {
    let mut printer = ConsolePrinter::new(Ansi::new(Vec::<u8>::new()));
    let subrecord = SubRecord::Decoded(entry_msg_level("m", "error"));
    printer.print("", &subrecord).unwrap();
    let out = output_string(printer.into_inner().into_inner());
    assert!(out.starts_with("2018-01-01T00:00:00.1Z n \x1b["), "{:?}", out);
    assert!(out.contains("error\x1b[0m"), "{:?}", out);
    assert!(out.ends_with(" s ss: m\n"), "{:?}", out);
}

#[test]
fn test_ConsolePrinter_color_unmatched_level() {
    let mut printer = ConsolePrinter::new(Ansi::new(Vec::<u8>::new()));
    let subrecord = SubRecord::Decoded(entry_msg_level("m", "info"));
    printer.print("", &subrecord).unwrap();
    let out = output_string(printer.into_inner().into_inner());
    assert_eq!(out, "2018-01-01T00:00:00.1Z n info s ss: m\n");
}

// -------------------------------------------------------------------------------------------------
// MessagePrinter

#[test]
fn test_MessagePrinter_holds_until_finish() {
    let mut printer = MessagePrinter::new(Vec::<u8>::new());
    printer.print("p1", &SubRecord::Decoded(entry_msg_level("one", "info"))).unwrap();
    printer.print("p2", &SubRecord::Decoded(entry_msg_level("two", "info"))).unwrap();
    assert_eq!(printer.count_held(), 2);
    printer.finish().unwrap();
    assert_eq!(printer.count_held(), 0);
    let out = output_string(printer.into_inner());
    assert_eq!(out, "one\ntwo\n");
}

#[test]
fn test_MessagePrinter_nothing_before_finish() {
    let mut buffer: Vec<u8> = Vec::new();
    {
        let mut printer = MessagePrinter::new(&mut buffer);
        printer.print("p1", &SubRecord::Decoded(entry_msg_level("one", "info"))).unwrap();
    }
    assert!(buffer.is_empty());
}

#[test]
fn test_MessagePrinter_fallbacks() {
    let mut printer = MessagePrinter::new(Vec::<u8>::new());
    printer.print("not-json", &SubRecord::decode("not-json")).unwrap();
    printer.print(r#"{"level":"info"}"#, &SubRecord::decode(r#"{"level":"info"}"#)).unwrap();
    printer.print(PAYLOAD_BOOT, &SubRecord::decode(PAYLOAD_BOOT)).unwrap();
    printer.finish().unwrap();
    let out = output_string(printer.into_inner());
    assert_eq!(out, "not-json\n{\"level\":\"info\"}\nboot complete\n");
}

#[test]
fn test_MessagePrinter_finish_empty() {
    let mut printer = MessagePrinter::new(Vec::<u8>::new());
    printer.finish().unwrap();
    assert!(printer.into_inner().is_empty());
}
