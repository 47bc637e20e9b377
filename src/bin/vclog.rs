// src/bin/vclog.rs

//! Driver program _vclog_ drives the [_vclib_].
//!
//! Processes user-passed command-line arguments.
//!
//! If passed a path then that log file is read once with a
//! [`HexByteFileReader`]. Otherwise a [`JournalFollower`] runs
//! `journalctl --follow` and the subprocess stdout is read with a
//! [`HexByteStreamReader`] until the subprocess exits.
//!
//! Either reader is passed to [`parse_log`] which prints each `vmconsole`
//! sub-record to STDOUT.
//!
//! [_vclib_]: vclib
//! [`HexByteFileReader`]: vclib::readers::hexbytereader::HexByteFileReader
//! [`HexByteStreamReader`]: vclib::readers::hexbytereader::HexByteStreamReader
//! [`JournalFollower`]: vclib::readers::journalfollower::JournalFollower
//! [`parse_log`]: vclib::readers::logparser::parse_log

#![allow(non_camel_case_types)]

use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Instant;

use ::anyhow::{Context, Result};
use ::clap::{
    Parser,
    ValueEnum,
};
use ::const_format::concatcp;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
    stack::stack_offset_set,
};

use ::vclib::common::{File, FPath};
use ::vclib::debug::printers::{e_err, e_wrn};
use ::vclib::printer::printers::{
    ColorChoice,
    ConsolePrinter,
    MessagePrinter,
    StandardStream,
    SubRecordPrinter,
};
use ::vclib::printer::summary::print_summary;
use ::vclib::readers::hexbytereader::{
    HexByteFileReader,
    HexByteStreamReader,
};
use ::vclib::readers::journalfollower::{
    journalctl_args,
    JournalFollower,
    IDENTIFIER_DEFAULT,
    JOURNALCTL,
};
use ::vclib::readers::logparser::parse_log;
use ::vclib::readers::summary::Summary;

// --------------------
// command-line parsing

/// CLI enum that maps to [`termcolor::ColorChoice`].
///
/// [`termcolor::ColorChoice`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.ColorChoice.html
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    ValueEnum, // from `clap`
)]
enum CLI_Color_Choice {
    always,
    auto,
    never,
}

const CLI_HELP_AFTER: &str = concatcp!(
    r#"
Without PATH, runs:

  "#, JOURNALCTL, r#" -f -q -o cat -t IDENTIFIER

and prints sub-records as they arrive, until the journal process exits.

Each logfmt line is searched for key "vmconsole". The value is decoded as a
JSON object with string fields "msg", "level", "ts", "source", "version",
"pid", "subsystem", "sandbox", "name". It is printed as

  TS NAME LEVEL SOURCE SUBSYSTEM: MSG

If the value cannot be decoded then it is printed unchanged.

---

Version: "#, env!("CARGO_PKG_VERSION"), r#"
MSRV: "#, env!("CARGO_PKG_RUST_VERSION"), r#"
License: "#, env!("CARGO_PKG_LICENSE"), r#"
"#,
);

/// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    name = "vclog",
    // write expanded information for the `--version` output
    version = concatcp!(
        "\n",
        "Version: ", env!("CARGO_PKG_VERSION"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path of a logfmt log file to read once.
    /// If not passed then follow the journal.
    #[clap(
        required = false,
        verbatim_doc_comment,
    )]
    path: Option<String>,

    /// Journal identifier to follow when PATH is not passed.
    #[clap(
        short = 't',
        long,
        verbatim_doc_comment,
        default_value_t = String::from(IDENTIFIER_DEFAULT),
    )]
    identifier: String,

    /// Print only the message of each sub-record, after all input is read.
    /// The raw value is printed if there is no message.
    #[clap(
        short = 'm',
        long,
        verbatim_doc_comment,
    )]
    messages_only: bool,

    /// Choose to print using colors.
    #[clap(
        required = false,
        short = 'c',
        long = "color",
        verbatim_doc_comment,
        value_enum,
        default_value_t = CLI_Color_Choice::auto,
    )]
    color_choice: CLI_Color_Choice,

    /// Print a summary of processing to STDERR after all input is read.
    #[clap(
        short = 's',
        long,
        verbatim_doc_comment,
    )]
    summary: bool,
}

/// Map `CLI_Color_Choice` to `ColorChoice`.
///
/// `ColorChoice::Auto` does not check if STDOUT is a terminal so that is
/// done here.
fn cli_process_color_choice(color_choice: CLI_Color_Choice) -> ColorChoice {
    match color_choice {
        CLI_Color_Choice::always => ColorChoice::Always,
        CLI_Color_Choice::auto => {
            if std::io::stdout().is_terminal() {
                ColorChoice::Auto
            } else {
                ColorChoice::Never
            }
        }
        CLI_Color_Choice::never => ColorChoice::Never,
    }
}

/// Print a backtrace for any unexpected panic.
fn set_panic_hook() {
    let hook_default = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        hook_default(info);
        eprintln!(
            "stacktrace from panic:\n{}",
            std::backtrace::Backtrace::force_capture()
        );
    }));
}

// --------------------
// processing

/// Read the log file at `path` once.
fn process_file(path: &FPath, printer: &mut dyn SubRecordPrinter) -> Result<Summary> {
    defn!("({:?})", path);
    let file: File = File::open(path)
        .with_context(|| format!("cannot open file {:?}", path))?;
    let reader = HexByteFileReader::new(file);
    let summary = parse_log(reader, printer)
        .with_context(|| format!("cannot parse file {:?}", path))?;
    defx!();

    Ok(summary)
}

/// Follow the journal messages of `identifier` until `journalctl` exits.
fn process_journal(identifier: &str, printer: &mut dyn SubRecordPrinter) -> Result<Summary> {
    defn!("({:?})", identifier);
    let mut follower = JournalFollower::spawn(identifier)
        .with_context(|| format!("cannot follow journal identifier {:?}", identifier))?;
    defo!("PID {}", follower.id());
    let stdout = follower
        .take_stdout()
        .context("journal process stdout was not piped")?;
    let reader = HexByteStreamReader::new(stdout);
    let summary = parse_log(reader, printer)
        .context("cannot parse journal")?;
    let status = follower.wait()
        .context("cannot wait on journal process")?;
    if !status.success() {
        e_wrn!("{} exited {}", JOURNALCTL, status);
    }
    defx!();

    Ok(summary)
}

/// Process the user-passed command-line arguments.
/// Read the log file or follow the journal.
/// Determine a process return code.
pub fn main() -> ExitCode {
    let start_time = Instant::now();
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    set_panic_hook();
    defn!();

    let args = CLI_Args::parse();
    defo!("args {:?}", args);

    let color_choice = cli_process_color_choice(args.color_choice);
    defo!("color_choice {:?}", color_choice);

    let mut printer: Box<dyn SubRecordPrinter> = if args.messages_only {
        Box::new(MessagePrinter::new(std::io::stdout()))
    } else {
        Box::new(ConsolePrinter::new(StandardStream::stdout(color_choice)))
    };

    let (result, source): (Result<Summary>, String) = match &args.path {
        Some(path) => (process_file(path, printer.as_mut()), path.clone()),
        None => (
            process_journal(&args.identifier, printer.as_mut()),
            format!("{} {}", JOURNALCTL, journalctl_args(&args.identifier).join(" ")),
        ),
    };

    let exitcode = match result {
        Ok(summary) => {
            if args.summary {
                print_summary(&summary, &source, start_time.elapsed());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            e_err!("{:#}", err);
            ExitCode::FAILURE
        }
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}
