// src/readers/journalfollower.rs

//! Implements a [`JournalFollower`], a running `journalctl --follow`
//! subprocess whose stdout is a live logfmt stream.

use std::ffi::OsStr;
use std::io::{Error, Result};
use std::process::{
    Child,
    ChildStdout,
    Command,
    ExitStatus,
    Stdio,
};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Program that follows the systemd journal.
pub const JOURNALCTL: &str = "journalctl";
/// Default journal `SYSLOG_IDENTIFIER` to follow.
pub const IDENTIFIER_DEFAULT: &str = "kata";

/// Arguments for [`JOURNALCTL`] to follow messages of `identifier`, printing
/// only the message text.
pub fn journalctl_args(identifier: &str) -> Vec<String> {
    ["-f", "-q", "-o", "cat", "-t", identifier]
        .iter()
        .map(|s| String::from(*s))
        .collect()
}

/// A running subprocess with piped stdout.
///
/// The subprocess is killed and reaped when the `JournalFollower` is
/// dropped, unless it already exited and was waited upon.
#[derive(Debug)]
pub struct JournalFollower {
    child: Child,
    /// the subprocess was reaped by `wait`
    reaped: bool,
}

impl JournalFollower {
    /// Spawn `journalctl` following the journal messages of `identifier`.
    pub fn spawn(identifier: &str) -> Result<JournalFollower> {
        JournalFollower::spawn_command(JOURNALCTL, &journalctl_args(identifier))
    }

    /// Spawn any `program` with `args`. stderr of the subprocess is
    /// inherited.
    pub fn spawn_command<S: AsRef<OsStr> + std::fmt::Debug>(
        program: &str,
        args: &[S],
    ) -> Result<JournalFollower> {
        defn!("Command::new({:?}).args({:?}).spawn()", program, args);
        let child: Child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(val) => val,
            Err(err) => {
                defx!("spawn error {}", err);
                return Err(Error::new(
                    err.kind(),
                    format!("process {:?} failed to start: {}", program, err),
                ));
            }
        };
        defx!("PID {}", child.id());

        Ok(JournalFollower {
            child,
            reaped: false,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Take the stdout pipe of the subprocess. Returns `None` if already
    /// taken.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Wait for the subprocess to exit.
    pub fn wait(&mut self) -> Result<ExitStatus> {
        defn!("PID {}", self.child.id());
        let status = self.child.wait()?;
        self.reaped = true;
        defx!("{:?}", status);

        Ok(status)
    }
}

impl Drop for JournalFollower {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        match self.child.try_wait() {
            Ok(Some(_status)) => {
                defñ!("PID {} exited {:?}", self.child.id(), _status);
            }
            Ok(None) | Err(_) => {
                defñ!("kill PID {}", self.child.id());
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
        }
    }
}
