use std::ffi::OsStr;
use std::io::{self, Read};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

/// Capture ceiling for a single tool invocation, in bytes.
pub const DEFAULT_MAX_OUTPUT: usize = 4096;

/// Runs an external inspection tool and returns what it printed on stdout.
///
/// Implemented by [`ProcessRunner`] for real subprocesses; tests substitute
/// fakes that return canned tool output.
pub trait Runner {
    fn run(&self, program: &str, args: &[&OsStr]) -> Result<String>;
}

/// Spawns tools directly from an argument vector (no shell) and keeps at
/// most `max_output` bytes of their stdout.
///
/// Exit status is not inspected: whatever the tool printed before exiting
/// is returned as-is.  Only a failure to start the process is an error.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    pub max_output: usize,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            max_output: DEFAULT_MAX_OUTPUT,
        }
    }
}

impl ProcessRunner {
    pub fn new(max_output: usize) -> Self {
        Self { max_output }
    }
}

impl Runner for ProcessRunner {
    fn run(&self, program: &str, args: &[&OsStr]) -> Result<String> {
        debug!("running {program} {:?}", args);

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to start {program}"))?;

        let captured = match child.stdout.take() {
            Some(stdout) => capture_bounded(stdout, self.max_output),
            None => Ok(String::new()),
        };
        // stdout is dropped by now, so a child still writing past the
        // ceiling gets EPIPE and exits instead of blocking wait().
        match child.wait() {
            Ok(status) => debug!("{program} exited with {status}"),
            Err(e) => debug!("failed to reap {program}: {e}"),
        }

        captured.with_context(|| format!("reading output of {program}"))
    }
}

/// Read at most `limit` bytes from `reader` and decode them as UTF-8.
///
/// Anything past the ceiling is silently discarded.  A multi-byte sequence
/// cut off by the ceiling is dropped so the result never exceeds `limit`
/// bytes; other invalid bytes are replaced with U+FFFD.
pub fn capture_bounded<R: Read>(reader: R, limit: usize) -> io::Result<String> {
    let mut buf = Vec::with_capacity(limit.min(DEFAULT_MAX_OUTPUT));
    reader.take(limit as u64).read_to_end(&mut buf)?;
    if buf.len() == limit {
        debug!("captured output reached the {limit} byte ceiling");
    }

    match String::from_utf8(buf) {
        Ok(text) => Ok(text),
        Err(e) => {
            let utf8 = e.utf8_error();
            let mut bytes = e.into_bytes();
            if utf8.error_len().is_none() {
                // Only an incomplete trailing sequence is wrong.
                bytes.truncate(utf8.valid_up_to());
                // valid_up_to guarantees the prefix decodes.
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            } else {
                let mut text = String::from_utf8_lossy(&bytes).into_owned();
                while text.len() > limit {
                    text.pop();
                }
                Ok(text)
            }
        }
    }
}
