//! Console I/O
//!
//! Line-oriented prompt boundary for interactive sessions: each prompt
//! writes to stdout, flushes, and blocks for exactly one line of stdin.

use std::io::{self, BufRead, Write};

use crate::builder::Prompter;

/// Prompter backed by stdin/stdout.
pub struct ConsolePrompter;

impl ConsolePrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsolePrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for ConsolePrompter {
    fn prompt(&mut self, text: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", text)?;
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn notify(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        writeln!(stdout, "{}", text)?;
        stdout.flush()
    }
}

/// Writes a plain report line to stdout.
pub fn write_report(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", text)?;
    stdout.flush()
}
