//! Interactive follow-up questions.
//!
//! A few commands (`setpin`, `clearpin`) and the login flow need to ask the
//! operator something mid-command. They do so through [`Prompter`], so the
//! same code runs against a terminal or a scripted reader in tests.

use std::io::{self, BufRead, Write};

use crate::output::Line;

/// Source of interactive answers.
pub trait Prompter: Send {
    /// Show `label` and read one answer, trimmed. `None` means end of input.
    fn ask(&mut self, label: &str) -> io::Result<Option<String>>;

    /// Show a line immediately, between questions.
    fn say(&mut self, line: &Line) -> io::Result<()>;
}

/// [`Prompter`] over any reader/writer pair, without colors.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R, W> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect what was shown.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead + Send, W: Write + Send> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }
        Ok(Some(answer.trim().to_string()))
    }

    fn say(&mut self, line: &Line) -> io::Result<()> {
        writeln!(self.output, "{}", line.text)
    }
}
