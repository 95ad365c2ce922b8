//! Terminal I/O for the interactive shell.

use std::io::{self, BufRead, Write};

use myterm_kernel::{CommandOutput, Line, Prompter};

use crate::theme;

/// Write one line, colored by its tone.
pub fn write_line(out: &mut dyn Write, line: &Line) -> io::Result<()> {
    match theme::tone_color(line.tone) {
        Some(color) => writeln!(out, "{}", theme::paint(color, &line.text)),
        None => writeln!(out, "{}", line.text),
    }
}

/// Write every line of a command's output.
pub fn write_output(out: &mut dyn Write, output: &CommandOutput) -> io::Result<()> {
    for line in &output.lines {
        write_line(out, line)?;
    }
    out.flush()
}

/// Read one line from `stdin`. `None` on end of input.
pub fn read_answer(stdin: &mut dyn BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if stdin.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// [`Prompter`] over the process's stdin and stdout.
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        let mut out = io::stdout().lock();
        write!(out, "{label}")?;
        out.flush()?;
        drop(out);
        read_answer(&mut io::stdin().lock())
    }

    fn say(&mut self, line: &Line) -> io::Result<()> {
        write_line(&mut io::stdout().lock(), line)
    }
}
