//! Command results as data.
//!
//! Commands never print. They return a [`CommandOutput`] and the front-end
//! decides how each [`Tone`] is colored.

/// Semantic color of an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Plain,
    Success,
    Warning,
    Error,
    Info,
}

/// One line (or block) of command output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tone: Tone,
    pub text: String,
}

impl Line {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(Tone::Plain, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Tone::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Tone::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Tone::Error, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Tone::Info, text)
    }
}

/// What the front-end should do after printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    /// Clear the terminal.
    ClearScreen,
    /// Leave the read loop.
    Exit,
}

/// Result of one dispatched line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub lines: Vec<Line>,
    pub flow: Flow,
}

impl CommandOutput {
    /// No output, keep going.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single line.
    pub fn line(line: Line) -> Self {
        Self {
            lines: vec![line],
            flow: Flow::Continue,
        }
    }

    /// Append a line.
    pub fn push(&mut self, line: Line) -> &mut Self {
        self.lines.push(line);
        self
    }

    pub fn with_flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }

    /// All line texts joined with newlines, without color.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<Line>> for CommandOutput {
    fn from(lines: Vec<Line>) -> Self {
        Self {
            lines,
            flow: Flow::Continue,
        }
    }
}
