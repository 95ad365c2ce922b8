//! Interactive read-eval-print loop.
//!
//! Reads one line at a time and hands it to the [`Dispatcher`]. While the
//! session is locked the prompt becomes `PIN: ` and every line is an unlock
//! attempt instead of a command. Locked input is never written to history.

use std::io::{self, Write};

use tracing::{info, warn};

use myterm_kernel::{Dispatcher, Flow};

use crate::console;
use crate::history::History;
use crate::theme::{self, RED, paint};

/// Reads one line into the buffer, returning the byte count (0 at EOF).
pub type ReadLine<'a> = dyn FnMut(&mut String) -> io::Result<usize> + 'a;

/// Run the shell until `exit`, end of input, or a fatal unlock failure.
///
/// `read_line` must not hold stdin between calls; commands such as
/// `setpin` read from it too.
pub async fn run(
    dispatcher: &mut Dispatcher,
    history: &History,
    read_line: &mut ReadLine<'_>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let mut line_buf = String::new();

    loop {
        let locked = dispatcher.session().is_locked();
        let prompt = if locked {
            "PIN: ".to_string()
        } else {
            dispatcher
                .session()
                .preferences()
                .map(theme::render_prompt)
                .unwrap_or_default()
        };
        write!(out, "{prompt}")?;
        out.flush()?;

        line_buf.clear();
        match read_line(&mut line_buf) {
            Ok(0) => {
                writeln!(out)?;
                writeln!(out, "{}", paint(RED, "Goodbye!"))?;
                info!("EOF received, exiting");
                dispatcher.session_mut().terminate();
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => {
                writeln!(out, "Error reading input: {e}")?;
                continue;
            }
        }

        let output = if locked {
            dispatcher.unlock(line_buf.trim())
        } else {
            if let Err(e) = history.append(&line_buf) {
                warn!(error = %e, path = %history.path().display(), "failed to write history");
            }
            dispatcher.dispatch(&line_buf).await
        };

        console::write_output(out, &output)?;
        match output.flow {
            Flow::Continue => {}
            Flow::ClearScreen => {
                write!(out, "{}", theme::CLEAR_SCREEN)?;
                out.flush()?;
            }
            Flow::Exit => {
                info!("user requested exit");
                return Ok(());
            }
        }
    }
}

/// Print a farewell and exit on Ctrl+C.
pub fn install_interrupt_handler() {
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{}", paint(RED, "Interrupted. Bye!"));
            std::process::exit(0);
        }
    });
}

/// Run against the process's stdin and stdout.
pub async fn run_stdio(dispatcher: &mut Dispatcher, history: &History) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut read_line = |buf: &mut String| stdin.read_line(buf);
    run(dispatcher, history, &mut read_line, &mut io::stdout()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, Cursor};

    use myterm_adapters::{BrowserAdapter, ShellAdapter};
    use myterm_kernel::{AppPaths, LinePrompter, Session, SessionConfig, default_registry};

    fn dispatcher(dir: &tempfile::TempDir, answers: &str) -> Dispatcher {
        let mut session = Session::open(AppPaths::new(dir.path()), SessionConfig::default()).unwrap();
        session.register("alice", "pw", None).unwrap();
        let prompter = LinePrompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new());
        Dispatcher::new(
            default_registry(),
            session,
            Box::new(ShellAdapter::new("shell", dir.path())),
            Box::new(BrowserAdapter::new("browser")),
            Box::new(prompter),
        )
    }

    async fn drive(dispatcher: &mut Dispatcher, history: &History, script: &str) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut read_line = |buf: &mut String| input.read_line(buf);
        let mut out = Vec::new();
        run(dispatcher, history, &mut read_line, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn lock_switches_to_pin_prompt_and_skips_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut dispatcher = dispatcher(&dir, "1234\n1234\n");
        let history = History::new(dir.path().join("history.txt"), true);

        let shown = drive(
            &mut dispatcher,
            &history,
            "setpin\nlock\n0000\n1234\ncalc 2**10\nexit\n",
        )
        .await;

        assert!(shown.contains("PIN updated."));
        assert!(shown.contains("PIN: "));
        assert!(shown.contains("Wrong PIN."));
        assert!(shown.contains("Unlocked."));
        assert!(shown.contains("1024"));
        assert!(shown.contains("Goodbye!"));

        let recorded = std::fs::read_to_string(history.path()).unwrap();
        assert_eq!(recorded, "setpin\nlock\ncalc 2**10\nexit\n");
    }

    #[tokio::test]
    async fn end_of_input_says_goodbye() {
        let dir = tempfile::tempdir().unwrap();
        let mut dispatcher = dispatcher(&dir, "");
        let history = History::new(dir.path().join("history.txt"), false);

        let shown = drive(&mut dispatcher, &history, "theme light\n").await;
        assert!(shown.contains("Theme set to light."));
        assert!(shown.contains("\x1b[94mmyterm> "));
        assert!(shown.ends_with(&format!("{}\n", paint(RED, "Goodbye!"))));
        assert!(dispatcher.session().is_terminated());
    }

    #[tokio::test]
    async fn clear_emits_clear_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut dispatcher = dispatcher(&dir, "");
        let history = History::new(dir.path().join("history.txt"), false);

        let shown = drive(&mut dispatcher, &history, "clear\nquit\n").await;
        assert!(shown.contains(theme::CLEAR_SCREEN));
    }
}
