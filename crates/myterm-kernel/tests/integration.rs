//! Integration tests for the myterm-kernel crate.
//!
//! A real session over a temp directory, driven line by line through the
//! dispatcher. Shell and browser are replaced by recording fakes so no
//! process is ever spawned.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use myterm_adapters::{Adapter, AdapterError, AdapterType, HealthStatus};
use myterm_kernel::{
    AppPaths, CommandOutput, Dispatcher, Flow, LinePrompter, LockState, Session, SessionConfig,
    SessionState, Tone, default_registry,
};

// ═══════════════════════════════════════════════════════════════════════
//  Fixtures
// ═══════════════════════════════════════════════════════════════════════

type Calls = Arc<Mutex<Vec<Value>>>;

/// Adapter that records every tool call and answers from a canned value.
struct Recorder {
    kind: AdapterType,
    calls: Calls,
    reply: Value,
}

#[async_trait]
impl Adapter for Recorder {
    fn id(&self) -> &str {
        "recorder"
    }

    fn adapter_type(&self) -> AdapterType {
        self.kind
    }

    async fn connect(&mut self) -> myterm_adapters::Result<()> {
        Ok(())
    }

    async fn health_check(&self) -> myterm_adapters::Result<HealthStatus> {
        Ok(HealthStatus::Healthy)
    }

    async fn execute_tool(&self, name: &str, params: Value) -> myterm_adapters::Result<Value> {
        self.calls.lock().unwrap().push(json!({ "tool": name, "params": params }));
        if self.reply.is_null() {
            return Err(AdapterError::ExecutionFailed {
                tool_name: name.to_string(),
                reason: "launcher missing".into(),
            });
        }
        Ok(self.reply.clone())
    }
}

struct Harness {
    _dir: tempfile::TempDir,
    dispatcher: Dispatcher,
    shell_calls: Calls,
    browser_calls: Calls,
}

impl Harness {
    /// Registered and logged-in `alice`, with `answers` scripted for
    /// interactive prompts.
    fn new(answers: &str) -> Self {
        Self::with_browser_reply(answers, json!({ "opened": true }))
    }

    fn with_browser_reply(answers: &str, browser_reply: Value) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::open(AppPaths::new(dir.path()), SessionConfig::default()).unwrap();
        session.register("alice", "secret", None).unwrap();

        let shell_calls = Calls::default();
        let browser_calls = Calls::default();
        let shell = Recorder {
            kind: AdapterType::Shell,
            calls: Arc::clone(&shell_calls),
            reply: json!({
                "command": "whoami",
                "exit_code": 0,
                "stdout": "alice\n",
                "stderr": "",
                "stdout_truncated": false,
                "stderr_truncated": false,
            }),
        };
        let browser = Recorder {
            kind: AdapterType::Browser,
            calls: Arc::clone(&browser_calls),
            reply: browser_reply,
        };
        let prompter = LinePrompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new());

        let dispatcher = Dispatcher::new(
            default_registry(),
            session,
            Box::new(shell),
            Box::new(browser),
            Box::new(prompter),
        );
        Self {
            _dir: dir,
            dispatcher,
            shell_calls,
            browser_calls,
        }
    }

    async fn run(&mut self, line: &str) -> CommandOutput {
        self.dispatcher.dispatch(line).await
    }

    async fn text(&mut self, line: &str) -> String {
        self.run(line).await.text()
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Utilities
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn calc_prints_results_and_errors() {
    let mut h = Harness::new("");
    assert_eq!(h.text("calc (2+3)*4").await, "20");
    assert_eq!(h.text("calc 7/2").await, "3.5");
    assert_eq!(h.text("calc 1/0").await, "Error: division by zero");
    assert_eq!(h.text("calc").await, "Usage: calc <expression>");

    let out = h.run("calc __import__('os')").await;
    assert_eq!(out.lines[0].tone, Tone::Error);
    assert!(out.text().starts_with("Error: unsupported expression"));
}

#[tokio::test]
async fn blank_line_does_nothing() {
    let mut h = Harness::new("");
    let out = h.run("   ").await;
    assert!(out.lines.is_empty());
    assert_eq!(out.flow, Flow::Continue);
    assert!(h.shell_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn help_lists_and_describes_commands() {
    let mut h = Harness::new("");
    let all = h.text("help").await;
    assert!(all.contains("save <category> <title>|<content>"));
    assert!(all.contains("search <category> <keyword>"));

    assert_eq!(h.text("? quit").await.lines().next(), Some("Usage: exit"));
    assert_eq!(h.text("help frobnicate").await, "No help for 'frobnicate'.");
}

#[tokio::test]
async fn exit_terminates_session() {
    let mut h = Harness::new("");
    let out = h.run("quit").await;
    assert_eq!(out.flow, Flow::Exit);
    assert_eq!(out.text(), "Goodbye!");
    assert_eq!(h.dispatcher.session().state(), SessionState::Terminated);
}

#[tokio::test]
async fn clear_requests_screen_clear() {
    let mut h = Harness::new("");
    assert_eq!(h.run("clear").await.flow, Flow::ClearScreen);
}

// ═══════════════════════════════════════════════════════════════════════
//  Records
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn save_view_search_delete() {
    let mut h = Harness::new("");
    assert_eq!(
        h.text("save notes Groceries list|milk, EGGS, bread").await,
        "Saved: notes/Groceries_list.txt"
    );

    let body = h.text("view notes groceries   LIST").await;
    assert!(body.starts_with("milk, EGGS, bread\n\n---\n"));
    assert!(body.contains("Category: notes"));

    assert_eq!(h.text("view notes all").await, "- Groceries_list.txt");
    assert_eq!(h.text("search notes eggs").await, "Matches:\n- Groceries_list.txt");
    assert_eq!(h.text("search notes caviar").await, "(no matches)");

    assert_eq!(h.text("edit notes Groceries list|tea").await, "Entry updated.");
    assert!(h.text("view notes Groceries list").await.starts_with("tea\n"));

    assert_eq!(
        h.text("delete notes Groceries list").await,
        "Deleted notes/Groceries_list.txt"
    );
    assert_eq!(h.text("view notes all").await, "(no entries)");
    assert_eq!(h.text("view notes Groceries list").await, "Entry not found.");
}

#[tokio::test]
async fn save_into_missing_category_suggests_creating_it() {
    let mut h = Harness::new("");
    assert_eq!(
        h.text("save recipes pie|apples").await,
        "Category does not exist. Create it with: categories add recipes"
    );
    assert_eq!(h.text("save notes").await, "Usage: save <category> <title>|<content>");
}

#[tokio::test]
async fn passwords_category_warns_about_plaintext() {
    let mut h = Harness::new("");
    let out = h.run("save passwords bank|hunter2").await;
    assert_eq!(out.lines.len(), 2);
    assert_eq!(out.lines[0].tone, Tone::Warning);
    assert!(out.lines[0].text.starts_with("[Note]"));
    assert_eq!(out.lines[1].text, "Saved: passwords/bank.txt");
}

#[tokio::test]
async fn plaintext_note_only_follows_a_write() {
    let mut h = Harness::new("");
    h.run("categories del passwords").await;
    let out = h.run("save passwords bank|hunter2").await;
    assert_eq!(out.lines.len(), 1);
    assert_eq!(
        out.lines[0].text,
        "Category does not exist. Create it with: categories add passwords"
    );
}

#[tokio::test]
async fn category_lifecycle() {
    let mut h = Harness::new("");
    assert_eq!(
        h.text("categories").await,
        "- contacts\n- notes\n- passwords\n- projects"
    );
    assert_eq!(h.text("categories add recipes").await, "Category 'recipes' added.");
    h.run("save recipes pie|apples").await;
    assert_eq!(
        h.text("categories del recipes").await,
        "Category not empty. Delete files first."
    );
    h.run("delete recipes pie").await;
    assert_eq!(h.text("categories del recipes").await, "Category 'recipes' deleted.");
    assert_eq!(h.text("categories del recipes").await, "Category not found.");
    assert_eq!(
        h.text("categories rename x").await,
        "Usage: categories [list|add <name>|del <name>]"
    );
}

// ═══════════════════════════════════════════════════════════════════════
//  Preferences & web shortcuts
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn appearance_updates_preferences() {
    let mut h = Harness::new("");
    assert_eq!(h.text("theme hacker").await, "Theme set to hacker.");
    assert_eq!(h.text("theme neon").await, "Themes: dark, light, hacker");
    assert_eq!(h.text("prompt alice$").await, "Prompt updated.");
    assert_eq!(h.text("banner off").await, "Banner set to off.");
    assert_eq!(h.text("banner maybe").await, "Usage: banner [on|off]");

    let prefs = h.dispatcher.session().preferences().unwrap();
    assert_eq!(prefs.theme.as_str(), "hacker");
    assert_eq!(prefs.prompt, "alice$");
    assert!(!prefs.banner);
}

#[tokio::test]
async fn web_resolves_aliases_and_opens_browser() {
    let mut h = Harness::new("");
    assert_eq!(
        h.text("webadd docs docs.rs").await,
        "Alias 'docs' -> docs.rs saved."
    );
    assert!(h.text("weblist").await.contains("docs       -> docs.rs"));

    assert_eq!(h.text("web docs").await, "Opening http://docs.rs ...");
    let calls = h.browser_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["tool"], "browser_open");
    assert_eq!(calls[0]["params"]["url"], "http://docs.rs");

    assert_eq!(h.text("webdel docs").await, "Alias 'docs' deleted.");
    assert_eq!(h.text("webdel docs").await, "Alias not found.");
}

#[tokio::test]
async fn webadd_joins_trailing_words() {
    let mut h = Harness::new("");
    assert_eq!(
        h.text("webadd q example.com/search?q=a   b").await,
        "Alias 'q' -> example.com/search?q=a b saved."
    );
    assert!(h.text("weblist").await.contains("q          -> example.com/search?q=a b"));
    assert_eq!(h.text("webadd q").await, "Usage: webadd <alias> <url>");
}

#[tokio::test]
async fn browser_failure_is_a_warning() {
    let mut h = Harness::with_browser_reply("", Value::Null);
    let out = h.run("web example.com").await;
    assert_eq!(out.lines[0].text, "Opening http://example.com ...");
    assert_eq!(out.lines[1].tone, Tone::Warning);
}

// ═══════════════════════════════════════════════════════════════════════
//  PIN & lock
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn lock_without_pin_is_refused() {
    let mut h = Harness::new("");
    assert_eq!(h.text("lock").await, "No PIN set. Use 'setpin' to create one.");
    assert!(!h.dispatcher.session().is_locked());
    assert_eq!(h.text("clearpin").await, "No PIN set.");
}

#[tokio::test]
async fn setpin_retries_until_valid_then_locks_and_unlocks() {
    // bad format, mismatch, then success
    let mut h = Harness::new("12\n1234\n9999\n1234\n1234\n");
    assert_eq!(h.text("setpin").await, "PIN updated.");
    assert!(h.dispatcher.session().has_pin());

    assert_eq!(h.text("lock").await, "Locked. Enter PIN to continue.");
    assert_eq!(
        h.dispatcher.session().state(),
        SessionState::Authenticated(LockState::Locked)
    );

    assert_eq!(h.dispatcher.unlock("0000").text(), "Wrong PIN.");
    assert!(h.dispatcher.session().is_locked());
    assert_eq!(h.dispatcher.unlock("1234").text(), "Unlocked.");
    assert!(!h.dispatcher.session().is_locked());
}

#[tokio::test]
async fn locked_session_rejects_everything_without_side_effects() {
    let mut h = Harness::new("1234\n1234\n");
    h.run("setpin").await;
    h.run("lock").await;

    for line in [
        "save notes secret|x",
        "categories add leaked",
        "theme light",
        "whoami",
        "exit",
    ] {
        let out = h.run(line).await;
        assert_eq!(out.lines[0].tone, Tone::Error, "{line}");
        assert_eq!(out.flow, Flow::Continue, "{line}");
    }
    assert!(h.shell_calls.lock().unwrap().is_empty());
    assert_eq!(
        h.dispatcher.session().state(),
        SessionState::Authenticated(LockState::Locked)
    );

    h.dispatcher.unlock("1234");
    assert_eq!(h.text("view notes all").await, "(no entries)");
    assert!(!h.text("categories").await.contains("leaked"));
    assert_eq!(
        h.dispatcher.session().preferences().unwrap().theme.as_str(),
        "dark"
    );
}

#[tokio::test]
async fn changing_and_clearing_pin_checks_the_current_one() {
    let mut h = Harness::new("1234\n1234\n0000\n1234\n5678\n5678\n0000\n5678\n");
    assert_eq!(h.text("setpin").await, "PIN updated.");
    assert_eq!(h.text("setpin").await, "Incorrect old PIN.");
    assert_eq!(h.text("setpin").await, "PIN updated.");
    assert_eq!(h.text("clearpin").await, "Wrong PIN.");
    assert_eq!(h.text("clearpin").await, "PIN cleared.");
    assert!(!h.dispatcher.session().has_pin());
}

#[tokio::test]
async fn setpin_cancelled_on_end_of_input() {
    let mut h = Harness::new("1234\n");
    assert_eq!(h.text("setpin").await, "Cancelled.");
    assert!(!h.dispatcher.session().has_pin());
}

// ═══════════════════════════════════════════════════════════════════════
//  Shell passthrough
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn unknown_lines_go_to_the_shell() {
    let mut h = Harness::new("");
    assert_eq!(h.text("whoami").await, "alice");

    let calls = h.shell_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["tool"], "shell_execute");
    assert_eq!(calls[0]["params"]["command"], "whoami");
}
