//! # myterm-kernel
//!
//! Core of the myterm shell: the operator [`Session`] state machine, the
//! [`CommandRegistry`] of built-in commands and the [`Dispatcher`] that turns
//! an input line into a [`CommandOutput`].
//!
//! The kernel never touches the terminal directly. Commands return data,
//! follow-up questions go through a [`Prompter`], and external effects
//! (shell passthrough, opening a browser) go through
//! [`myterm_adapters::Adapter`] handles held in the [`ShellContext`].
//!
//! ```ignore
//! let session = Session::open(AppPaths::new(root), SessionConfig::default())?;
//! let mut dispatcher = Dispatcher::new(default_registry(), session, shell, browser, prompter);
//! dispatcher.session_mut().login("alice", "pw")?;
//! let output = dispatcher.dispatch("calc (2+3)*4").await;
//! assert_eq!(output.text(), "20");
//! ```

pub mod commands;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod output;
pub mod paths;
pub mod policy;
pub mod prompt;
pub mod registry;
pub mod session;

pub use commands::default_registry;
pub use context::ShellContext;
pub use dispatcher::{Dispatcher, render_error};
pub use error::{KernelError, Result};
pub use output::{CommandOutput, Flow, Line, Tone};
pub use paths::{APP_NAME, AppPaths};
pub use policy::{DEFAULT_MAX_LOGIN_ATTEMPTS, RetryPolicy, SessionConfig};
pub use prompt::{LinePrompter, Prompter};
pub use registry::{Command, CommandInfo, CommandRegistry};
pub use session::{LockState, Session, SessionState};
