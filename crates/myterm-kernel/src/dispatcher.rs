//! Line dispatcher.
//!
//! Turns one input line into a [`CommandOutput`]:
//!
//! 1. Blank lines produce nothing.
//! 2. While the session is locked every line is refused.
//! 3. The first word is looked up in the [`CommandRegistry`]; the rest of the
//!    line is passed to the command as its argument string.
//! 4. Anything else is run through the shell adapter.
//!
//! Errors never escape [`Dispatcher::dispatch`]; they are rendered into a
//! single line of output.

use serde_json::json;
use tracing::debug;

use myterm_adapters::{Adapter, ShellOutput};
use myterm_store::StoreError;
use myterm_vault::VaultError;

use crate::context::ShellContext;
use crate::error::{KernelError, Result};
use crate::output::{CommandOutput, Flow, Line};
use crate::prompt::Prompter;
use crate::registry::CommandRegistry;
use crate::session::{LockState, Session, SessionState};

/// Tool invoked on the shell adapter for unrecognized lines.
const SHELL_TOOL: &str = "shell_execute";

/// Routes input lines to commands or the shell.
pub struct Dispatcher {
    registry: CommandRegistry,
    ctx: ShellContext,
}

impl Dispatcher {
    pub fn new(
        registry: CommandRegistry,
        session: Session,
        shell: Box<dyn Adapter>,
        browser: Box<dyn Adapter>,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        let mut ctx = ShellContext::new(session, shell, browser, prompter);
        ctx.set_catalog(registry.catalog());
        Self { registry, ctx }
    }

    pub fn session(&self) -> &Session {
        &self.ctx.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.ctx.session
    }

    pub fn context_mut(&mut self) -> &mut ShellContext {
        &mut self.ctx
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Run one line and render any error.
    pub async fn dispatch(&mut self, line: &str) -> CommandOutput {
        match self.try_dispatch(line).await {
            Ok(output) => output,
            Err(e) => {
                debug!(error = %e, "command failed");
                let flow = if self.ctx.session.is_terminated() {
                    Flow::Exit
                } else {
                    Flow::Continue
                };
                CommandOutput::line(render_error(&e)).with_flow(flow)
            }
        }
    }

    /// Run one line, returning errors unrendered.
    pub async fn try_dispatch(&mut self, line: &str) -> Result<CommandOutput> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(CommandOutput::empty());
        }

        match self.ctx.session.state() {
            SessionState::Authenticated(LockState::Unlocked) => {}
            SessionState::Authenticated(LockState::Locked) => return Err(KernelError::SessionLocked),
            SessionState::Unauthenticated => return Err(KernelError::NotAuthenticated),
            state @ SessionState::Terminated => {
                return Err(KernelError::InvalidTransition {
                    action: "run commands",
                    state: state.to_string(),
                });
            }
        }

        let (keyword, args) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        match self.registry.get(keyword) {
            Some(command) => {
                debug!(command = command.name(), "dispatching");
                command.execute(&mut self.ctx, args).await
            }
            None => self.passthrough(line).await,
        }
    }

    /// Feed a PIN to a locked session.
    pub fn unlock(&mut self, pin: &str) -> CommandOutput {
        match self.ctx.session.unlock(pin) {
            Ok(()) => CommandOutput::line(Line::success("Unlocked.")),
            Err(KernelError::Vault(VaultError::IncorrectPin)) => {
                CommandOutput::line(Line::error("Wrong PIN."))
            }
            Err(e) => {
                let flow = if self.ctx.session.is_terminated() {
                    Flow::Exit
                } else {
                    Flow::Continue
                };
                CommandOutput::line(render_error(&e)).with_flow(flow)
            }
        }
    }

    async fn passthrough(&mut self, line: &str) -> Result<CommandOutput> {
        debug!(command = line, "passing through to shell");
        let value = self
            .ctx
            .shell
            .execute_tool(SHELL_TOOL, json!({ "command": line }))
            .await?;
        let output: ShellOutput =
            serde_json::from_value(value).map_err(myterm_adapters::AdapterError::from)?;

        let mut rendered = CommandOutput::empty();
        let stdout = output.stdout.trim_end_matches(['\r', '\n']);
        if !stdout.is_empty() {
            rendered.push(Line::plain(stdout));
        }
        let stderr = output.stderr.trim_end_matches(['\r', '\n']);
        if !stderr.is_empty() {
            rendered.push(Line::plain(stderr));
        }
        Ok(rendered)
    }
}

/// One-line rendering of a command failure.
pub fn render_error(error: &KernelError) -> Line {
    match error {
        KernelError::InvalidInput { usage } => Line::plain(format!("Usage: {usage}")),
        KernelError::SessionLocked => Line::error("Terminal is locked. Enter your PIN to unlock."),
        KernelError::NotAuthenticated => Line::error("Not logged in."),
        KernelError::NoPinSet => Line::plain("No PIN set. Use 'setpin' to create one."),
        KernelError::LoginAttemptsExhausted => Line::error("Too many failed attempts. Exiting."),
        KernelError::UnlockAttemptsExhausted => Line::error("Too many wrong PINs. Exiting."),
        KernelError::InvalidTransition { .. } => Line::error(format!("Error: {error}")),
        KernelError::Store(e) => render_store_error(e),
        KernelError::Vault(VaultError::IncorrectPin) => Line::error("Wrong PIN."),
        KernelError::Vault(VaultError::InvalidPin) => Line::error("Invalid PIN format."),
        KernelError::Vault(VaultError::InvalidCredentials) => Line::error("Invalid credentials."),
        KernelError::Vault(VaultError::DuplicateAccount { .. }) => {
            Line::plain("User already exists. Pick another name.")
        }
        KernelError::Calc(e) => Line::error(format!("Error: {e}")),
        KernelError::Adapter(e) => Line::error(format!("Command failed: {e}")),
        KernelError::Vault(_) | KernelError::Io(_) => Line::error(format!("Error: {error}")),
    }
}

fn render_store_error(error: &StoreError) -> Line {
    match error {
        StoreError::CategoryNotFound { .. } => Line::plain("Category not found."),
        StoreError::CategoryNotEmpty { .. } => Line::plain("Category not empty. Delete files first."),
        StoreError::EntryNotFound { .. } => Line::plain("Entry not found."),
        StoreError::AliasNotFound { .. } => Line::plain("Alias not found."),
        StoreError::InvalidInput(reason) => Line::error(format!("Invalid input: {reason}")),
        StoreError::Io(_) | StoreError::Json(_) => Line::error(format!("Error: {error}")),
    }
}
