//! State handed to every command.

use myterm_adapters::Adapter;

use crate::prompt::Prompter;
use crate::registry::CommandInfo;
use crate::session::Session;

/// Mutable world a [`Command`](crate::Command) operates on.
pub struct ShellContext {
    /// The operator session, owning credentials and the workspace.
    pub session: Session,
    /// Runs unrecognized lines through the OS shell.
    pub shell: Box<dyn Adapter>,
    /// Opens URLs for `web`.
    pub browser: Box<dyn Adapter>,
    /// Asks follow-up questions mid-command.
    pub prompter: Box<dyn Prompter>,
    catalog: Vec<CommandInfo>,
}

impl ShellContext {
    pub fn new(
        session: Session,
        shell: Box<dyn Adapter>,
        browser: Box<dyn Adapter>,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        Self {
            session,
            shell,
            browser,
            prompter,
            catalog: Vec::new(),
        }
    }

    /// Descriptions of the registered commands.
    pub fn catalog(&self) -> &[CommandInfo] {
        &self.catalog
    }

    pub(crate) fn set_catalog(&mut self, catalog: Vec<CommandInfo>) {
        self.catalog = catalog;
    }
}
