//! Command registry.
//!
//! Every built-in command is a [`Command`] registered once at startup under
//! its keyword and aliases. Lookup is an exact, case-sensitive keyword match.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::ShellContext;
use crate::error::Result;
use crate::output::CommandOutput;

// ---------------------------------------------------------------------------
// Command trait
// ---------------------------------------------------------------------------

/// A built-in command.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary keyword.
    fn name(&self) -> &'static str;

    /// Additional keywords resolving to this command.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Argument synopsis, e.g. `save <category> <title>|<content>`.
    fn usage(&self) -> &'static str;

    /// One-line description shown by `help`.
    fn summary(&self) -> &'static str;

    /// Run the command. `args` is the rest of the line, trimmed.
    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput>;
}

/// Static description of a registered command, for `help`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub summary: &'static str,
}

impl CommandInfo {
    /// Whether `keyword` names this command.
    pub fn answers_to(&self, keyword: &str) -> bool {
        self.name == keyword || self.aliases.contains(&keyword)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Keyword → command table.
#[derive(Default)]
pub struct CommandRegistry {
    by_keyword: HashMap<&'static str, Arc<dyn Command>>,
    order: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its name and aliases.
    ///
    /// A later registration for the same keyword replaces the earlier one.
    pub fn register(&mut self, command: impl Command + 'static) {
        let command: Arc<dyn Command> = Arc::new(command);
        tracing::debug!(command = command.name(), "command registered");
        self.by_keyword.insert(command.name(), Arc::clone(&command));
        for alias in command.aliases() {
            self.by_keyword.insert(*alias, Arc::clone(&command));
        }
        self.order.retain(|c| c.name() != command.name());
        self.order.push(command);
    }

    /// Look up a command by keyword or alias.
    pub fn get(&self, keyword: &str) -> Option<Arc<dyn Command>> {
        self.by_keyword.get(keyword).cloned()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.by_keyword.contains_key(keyword)
    }

    /// Number of distinct commands.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Descriptions of every command, in registration order.
    pub fn catalog(&self) -> Vec<CommandInfo> {
        self.order
            .iter()
            .map(|c| CommandInfo {
                name: c.name(),
                aliases: c.aliases(),
                usage: c.usage(),
                summary: c.summary(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Command for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }
        fn aliases(&self) -> &'static [&'static str] {
            &["say"]
        }
        fn usage(&self) -> &'static str {
            "echo <text>"
        }
        fn summary(&self) -> &'static str {
            "Repeat text."
        }
        async fn execute(&self, _ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
            Ok(CommandOutput::line(crate::output::Line::plain(args)))
        }
    }

    #[test]
    fn lookup_by_name_and_alias() {
        let mut registry = CommandRegistry::new();
        registry.register(Echo);

        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("say").is_some());
        assert!(registry.get("ECHO").is_none());
        assert!(!registry.contains("ls"));
    }

    #[test]
    fn re_registration_replaces() {
        let mut registry = CommandRegistry::new();
        registry.register(Echo);
        registry.register(Echo);
        assert_eq!(registry.len(), 1);

        let catalog = registry.catalog();
        assert_eq!(catalog[0].name, "echo");
        assert!(catalog[0].answers_to("say"));
    }
}
