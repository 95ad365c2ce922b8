//! General-purpose commands: `now`, `calc`, `clear`, `help`, `exit`.

use async_trait::async_trait;
use chrono::Local;

use myterm_store::entry::TIMESTAMP_FORMAT;

use crate::context::ShellContext;
use crate::error::{KernelError, Result};
use crate::output::{CommandOutput, Flow, Line};
use crate::registry::Command;

pub struct Now;

#[async_trait]
impl Command for Now {
    fn name(&self) -> &'static str {
        "now"
    }

    fn usage(&self) -> &'static str {
        "now"
    }

    fn summary(&self) -> &'static str {
        "Show the current date and time"
    }

    async fn execute(&self, _ctx: &mut ShellContext, _args: &str) -> Result<CommandOutput> {
        let now = Local::now().format(TIMESTAMP_FORMAT).to_string();
        Ok(CommandOutput::line(Line::plain(now)))
    }
}

pub struct Calc;

#[async_trait]
impl Command for Calc {
    fn name(&self) -> &'static str {
        "calc"
    }

    fn usage(&self) -> &'static str {
        "calc <expression>"
    }

    fn summary(&self) -> &'static str {
        "Evaluate an arithmetic expression"
    }

    async fn execute(&self, _ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(KernelError::usage(self.usage()));
        }
        let value = myterm_calc::evaluate(args)?;
        Ok(CommandOutput::line(Line::plain(value.to_string())))
    }
}

pub struct Clear;

#[async_trait]
impl Command for Clear {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn usage(&self) -> &'static str {
        "clear"
    }

    fn summary(&self) -> &'static str {
        "Clear the screen"
    }

    async fn execute(&self, _ctx: &mut ShellContext, _args: &str) -> Result<CommandOutput> {
        Ok(CommandOutput::empty().with_flow(Flow::ClearScreen))
    }
}

pub struct Help;

#[async_trait]
impl Command for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["?"]
    }

    fn usage(&self) -> &'static str {
        "help [command]"
    }

    fn summary(&self) -> &'static str {
        "List commands, or show how to use one"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        let catalog = ctx.catalog();

        if args.is_empty() {
            let width = catalog.iter().map(|c| c.usage.len()).max().unwrap_or(0);
            let mut output = CommandOutput::line(Line::info("Commands:"));
            for info in catalog {
                output.push(Line::plain(format!(
                    "  {:width$}  {}",
                    info.usage, info.summary
                )));
            }
            output.push(Line::plain(
                "Anything else is run by the system shell.",
            ));
            return Ok(output);
        }

        let Some(info) = catalog.iter().find(|c| c.answers_to(args)) else {
            return Ok(CommandOutput::line(Line::plain(format!(
                "No help for '{args}'."
            ))));
        };

        let mut output = CommandOutput::line(Line::plain(format!("Usage: {}", info.usage)));
        output.push(Line::plain(format!("  {}", info.summary)));
        if !info.aliases.is_empty() {
            output.push(Line::plain(format!("  Aliases: {}", info.aliases.join(", "))));
        }
        Ok(output)
    }
}

pub struct Exit;

#[async_trait]
impl Command for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["quit"]
    }

    fn usage(&self) -> &'static str {
        "exit"
    }

    fn summary(&self) -> &'static str {
        "Leave the terminal"
    }

    async fn execute(&self, ctx: &mut ShellContext, _args: &str) -> Result<CommandOutput> {
        ctx.session.terminate();
        Ok(CommandOutput::line(Line::error("Goodbye!")).with_flow(Flow::Exit))
    }
}
