//! PIN commands: `lock`, `setpin`, `clearpin`.
//!
//! `lock` only flips the session state. Reading the PIN back is the
//! front-end's job, since every line typed while locked goes to
//! [`Dispatcher::unlock`](crate::Dispatcher::unlock) instead of a command.

use async_trait::async_trait;

use myterm_vault::crypto;

use crate::context::ShellContext;
use crate::error::Result;
use crate::output::{CommandOutput, Line};
use crate::registry::Command;

pub struct Lock;

#[async_trait]
impl Command for Lock {
    fn name(&self) -> &'static str {
        "lock"
    }

    fn usage(&self) -> &'static str {
        "lock"
    }

    fn summary(&self) -> &'static str {
        "Lock the terminal until the PIN is entered"
    }

    async fn execute(&self, ctx: &mut ShellContext, _args: &str) -> Result<CommandOutput> {
        ctx.session.lock()?;
        Ok(CommandOutput::line(Line::warning(
            "Locked. Enter PIN to continue.",
        )))
    }
}

pub struct SetPin;

#[async_trait]
impl Command for SetPin {
    fn name(&self) -> &'static str {
        "setpin"
    }

    fn usage(&self) -> &'static str {
        "setpin"
    }

    fn summary(&self) -> &'static str {
        "Set or change the 4-8 digit PIN"
    }

    async fn execute(&self, ctx: &mut ShellContext, _args: &str) -> Result<CommandOutput> {
        let old = if ctx.session.has_pin() {
            let Some(old) = ctx.prompter.ask("Enter old PIN: ")? else {
                return Ok(cancelled());
            };
            if !ctx.session.verify_pin(&old)? {
                return Ok(CommandOutput::line(Line::error("Incorrect old PIN.")));
            }
            Some(old)
        } else {
            None
        };

        // Keep asking until a well-formed, confirmed PIN is given.
        loop {
            let Some(pin) = ctx.prompter.ask("New PIN (4-8 digits): ")? else {
                return Ok(cancelled());
            };
            if !crypto::is_valid_pin(&pin) {
                ctx.prompter.say(&Line::error("Invalid PIN format."))?;
                continue;
            }
            let Some(confirm) = ctx.prompter.ask("Confirm PIN: ")? else {
                return Ok(cancelled());
            };
            if confirm != pin {
                ctx.prompter.say(&Line::error("PINs do not match."))?;
                continue;
            }

            ctx.session.set_pin(old.as_deref(), &pin)?;
            return Ok(CommandOutput::line(Line::success("PIN updated.")));
        }
    }
}

pub struct ClearPin;

#[async_trait]
impl Command for ClearPin {
    fn name(&self) -> &'static str {
        "clearpin"
    }

    fn usage(&self) -> &'static str {
        "clearpin"
    }

    fn summary(&self) -> &'static str {
        "Remove the PIN"
    }

    async fn execute(&self, ctx: &mut ShellContext, _args: &str) -> Result<CommandOutput> {
        if !ctx.session.has_pin() {
            return Ok(CommandOutput::line(Line::plain("No PIN set.")));
        }
        let Some(pin) = ctx.prompter.ask("Enter current PIN: ")? else {
            return Ok(cancelled());
        };
        ctx.session.clear_pin(&pin)?;
        Ok(CommandOutput::line(Line::success("PIN cleared.")))
    }
}

fn cancelled() -> CommandOutput {
    CommandOutput::line(Line::plain("Cancelled."))
}
