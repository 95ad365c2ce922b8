//! Web shortcut commands.
//!
//! Aliases live in the account workspace. `web` resolves its argument
//! through them and hands the result to the browser adapter.

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::commands::split_word;
use crate::context::ShellContext;
use crate::error::{KernelError, Result};
use crate::output::{CommandOutput, Line};
use crate::registry::Command;

/// Tool invoked on the browser adapter.
const BROWSER_TOOL: &str = "browser_open";

pub struct Web;

#[async_trait]
impl Command for Web {
    fn name(&self) -> &'static str {
        "web"
    }

    fn usage(&self) -> &'static str {
        "web <url|alias>"
    }

    fn summary(&self) -> &'static str {
        "Open a URL or saved shortcut in the browser"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(KernelError::usage(self.usage()));
        }
        let url = ctx.session.workspace()?.resolve_alias(args);

        let mut output = CommandOutput::line(Line::plain(format!("Opening {url} ...")));
        if let Err(e) = ctx
            .browser
            .execute_tool(BROWSER_TOOL, json!({ "url": url }))
            .await
        {
            warn!(url = %url, error = %e, "browser launch failed");
            output.push(Line::warning(format!("Could not open browser: {e}")));
        }
        Ok(output)
    }
}

pub struct WebAdd;

#[async_trait]
impl Command for WebAdd {
    fn name(&self) -> &'static str {
        "webadd"
    }

    fn usage(&self) -> &'static str {
        "webadd <alias> <url>"
    }

    fn summary(&self) -> &'static str {
        "Save a web shortcut"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        let (alias, rest) = split_word(args).ok_or_else(|| KernelError::usage(self.usage()))?;
        // Words after the alias form the target, single-spaced.
        let url = rest.split_whitespace().collect::<Vec<_>>().join(" ");
        ctx.session.workspace()?.set_alias(alias, &url)?;
        Ok(CommandOutput::line(Line::success(format!(
            "Alias '{alias}' -> {url} saved."
        ))))
    }
}

pub struct WebList;

#[async_trait]
impl Command for WebList {
    fn name(&self) -> &'static str {
        "weblist"
    }

    fn usage(&self) -> &'static str {
        "weblist"
    }

    fn summary(&self) -> &'static str {
        "List web shortcuts"
    }

    async fn execute(&self, ctx: &mut ShellContext, _args: &str) -> Result<CommandOutput> {
        let aliases = ctx.session.workspace()?.get_aliases();
        if aliases.is_empty() {
            return Ok(CommandOutput::line(Line::plain("(no aliases)")));
        }
        let lines: Vec<Line> = aliases
            .iter()
            .map(|(alias, target)| Line::plain(format!("{alias:10} -> {target}")))
            .collect();
        Ok(lines.into())
    }
}

pub struct WebDel;

#[async_trait]
impl Command for WebDel {
    fn name(&self) -> &'static str {
        "webdel"
    }

    fn usage(&self) -> &'static str {
        "webdel <alias>"
    }

    fn summary(&self) -> &'static str {
        "Delete a web shortcut"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        if args.is_empty() || args.contains(char::is_whitespace) {
            return Err(KernelError::usage(self.usage()));
        }
        ctx.session.workspace()?.delete_alias(args)?;
        Ok(CommandOutput::line(Line::success(format!(
            "Alias '{args}' deleted."
        ))))
    }
}
