//! Look-and-feel commands. Each one updates the session's preference
//! snapshot, which is persisted to the account's `config.json`.

use async_trait::async_trait;

use myterm_store::Theme;

use crate::context::ShellContext;
use crate::error::{KernelError, Result};
use crate::output::{CommandOutput, Line};
use crate::registry::Command;

pub struct ThemeCmd;

#[async_trait]
impl Command for ThemeCmd {
    fn name(&self) -> &'static str {
        "theme"
    }

    fn usage(&self) -> &'static str {
        "theme <dark|light|hacker>"
    }

    fn summary(&self) -> &'static str {
        "Change the prompt color theme"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        let Ok(theme) = args.parse::<Theme>() else {
            let names: Vec<&str> = Theme::ALL.iter().map(Theme::as_str).collect();
            return Ok(CommandOutput::line(Line::plain(format!(
                "Themes: {}",
                names.join(", ")
            ))));
        };
        ctx.session.update_preferences(|prefs| prefs.theme = theme)?;
        Ok(CommandOutput::line(Line::success(format!(
            "Theme set to {theme}."
        ))))
    }
}

pub struct PromptCmd;

#[async_trait]
impl Command for PromptCmd {
    fn name(&self) -> &'static str {
        "prompt"
    }

    fn usage(&self) -> &'static str {
        "prompt <text>"
    }

    fn summary(&self) -> &'static str {
        "Change the prompt text"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(KernelError::usage(self.usage()));
        }
        let text = args.to_string();
        ctx.session.update_preferences(move |prefs| prefs.prompt = text)?;
        Ok(CommandOutput::line(Line::success("Prompt updated.")))
    }
}

pub struct BannerCmd;

#[async_trait]
impl Command for BannerCmd {
    fn name(&self) -> &'static str {
        "banner"
    }

    fn usage(&self) -> &'static str {
        "banner [on|off]"
    }

    fn summary(&self) -> &'static str {
        "Show or hide the startup banner"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        let value = args.to_lowercase();
        let enabled = match value.as_str() {
            "on" => true,
            "off" => false,
            _ => return Err(KernelError::usage(self.usage())),
        };
        ctx.session.update_preferences(|prefs| prefs.banner = enabled)?;
        Ok(CommandOutput::line(Line::success(format!(
            "Banner set to {value}."
        ))))
    }
}
