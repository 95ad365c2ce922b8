//! Personal record commands.
//!
//! Records are plain-text entries grouped into categories inside the
//! account workspace. `save` and `edit` take `<category> <title>|<content>`;
//! the other commands take a category and a title or keyword.

use async_trait::async_trait;

use myterm_store::StoreError;

use crate::commands::{split_titled, split_word};
use crate::context::ShellContext;
use crate::error::{KernelError, Result};
use crate::output::{CommandOutput, Line};
use crate::registry::Command;

const PLAINTEXT_NOTE: &str = "[Note] You are using the 'passwords' category. \
     Encryption is not enabled. Avoid storing real passwords here.";

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub struct Categories;

#[async_trait]
impl Command for Categories {
    fn name(&self) -> &'static str {
        "categories"
    }

    fn usage(&self) -> &'static str {
        "categories [list|add <name>|del <name>]"
    }

    fn summary(&self) -> &'static str {
        "List, add or delete categories"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        let workspace = ctx.session.workspace()?;
        let mut words = args.split_whitespace();

        match (words.next(), words.next()) {
            (None | Some("list"), _) => {
                let lines: Vec<Line> = workspace
                    .list_categories()?
                    .into_iter()
                    .map(|c| Line::plain(format!("- {c}")))
                    .collect();
                Ok(lines.into())
            }
            (Some("add"), Some(name)) => {
                workspace.add_category(name)?;
                Ok(CommandOutput::line(Line::success(format!(
                    "Category '{name}' added."
                ))))
            }
            (Some("del"), Some(name)) => {
                workspace.remove_category(name)?;
                Ok(CommandOutput::line(Line::success(format!(
                    "Category '{name}' deleted."
                ))))
            }
            _ => Err(KernelError::usage(self.usage())),
        }
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

pub struct Save;

#[async_trait]
impl Command for Save {
    fn name(&self) -> &'static str {
        "save"
    }

    fn usage(&self) -> &'static str {
        "save <category> <title>|<content>"
    }

    fn summary(&self) -> &'static str {
        "Create or overwrite an entry"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        let (category, title, content) =
            split_titled(args).ok_or_else(|| KernelError::usage(self.usage()))?;

        let mut output = CommandOutput::empty();
        match ctx.session.workspace()?.save_entry(category, title, content) {
            Ok(saved) => {
                if saved.plaintext_warning {
                    output.push(Line::warning(PLAINTEXT_NOTE));
                }
                output.push(Line::success(format!("Saved: {}", saved.display_path())));
            }
            Err(StoreError::CategoryNotFound { .. }) => {
                output.push(Line::plain(format!(
                    "Category does not exist. Create it with: categories add {category}"
                )));
            }
            Err(e) => return Err(e.into()),
        }
        Ok(output)
    }
}

pub struct View;

#[async_trait]
impl Command for View {
    fn name(&self) -> &'static str {
        "view"
    }

    fn usage(&self) -> &'static str {
        "view <category> <title|all>"
    }

    fn summary(&self) -> &'static str {
        "Show an entry, or list a category with 'all'"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        let (category, title) = split_word(args).ok_or_else(|| KernelError::usage(self.usage()))?;
        let workspace = ctx.session.workspace()?;

        if title.eq_ignore_ascii_case("all") {
            let lines: Vec<Line> = workspace
                .view_all(category)?
                .map(|name| Line::plain(format!("- {name}")))
                .collect();
            if lines.is_empty() {
                return Ok(CommandOutput::line(Line::plain("(no entries)")));
            }
            return Ok(lines.into());
        }

        let text = workspace.view_entry(category, title)?;
        Ok(CommandOutput::line(Line::success(text.trim_end())))
    }
}

pub struct Delete;

#[async_trait]
impl Command for Delete {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn usage(&self) -> &'static str {
        "delete <category> <title>"
    }

    fn summary(&self) -> &'static str {
        "Delete an entry"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        let (category, title) = split_word(args).ok_or_else(|| KernelError::usage(self.usage()))?;
        let file_name = ctx.session.workspace()?.delete_entry(category, title)?;
        Ok(CommandOutput::line(Line::success(format!(
            "Deleted {category}/{file_name}"
        ))))
    }
}

pub struct Edit;

#[async_trait]
impl Command for Edit {
    fn name(&self) -> &'static str {
        "edit"
    }

    fn usage(&self) -> &'static str {
        "edit <category> <title>|<new_content>"
    }

    fn summary(&self) -> &'static str {
        "Replace the content of an existing entry"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        let (category, title, content) =
            split_titled(args).ok_or_else(|| KernelError::usage(self.usage()))?;
        ctx.session
            .workspace()?
            .edit_entry(category, title, content)?;
        Ok(CommandOutput::line(Line::success("Entry updated.")))
    }
}

pub struct Search;

#[async_trait]
impl Command for Search {
    fn name(&self) -> &'static str {
        "search"
    }

    fn usage(&self) -> &'static str {
        "search <category> <keyword>"
    }

    fn summary(&self) -> &'static str {
        "Find entries containing a keyword, ignoring case"
    }

    async fn execute(&self, ctx: &mut ShellContext, args: &str) -> Result<CommandOutput> {
        let (category, keyword) =
            split_word(args).ok_or_else(|| KernelError::usage(self.usage()))?;
        let hits: Vec<String> = ctx.session.workspace()?.search(category, keyword)?.collect();

        if hits.is_empty() {
            return Ok(CommandOutput::line(Line::plain("(no matches)")));
        }
        let mut output = CommandOutput::line(Line::info("Matches:"));
        for hit in hits {
            output.push(Line::plain(format!("- {hit}")));
        }
        Ok(output)
    }
}
