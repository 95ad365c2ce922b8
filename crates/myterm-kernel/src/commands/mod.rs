//! Built-in commands.
//!
//! Each submodule groups related commands. [`default_registry`] wires all of
//! them into a [`CommandRegistry`].

pub mod appearance;
pub mod records;
pub mod security;
pub mod utility;
pub mod web;

use crate::registry::CommandRegistry;

/// Registry with every built-in command.
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Utilities
    registry.register(utility::Now);
    registry.register(utility::Calc);
    registry.register(utility::Clear);
    registry.register(utility::Help);
    registry.register(utility::Exit);

    // Web shortcuts
    registry.register(web::Web);
    registry.register(web::WebAdd);
    registry.register(web::WebList);
    registry.register(web::WebDel);

    // Look & feel
    registry.register(appearance::ThemeCmd);
    registry.register(appearance::PromptCmd);
    registry.register(appearance::BannerCmd);

    // Security
    registry.register(security::Lock);
    registry.register(security::SetPin);
    registry.register(security::ClearPin);

    // Personal records
    registry.register(records::Categories);
    registry.register(records::Save);
    registry.register(records::View);
    registry.register(records::Delete);
    registry.register(records::Edit);
    registry.register(records::Search);

    registry
}

/// Split off the first whitespace-delimited word. Both parts must be
/// non-empty.
pub(crate) fn split_word(args: &str) -> Option<(&str, &str)> {
    let (first, rest) = args.trim().split_once(char::is_whitespace)?;
    let rest = rest.trim();
    if rest.is_empty() {
        None
    } else {
        Some((first, rest))
    }
}

/// Parse `<category> <title>|<content>`.
///
/// Content may be empty and keeps its inner `|` characters.
pub(crate) fn split_titled(args: &str) -> Option<(&str, &str, &str)> {
    let (head, content) = args.split_once('|')?;
    let (category, title) = split_word(head)?;
    Some((category, title, content))
}
