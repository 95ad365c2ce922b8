//! ANSI colors, banner and prompt rendering.

use myterm_kernel::Tone;
use myterm_store::{Preferences, Theme};

pub const RESET: &str = "\x1b[0m";
pub const RED: &str = "\x1b[91m";
pub const GREEN: &str = "\x1b[92m";
pub const YELLOW: &str = "\x1b[93m";
pub const BLUE: &str = "\x1b[94m";
pub const MAGENTA: &str = "\x1b[95m";
pub const CYAN: &str = "\x1b[96m";

/// Erase the screen and home the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub const BANNER: &str = r"
 __  __        ____                      _            _
|  \/  | __ _ / ___| _ __ ___  __ _  ___| | ___   ___| |
| |\/| |/ _` |\___ \| '__/ _ \/ _` |/ __| |/ _ \ / __| |
| |  | | (_| | ___) | | |  __/ (_| | (__| | (_) | (__| |
|_|  |_|\__,_||____/|_|  \___|\__,_|\___|_|\___/ \___|_|
";

/// Wrap `text` in `color`.
pub fn paint(color: &str, text: &str) -> String {
    format!("{color}{text}{RESET}")
}

/// Prompt color for a theme.
pub fn prompt_color(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => CYAN,
        Theme::Light => BLUE,
        Theme::Hacker => GREEN,
    }
}

/// Color for an output line, `None` for plain text.
pub fn tone_color(tone: Tone) -> Option<&'static str> {
    match tone {
        Tone::Plain => None,
        Tone::Success => Some(GREEN),
        Tone::Warning => Some(YELLOW),
        Tone::Error => Some(RED),
        Tone::Info => Some(CYAN),
    }
}

/// The themed prompt: trailing whitespace collapsed to one space.
pub fn render_prompt(prefs: &Preferences) -> String {
    let base = format!("{} ", prefs.prompt.trim_end());
    paint(prompt_color(prefs.theme), &base)
}

/// Banner plus the help hint, as printed after login.
pub fn render_banner() -> String {
    format!(
        "{}\nType {} or {} to see commands.\n",
        paint(MAGENTA, BANNER),
        paint(CYAN, "help"),
        paint(CYAN, "?")
    )
}
