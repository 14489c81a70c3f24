//! Process-wide colour theme, loaded once from the configuration.

use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

impl Theme {
    pub fn from_config(value: &str) -> Self {
        if value.eq_ignore_ascii_case("light") {
            Theme::Light
        } else {
            Theme::Dark
        }
    }
}

/// Install the theme. Later calls are ignored.
pub fn init(theme: Theme) {
    let _ = THEME.set(theme);
}

pub fn current() -> Theme {
    *THEME.get().unwrap_or(&Theme::Dark)
}

/// Palette used by `ui::messages`: (info, success, warning, error).
/// Light terminals get the darker ANSI variants so text stays readable.
pub fn palette() -> (&'static str, &'static str, &'static str, &'static str) {
    match current() {
        Theme::Dark => ("\x1b[94m", "\x1b[92m", "\x1b[93m", "\x1b[91m"),
        Theme::Light => ("\x1b[34m", "\x1b[32m", "\x1b[33m", "\x1b[31m"),
    }
}
