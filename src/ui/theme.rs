//! Custom theme for cliclack prompts

use cliclack::ThemeState;
use console::Style;

/// Red-and-green theme for cliclack output
#[derive(Debug, Clone, Default)]
pub struct PomodoroTheme;

impl cliclack::Theme for PomodoroTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().red(),
            ThemeState::Error(_) => Style::new().red().bold(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => Style::new().green().dim(),
        }
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().red(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => Style::new().green(),
        }
    }
}

/// Initialize the global theme
pub fn init_theme() {
    cliclack::set_theme(PomodoroTheme);
}
