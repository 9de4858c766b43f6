//! UI helpers for the `pomodoro` CLI
//!
//! Uses `cliclack` for styled output in a terminal, with plain-text
//! fallback in CI/non-interactive environments.

mod context;
mod output;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_error, outro_success, step_error_detail, step_info, step_ok,
};
pub use prompts::confirm;
pub use theme::{init_theme, PomodoroTheme};
