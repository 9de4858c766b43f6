//! Lint command - validate every cache file

use crate::cache::CacheContext;
use crate::error::{PomodoroError, PomodoroResult};
use crate::maintenance;
use crate::ui::{self, UiContext};

/// Execute the lint command
pub async fn execute(cache: &CacheContext) -> PomodoroResult<()> {
    let ctx = UiContext::detect();
    let report = maintenance::lint(cache).await?;

    ui::intro(&ctx, "Cache lint");

    for finding in &report.findings {
        let location = match finding.line {
            Some(line) => format!("{}:{}", finding.name, line),
            None => finding.name.clone(),
        };
        ui::step_error_detail(&ctx, &location, &finding.message);
    }

    if report.is_clean() {
        ui::outro_success(&ctx, &format!("{} file(s) ok", report.checked));
        Ok(())
    } else {
        ui::outro_error(
            &ctx,
            &format!("{} of {} file(s) broken", report.findings.len(), report.checked),
        );
        Err(PomodoroError::LintFailed {
            count: report.findings.len(),
        })
    }
}
