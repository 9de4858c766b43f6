//! Prune command - delete cache files

use crate::cache::CacheContext;
use crate::cli::args::PruneArgs;
use crate::error::PomodoroResult;
use crate::maintenance;
use crate::ui::{self, UiContext};

/// Execute the prune command
pub async fn execute(args: PruneArgs, cache: &CacheContext) -> PomodoroResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);

    let target = match &args.namespace {
        Some(ns) => format!("cache files of \"{}\"", ns),
        None => "all cache files".to_string(),
    };
    let prompt = format!("Delete {} in {}?", target, cache.dir().display());

    // Non-interactive runs need --yes
    if !ui::confirm(&ctx, &prompt, false).await? {
        ui::step_info(&ctx, "Aborted (use --yes to prune without a prompt)");
        return Ok(());
    }

    let report = maintenance::prune(cache, args.namespace.as_deref()).await?;

    for name in &report.removed {
        ui::step_ok(&ctx, &format!("Removed {}", name));
    }
    for (name, reason) in &report.failed {
        ui::step_error_detail(&ctx, name, reason);
    }

    if report.failed.is_empty() {
        ui::outro_success(&ctx, &format!("Pruned {} file(s)", report.removed.len()));
    } else {
        ui::outro_error(
            &ctx,
            &format!(
                "Pruned {} file(s), {} failed",
                report.removed.len(),
                report.failed.len()
            ),
        );
    }

    report.into_result().map(|_| ())
}
