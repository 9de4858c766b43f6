//! Stats command - summarize the cache directory

use super::format_bytes;
use crate::cache::CacheContext;
use crate::cli::args::{OutputFormat, StatsArgs};
use crate::error::PomodoroResult;
use crate::maintenance;
use crate::ui::{self, UiContext};

/// Execute the stats command
pub async fn execute(args: StatsArgs, cache: &CacheContext) -> PomodoroResult<()> {
    let stats = maintenance::stats(cache).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Plain => {
            println!("{}\t{}\t{}", stats.dir.display(), stats.files, stats.total_bytes)
        }
        OutputFormat::Table => {
            let ctx = UiContext::detect();
            ui::intro(&ctx, "Translation cache");
            ui::key_value(&ctx, "Directory", &stats.dir.display().to_string());
            ui::key_value(&ctx, "Files", &stats.files.to_string());
            ui::key_value(&ctx, "Size", &format_bytes(stats.total_bytes));
        }
    }

    Ok(())
}
