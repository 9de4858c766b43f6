//! List command - show cache files

use super::format_bytes;
use crate::cache::CacheContext;
use crate::cli::args::{ListArgs, OutputFormat};
use crate::error::PomodoroResult;
use crate::maintenance::{self, CacheFileInfo};
use crate::ui::{self, UiContext};
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, cache: &CacheContext) -> PomodoroResult<()> {
    let files = maintenance::list(cache).await?;

    if files.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_info(&ctx, "No cache files");
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&files),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&files)?),
        OutputFormat::Plain => {
            for file in &files {
                println!("{}", file.name);
            }
        }
    }

    Ok(())
}

fn print_table(files: &[CacheFileInfo]) {
    println!(
        "{:<60} {:>10} {:<17}",
        style("NAME").bold(),
        style("SIZE").bold(),
        style("MODIFIED").bold()
    );
    println!("{}", "-".repeat(89));

    for file in files {
        println!(
            "{:<60} {:>10} {:<17}",
            file.name,
            format_bytes(file.size),
            file.modified.format("%Y-%m-%d %H:%M")
        );
    }

    println!();
    println!("{} file(s)", files.len());
}
