//! CLI command implementations

pub mod config;
pub mod lint;
pub mod list;
pub mod prune;
pub mod stats;

pub use config::execute as config;
pub use lint::execute as lint;
pub use list::execute as list;
pub use prune::execute as prune;
pub use stats::execute as stats;

/// Human-readable byte count
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
