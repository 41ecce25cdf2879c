// src/utils/log.rs

//! Run-level log formatting.
//!
//! Thin helpers over the `log` facade so headers, progress lines and
//! summaries look the same for every source.

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(60);
    log::info!("{}", border);
    log::info!("  {}", title);
    log::info!("{}", border);
}

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    log::info!("[STEP {}/{}] {}", step_num, total, message);
}

/// Progress line for one accepted item.
pub fn progress(label: &str, position: usize, total: usize) {
    log::info!("{}", progress_line(label, position, total));
}

pub fn progress_line(label: &str, position: usize, total: usize) -> String {
    let pct = if total == 0 {
        100.0
    } else {
        position as f64 / total as f64 * 100.0
    };
    format!("{} ({} of {} - {:.2}%)", label, position, total, pct)
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    log::info!("    {}", message);
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    log::info!("[SUMMARY] {}", title);
    for (key, value) in items {
        log::info!("    {}: {}", key, value);
    }
}
