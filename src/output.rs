//! Plain-text stdout reporting.
//!
//! ```text
//! Generated 1/2: x6.png
//! Generated 2/2: x7.png
//!
//! Done.
//! Base used: x5.png
//! Output folder: /assets/Finished
//! ```
//!
//! Format functions are pure and return lines; [`print_event`] writes them.
//! A failed run prints one [`format_error`] line to stderr instead.

use crate::runner::{RunEvent, RunSummary};

/// One line per written output.
pub fn format_progress(index: usize, total: usize, output_name: &str) -> String {
    format!("Generated {index}/{total}: {output_name}")
}

/// Completion block, preceded by a blank line.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    vec![
        String::new(),
        "Done.".to_string(),
        format!("Base used: {}", summary.base_name),
        format!("Output folder: {}", summary.output_dir.display()),
    ]
}

pub fn format_event(event: &RunEvent) -> Vec<String> {
    match event {
        RunEvent::Generated {
            index,
            total,
            output_name,
        } => vec![format_progress(*index, *total, output_name)],
        RunEvent::Completed(summary) => format_summary(summary),
    }
}

pub fn print_event(event: &RunEvent) {
    for line in format_event(event) {
        println!("{line}");
    }
}

/// Human-readable failure line. Error messages already carry their cause.
pub fn format_error(err: &dyn std::error::Error) -> String {
    format!("Error: {err}")
}
