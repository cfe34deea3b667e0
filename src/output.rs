//! CLI output formatting for enumeration and build passes.
//!
//! Output leads with the slug, the identity every other stage keys on. Image
//! diagnostics and output files are shown as indented context lines.
//!
//! # Output Format
//!
//! ## Paths
//!
//! ```text
//! Pages
//! 001 dynamic-routing
//! 002 hello-world
//! ```
//!
//! ## Build progress
//!
//! ```text
//! dynamic-routing (2 images sized)
//!     Missing size: /assets/blog/gone.png
//!         Reason: No such file or directory (os error 2)
//! hello-world (0 images sized)
//! broken: FAILED
//!     Failed to parse broken: Invalid YAML: ...
//! ```
//!
//! ## Summary
//!
//! ```text
//! Built 2 documents, 1 failed, 0 skipped, 1 image without size
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure
//! and never touch I/O.

use crate::pipeline::{BuildReport, PipelineEvent};
use crate::types::SlugIndex;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Paths
// ============================================================================

/// Format the slug index, one positional line per page.
pub fn format_slug_index(index: &SlugIndex) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    if index.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, path) in index.paths.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), path.slug));
    }
    lines
}

/// Print the slug index to stdout.
pub fn print_slug_index(index: &SlugIndex) {
    for line in format_slug_index(index) {
        println!("{}", line);
    }
}

// ============================================================================
// Build progress
// ============================================================================

/// Format a single pipeline event as display lines.
pub fn format_pipeline_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::ImageUnresolved(diagnostic) => vec![
            format!("{}Missing size: {}", indent(1), diagnostic.path),
            format!("{}Reason: {}", indent(2), diagnostic.reason),
        ],
        PipelineEvent::DocumentBuilt {
            slug, image_count, ..
        } => vec![format!(
            "{} ({} sized)",
            slug,
            plural(*image_count, "image", "images")
        )],
        PipelineEvent::DocumentFailed { slug, error } => vec![
            format!("{slug}: FAILED"),
            format!("{}{}", indent(1), error),
        ],
        PipelineEvent::DocumentSkipped { slug } => vec![format!("{slug}: skipped")],
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Format the end-of-pass summary, listing failed documents first.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        lines.push("Failed".to_string());
        for (slug, error) in failures {
            lines.push(format!("{}{}", indent(1), slug));
            lines.push(format!("{}{}", indent(2), error));
        }
    }

    lines.push(format!(
        "Built {}, {} failed, {} skipped, {} without size",
        plural(report.built_count(), "document", "documents"),
        report.failed_count(),
        report.skipped_count(),
        plural(report.unresolved_count(), "image", "images"),
    ));
    lines
}

/// Print the build summary to stdout.
pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}
