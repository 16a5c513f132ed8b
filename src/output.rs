//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Config
//!     motion.toml
//! Watchers
//!     reveal: threshold 0.1, root margin 0px 0px -50px 0px
//!     lazy: threshold 0.1, root margin 50px 0px 50px 0px
//! Timing
//!     rate limit: frame
//!     navbar threshold: 100px
//!     menu close delay: 300ms
//!     swipe threshold: 50px
//! Beam
//!     mode: static
//! Overrides
//!     menu.close_delay_ms = 250
//! ```
//!
//! `Overrides` lists every leaf value that differs from the stock defaults,
//! as dotted TOML keys, so a page author can see what a layered set of files
//! actually changes.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use std::path::Path;

use crate::config::{MotionConfig, stock_defaults_value};
use crate::throttle::RateLimit;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn section(out: &mut Vec<String>, title: &str, lines: impl IntoIterator<Item = String>) {
    out.push(title.to_string());
    out.extend(lines.into_iter().map(|line| format!("{}{}", indent(1), line)));
}

fn format_rate_limit(limit: RateLimit) -> String {
    match limit {
        RateLimit::Frame => "frame".to_string(),
        RateLimit::Interval(interval) => format!("every {}ms", interval.as_millis()),
    }
}

/// Dotted keys of every leaf in `current` that differs from `base`.
fn changed_keys(base: Option<&toml::Value>, current: &toml::Value, prefix: &str, out: &mut Vec<String>) {
    match current {
        toml::Value::Table(table) => {
            for (key, value) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                let base_value = base.and_then(|b| b.get(key));
                changed_keys(base_value, value, &path, out);
            }
        }
        leaf => {
            if base != Some(leaf) {
                out.push(format!("{prefix} = {leaf}"));
            }
        }
    }
}

/// Values in `config` that differ from the stock defaults.
pub fn format_overrides(config: &MotionConfig) -> Vec<String> {
    let Ok(current) = toml::Value::try_from(config) else {
        return Vec::new();
    };
    let stock = stock_defaults_value();
    let mut out = Vec::new();
    changed_keys(Some(&stock), &current, "", &mut out);
    out
}

/// Summary printed by `check` for a loaded and validated config.
pub fn format_check_output<P: AsRef<Path>>(paths: &[P], config: &MotionConfig) -> Vec<String> {
    let mut out = Vec::new();

    let sources: Vec<String> = if paths.is_empty() {
        vec!["(stock defaults)".to_string()]
    } else {
        paths
            .iter()
            .map(|p| p.as_ref().display().to_string())
            .collect()
    };
    section(&mut out, "Config", sources);

    let reveal = config.reveal_watch();
    let lazy = config.lazy_watch();
    section(
        &mut out,
        "Watchers",
        [
            format!(
                "reveal: threshold {}, root margin {}",
                reveal.threshold,
                reveal.to_css_margin()
            ),
            format!(
                "lazy: threshold {}, root margin {}",
                lazy.threshold,
                lazy.to_css_margin()
            ),
        ],
    );

    section(
        &mut out,
        "Timing",
        [
            format!("rate limit: {}", format_rate_limit(config.rate_limit())),
            format!("navbar threshold: {}px", config.navbar.threshold_px),
            format!("menu close delay: {}ms", config.menu.close_delay_ms),
            format!("swipe threshold: {}px", config.menu.swipe_threshold_px),
        ],
    );

    section(
        &mut out,
        "Beam",
        [format!(
            "mode: {}",
            format!("{:?}", config.beam.mode).to_lowercase()
        )],
    );

    let overrides = format_overrides(config);
    if overrides.is_empty() {
        section(&mut out, "Overrides", ["(none)".to_string()]);
    } else {
        section(&mut out, "Overrides", overrides);
    }
    out
}

pub fn print_check_output<P: AsRef<Path>>(paths: &[P], config: &MotionConfig) {
    for line in format_check_output(paths, config) {
        println!("{}", line);
    }
}
