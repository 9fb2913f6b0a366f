//! Display framework for CLI output formatting.
//!
//! Provides shared primitives for tables and detail views used across all
//! CLI command output.

pub mod detail;
pub mod records;
pub mod table;

use serde::Serialize;

pub use detail::DetailView;
pub use table::{book_table, list_table, render_list};

/// Trait for types that can be rendered as human-readable or JSON output.
pub trait CommandOutput: Serialize {
    /// Plain-text rendering for terminals.
    fn to_human(&self) -> String;

    /// JSON rendering; defaults to the serialized value.
    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Dispatch output based on JSON mode flag.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", result.to_human());
    }
}
