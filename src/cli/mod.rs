//! Command-line front end over the gateway client.

pub mod commands;
pub mod display;
pub mod types;

pub use types::{Cli, Commands};

/// Report a failed command and exit with status 1.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{body}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
