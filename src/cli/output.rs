//! Human and JSON rendering of command results.

use serde::Serialize;

/// A command result that can be shown either way
pub trait CommandOutput: Serialize {
    /// Plain text for a terminal
    fn to_human(&self) -> String;
    /// Value printed with `--json`
    fn to_json(&self) -> serde_json::Value;
}

/// Print `result` to stdout in the selected mode.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        print_json(&result.to_json());
    } else {
        println!("{}", result.to_human());
    }
}

/// JSON body reported on stdout when a run fails in `--json` mode.
pub fn error_json(err: &anyhow::Error) -> serde_json::Value {
    serde_json::json!({ "success": false, "error": format!("{err:#}") })
}

pub(crate) fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}
