use std::fs;
use std::path::Path;

use ww_core::Rule;

/// Read a blocklist saved in the server's JSON format.
pub fn read_rules(path: &Path) -> Result<Vec<Rule>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("Invalid blocklist '{}': {}", path.display(), e))
}
