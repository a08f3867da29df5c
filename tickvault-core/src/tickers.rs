//! Ticker list loading.
//!
//! Two list formats exist in the wild here: a JSON array for the crypto
//! universe (`["BTC-USD", "ETH-USD"]`) and a newline-delimited text
//! file for equities. A missing or unreadable list is a hard error —
//! there is nothing useful a batch can do without one.

use std::fs;
use std::path::Path;

use crate::provider::DataError;

/// Load a JSON array of symbols from a file.
pub fn load_json_list(path: &Path) -> Result<Vec<String>, DataError> {
    let content = read_list(path)?;
    parse_json_list(&content).map_err(|message| list_error(path, message))
}

/// Parse a JSON array of symbols.
pub fn parse_json_list(content: &str) -> Result<Vec<String>, String> {
    serde_json::from_str(content).map_err(|e| format!("parse JSON list: {e}"))
}

/// Load a newline-delimited symbol list from a file.
pub fn load_text_list(path: &Path) -> Result<Vec<String>, DataError> {
    let content = read_list(path)?;
    Ok(parse_text_list(&content))
}

/// Parse a newline-delimited symbol list: whitespace is trimmed, blank
/// lines and `#` comments are skipped.
pub fn parse_text_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

fn read_list(path: &Path) -> Result<String, DataError> {
    fs::read_to_string(path).map_err(|e| list_error(path, format!("read: {e}")))
}

fn list_error(path: &Path, message: String) -> DataError {
    DataError::TickerList {
        path: path.display().to_string(),
        message,
    }
}
