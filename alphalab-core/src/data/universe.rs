//! Assets file — the list of symbols to trade.
//!
//! Plain text, one symbol per line. Blank lines and `#` comments are
//! skipped; repeated symbols keep their first position.

use super::provider::DataError;
use std::path::Path;

/// Load the symbol list from an assets file.
pub fn load_assets_file(path: &Path) -> Result<Vec<String>, DataError> {
    let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_assets(&content))
}

/// Parse assets file content.
pub fn parse_assets(content: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for line in content.lines() {
        let symbol = line.split('#').next().unwrap_or("").trim();
        if symbol.is_empty() || symbols.iter().any(|s| s == symbol) {
            continue;
        }
        symbols.push(symbol.to_string());
    }
    symbols
}
