//! Clipboard integration.
//!
//! Uses arboard for cross-platform clipboard access. Copy carries the share
//! grid out; paste brings password-reset links in.

use anyhow::Result;
use arboard::Clipboard;

/// Copy text to the system clipboard.
pub fn copy(text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(()); // Nothing to copy
    }

    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    tracing::debug!("Copied {} bytes to clipboard", text.len());
    Ok(())
}

/// Paste text from the system clipboard.
pub fn paste() -> Result<String> {
    let mut clipboard = Clipboard::new()?;
    let text = clipboard.get_text()?;
    tracing::debug!("Pasted {} bytes from clipboard", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires clipboard access, may fail in CI
    fn test_copy_paste() {
        let test_text = "Ghotidle 2/5";

        copy(test_text).expect("Copy failed");
        let result = paste().expect("Paste failed");
        assert_eq!(result, test_text);
    }

    #[test]
    fn test_empty_copy() {
        // Should not fail on empty string
        assert!(copy("").is_ok());
    }
}
