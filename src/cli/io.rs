//! JSON I/O handling for CLI
//!
//! - Input: one JSON document from a file or stdin
//! - Output: one JSON object on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Reads a JSON document; a path of `-` reads stdin.
pub fn read_document(path: &Path) -> CliResult<Value> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)
            .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?
    };

    if content.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(serde_json::from_str(&content)?)
}

/// Write a JSON value to stdout
pub fn write_json(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");
        fs::write(&path, r#"{"actorId": "GB123456789012"}"#).unwrap();

        let value = read_document(&path).unwrap();
        assert_eq!(value["actorId"], "GB123456789012");
    }

    #[test]
    fn test_read_document_errors() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_document(&temp_dir.path().join("missing.json")).is_err());

        let empty = temp_dir.path().join("empty.json");
        fs::write(&empty, "  \n").unwrap();
        assert!(read_document(&empty).is_err());

        let broken = temp_dir.path().join("broken.json");
        fs::write(&broken, "{").unwrap();
        assert!(read_document(&broken).is_err());
    }
}
