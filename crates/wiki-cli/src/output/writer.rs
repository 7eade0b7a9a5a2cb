//! Writing rendered output to stdout or a file.

use std::io::Write;
use std::path::Path;

use serde_json::Value;

use wiki_core::{Result, WikiError};

/// Plain rendering of a payload: strings verbatim, anything else pretty JSON.
pub fn format_plain(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

/// Write `content` newline-terminated to `target`. `None` and `-` mean stdout.
pub fn write_output(content: &str, target: Option<&str>) -> Result<()> {
    let mut text = content.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }

    match target {
        None | Some("-") => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| WikiError::internal(format!("Failed to write output: {}", e)))
        }
        Some(path) => std::fs::write(Path::new(path), text).map_err(|e| {
            WikiError::internal(format!("Failed to write output {}: {}", path, e))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_format_plain() {
        assert_eq!(format_plain(&json!("a,b\n1,2")), "a,b\n1,2");
        assert_eq!(format_plain(&json!({"id": "Q42"})), "{\n  \"id\": \"Q42\"\n}");
        assert_eq!(format_plain(&Value::Null), "null");
    }

    #[test]
    fn test_write_output_to_file_adds_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let target = path.to_string_lossy().to_string();

        write_output("{\"ok\":true}", Some(&target)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"ok\":true}\n");

        write_output("line\n", Some(&target)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line\n");
    }

    #[test]
    fn test_write_output_missing_dir_is_internal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let err = write_output("x", Some(&path.to_string_lossy())).unwrap_err();
        assert_eq!(err.code(), "E_INTERNAL");
    }
}
