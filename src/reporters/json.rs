//! JSON reporter
//!
//! One file renders as the bare metadata object; a batch renders as an array
//! of `{"file": ..., "metadata": ...}` or `{"file": ..., "error": ...}`.

use crate::models::SourceMetadata;
use crate::pipeline::ParsedFile;
use anyhow::Result;
use serde_json::json;

/// Render metadata as pretty-printed JSON
pub fn render(metadata: &SourceMetadata) -> Result<String> {
    Ok(serde_json::to_string_pretty(metadata)?)
}

/// Render metadata as compact JSON (single line)
pub fn render_compact(metadata: &SourceMetadata) -> Result<String> {
    Ok(serde_json::to_string(metadata)?)
}

pub fn render_batch(files: &[ParsedFile]) -> Result<String> {
    let entries: Vec<serde_json::Value> = files
        .iter()
        .map(|file| {
            let name = file.path.display().to_string();
            match &file.result {
                Ok(metadata) => json!({ "file": name, "metadata": metadata }),
                Err(message) => json!({ "file": name, "error": message }),
            }
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CallInfo, MethodDescriptor};
    use std::path::PathBuf;

    fn sample() -> SourceMetadata {
        SourceMetadata {
            file_name: "LoginTest.java".to_string(),
            class_name: "LoginTest".to_string(),
            methods: vec![MethodDescriptor {
                name: "testLogin".to_string(),
                annotations: vec!["Test".to_string()],
                calls: vec![CallInfo::new(
                    "findElement",
                    Some("driver".to_string()),
                    vec!["By.id(\"u\")".to_string()],
                )],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_json_render_valid() {
        let json_str = render(&sample()).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["class_name"], "LoginTest");
        assert_eq!(parsed["uses_test_framework"], false);
        assert_eq!(parsed["methods"][0]["calls"][0]["qualifier"], "driver");
        assert_eq!(parsed["methods"][0]["calls"][0]["arguments"][0], "By.id(\"u\")");
    }

    #[test]
    fn test_json_render_compact() {
        let json_str = render_compact(&sample()).expect("render compact JSON");
        assert!(!json_str.contains('\n'));
        let back: SourceMetadata = serde_json::from_str(&json_str).expect("parse compact JSON");
        assert_eq!(back, sample());
    }

    #[test]
    fn test_json_batch_entries() {
        let files = vec![
            ParsedFile {
                path: PathBuf::from("LoginTest.java"),
                result: Ok(sample()),
            },
            ParsedFile {
                path: PathBuf::from("Broken.java"),
                result: Err("Java syntax error: boom".to_string()),
            },
        ];
        let parsed: serde_json::Value =
            serde_json::from_str(&render_batch(&files).unwrap()).expect("parse JSON");
        let entries = parsed.as_array().expect("array");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["metadata"]["class_name"], "LoginTest");
        assert!(entries[0].get("error").is_none());
        assert_eq!(entries[1]["file"], "Broken.java");
        assert_eq!(entries[1]["error"], "Java syntax error: boom");
    }
}
