//! Request and context payload loading.

use std::path::Path;

use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;

/// Loads a JSON payload from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Loads a request payload, defaulting the idempotency token.
///
/// Handler requests normally arrive with an orchestrator-assigned token;
/// for local invocations a fresh one is generated when absent.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_request(path: &Path) -> Result<Value> {
    let mut request = load_json(path)?;
    if let Some(map) = request.as_object_mut() {
        map.entry("clientRequestToken")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_token_is_generated() {
        let file = write_temp(r#"{"desiredResourceState": {"UserName": "u"}}"#);
        let request = load_request(file.path()).unwrap();
        assert!(request["clientRequestToken"].as_str().is_some());
    }

    #[test]
    fn test_existing_token_is_preserved() {
        let file = write_temp(r#"{"clientRequestToken": "token-1"}"#);
        let request = load_request(file.path()).unwrap();
        assert_eq!(request["clientRequestToken"], "token-1");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let file = write_temp("{not json");
        assert!(load_json(file.path()).is_err());
    }
}
