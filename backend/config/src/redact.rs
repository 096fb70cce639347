//! Config redaction: produce safe-to-print config snapshots by masking secrets.

use serde_json::Value;

/// Field names whose string values are secrets.
static SECRET_KEYS: &[&str] = &["apiKey", "api_key", "googleApiKey", "google_api_key", "token", "secret", "password"];

/// Redact a config JSON value, replacing sensitive fields with a short hint.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if !is_sensitive_key(key) || s.is_empty() {
        return Value::String(s.to_string());
    }
    // Preserve a 4-char hint so users can tell which key is loaded.
    let hint = if s.chars().count() > 8 {
        format!("{}***", s.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    };
    Value::String(hint)
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Collect all field paths that would be redacted (for diagnostics).
pub fn collect_redacted_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths_recursive(value, "", &mut paths);
    paths
}

fn collect_paths_recursive(value: &Value, path: &str, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() => {
            let key = path.rsplit('.').next().unwrap_or("");
            if is_sensitive_key(key) {
                out.push(path.to_string());
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                let child_path = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                collect_paths_recursive(v, &child_path, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_api_keys() {
        let v = json!({
            "llm": { "apiKey": "sk-abcdef123456", "fastModel": "gpt-3.5-turbo" },
            "search": { "googleApiKey": "AIzaSyExample0000" }
        });
        let redacted = redact(&v);
        assert_eq!(redacted["llm"]["apiKey"], "sk-a***");
        assert_eq!(redacted["llm"]["fastModel"], "gpt-3.5-turbo");
        assert_eq!(redacted["search"]["googleApiKey"], "AIza***");
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        let redacted = redact(&json!({ "speech": { "apiKey": "abc" } }));
        assert_eq!(redacted["speech"]["apiKey"], "***");
    }

    #[test]
    fn collects_paths() {
        let v = json!({ "llm": { "apiKey": "x" }, "logging": { "level": "info" } });
        assert_eq!(collect_redacted_paths(&v), vec!["llm.apiKey".to_string()]);
    }
}
