//! Environment handling for config values.
//!
//! Two passes run at load time:
//! - `${VAR_NAME}` substitution in string values (uppercase names only,
//!   `$${VAR}` escapes to a literal `${VAR}`)
//! - well-known variables (`OPENAI_API_KEY`, `GOOGLE_API_KEY`, ...) override
//!   the corresponding fields

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{LlmConfig, SearchConfig, SpeechConfig, TaskPilotConfig, WorkspaceConfig};

/// `$${NAME}` (escaped) or `${NAME}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid regex"));

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    substitute_value(value, &std::env::vars().collect(), "")
}

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let whole = &caps[0];
        let var_name = &caps[1];
        if whole.starts_with("$$") {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Override config fields from well-known environment variables.
pub fn apply_env_overrides(config: TaskPilotConfig) -> TaskPilotConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

pub fn apply_env_overrides_with(
    mut config: TaskPilotConfig,
    env: &HashMap<String, String>,
) -> TaskPilotConfig {
    let var = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();

    if let Some(key) = var("OPENAI_API_KEY") {
        config.llm.get_or_insert_with(LlmConfig::default).api_key = Some(key);
    }
    if let Some(url) = var("OPENAI_BASE_URL") {
        config.llm.get_or_insert_with(LlmConfig::default).base_url = Some(url);
    }
    if let Some(model) = var("FAST_LLM_MODEL") {
        config.llm.get_or_insert_with(LlmConfig::default).fast_model = Some(model);
    }
    if let Some(model) = var("SMART_LLM_MODEL") {
        config.llm.get_or_insert_with(LlmConfig::default).smart_model = Some(model);
    }
    if let Some(key) = var("GOOGLE_API_KEY") {
        config.search.get_or_insert_with(SearchConfig::default).google_api_key = Some(key);
    }
    if let Some(id) = var("CUSTOM_SEARCH_ENGINE_ID") {
        config.search.get_or_insert_with(SearchConfig::default).custom_search_engine_id = Some(id);
    }
    if let Some(flag) = var("SPEAK_MODE") {
        let enabled = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        config.speech.get_or_insert_with(SpeechConfig::default).enabled = Some(enabled);
    }
    if let Some(key) = var("ELEVENLABS_API_KEY") {
        let speech = config.speech.get_or_insert_with(SpeechConfig::default);
        speech.api_key.get_or_insert(key);
        speech.provider.get_or_insert_with(|| "elevenlabs".to_string());
    }
    if let Some(dir) = var("TASKPILOT_WORKSPACE") {
        config.workspace.get_or_insert_with(WorkspaceConfig::default).dir = Some(dir);
    }
    config
}

/// Collect all env var names referenced in a config value tree (for diagnostics).
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_vars_recursive(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn collect_vars_recursive(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_VAR_PATTERN.captures_iter(s) {
                if !caps[0].starts_with("$$") {
                    out.push(caps[1].to_string());
                }
            }
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_vars_recursive(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_vars_recursive(v, out)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"llm": {"apiKey": "${OPENAI_API_KEY}"}});
        let env = env(&[("OPENAI_API_KEY", "sk-abc123")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["llm"]["apiKey"], "sk-abc123");
    }

    #[test]
    fn error_on_missing_var() {
        let v = json!({"key": "${MISSING_VAR}"});
        let result = resolve_env_vars_with(&v, &HashMap::new());
        assert!(result.unwrap_err().to_string().contains("MISSING_VAR"));
    }

    #[test]
    fn escaped_reference_is_kept_literal() {
        let v = json!({"note": "$${HOME} stays"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["note"], "${HOME} stays");
    }

    #[test]
    fn collects_referenced_vars() {
        let v = json!({"a": "${FOO}", "b": {"c": "${BAR}"}, "d": "$${SKIP}"});
        assert_eq!(collect_referenced_vars(&v), vec!["BAR".to_string(), "FOO".to_string()]);
    }

    #[test]
    fn overrides_from_environment() {
        let env = env(&[
            ("GOOGLE_API_KEY", "g-key"),
            ("CUSTOM_SEARCH_ENGINE_ID", "cx"),
            ("SPEAK_MODE", "True"),
            ("FAST_LLM_MODEL", "gpt-4o-mini"),
        ]);
        let cfg = apply_env_overrides_with(TaskPilotConfig::default(), &env);
        assert_eq!(cfg.google_api_key(), Some("g-key"));
        assert_eq!(cfg.custom_search_engine_id(), Some("cx"));
        assert!(cfg.speak_mode());
        assert_eq!(cfg.fast_llm_model(), "gpt-4o-mini");
    }

    #[test]
    fn empty_env_values_do_not_override() {
        let mut cfg = TaskPilotConfig::default();
        cfg.search = Some(SearchConfig {
            google_api_key: Some("from-file".into()),
            ..Default::default()
        });
        let cfg = apply_env_overrides_with(cfg, &env(&[("GOOGLE_API_KEY", "")]));
        assert_eq!(cfg.google_api_key(), Some("from-file"));
    }
}
