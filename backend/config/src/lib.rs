//! `taskpilot-config`: TaskPilot runtime configuration management.
//!
//! Provides:
//! - Typed config schema (LLM, search, browse, workspace, speech, logging)
//! - YAML read/write
//! - `${ENV_VAR}` substitution and well-known env overrides
//! - Config redaction for safe display
//! - Default value application
//! - Validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use schema::{
    BrowseConfig, LlmConfig, LoggingConfig, SearchConfig, SpeechConfig, TaskPilotConfig,
    WorkspaceConfig,
};
pub use io::{config_dir, config_file_path, load_config, parse_config, write_config};
pub use env::{
    apply_env_overrides, apply_env_overrides_with, collect_referenced_vars, resolve_env_vars,
    resolve_env_vars_with, MissingEnvVarError,
};
pub use redact::{collect_redacted_paths, redact};
pub use defaults::apply_all_defaults;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load, substitute env vars, apply env overrides and defaults, and validate.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<TaskPilotConfig> {
    let raw_config = load_config(path).await?;
    prepare(raw_config, resolve_env_vars)
}

fn prepare(
    raw_config: TaskPilotConfig,
    substitute: impl Fn(&Value) -> Result<Value>,
) -> Result<TaskPilotConfig> {
    let value: Value =
        serde_json::to_value(&raw_config).context("Failed to serialize config for processing")?;

    let value = substitute(&value).context("Failed to resolve env vars in config")?;

    let config: TaskPilotConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(apply_env_overrides(config));

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if let Some(first) = report.errors.first() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        anyhow::bail!("{first}");
    }

    Ok(config)
}

/// Redacted JSON rendering of a config, suitable for printing.
pub fn redacted_json(config: &TaskPilotConfig) -> Result<Value> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    Ok(redact(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn prepare_substitutes_and_defaults() {
        let raw = parse_config("search:\n  customSearchEngineId: ${TP_TEST_CX}\n").unwrap();
        let env: HashMap<String, String> =
            [("TP_TEST_CX".to_string(), "engine-1".to_string())].into_iter().collect();
        let cfg = prepare(raw, |v| resolve_env_vars_with(v, &env)).unwrap();
        assert_eq!(cfg.custom_search_engine_id(), Some("engine-1"));
        assert!(cfg.workspace.is_some());
    }

    #[test]
    fn prepare_rejects_invalid_config() {
        let raw = parse_config("speech:\n  provider: espeak\n").unwrap();
        let err = prepare(raw, |v| Ok(v.clone())).unwrap_err();
        assert!(err.to_string().contains("speech.provider"));
    }

    #[test]
    fn redacted_json_masks_keys() {
        let cfg = TaskPilotConfig {
            llm: Some(LlmConfig {
                api_key: Some("sk-verysecretvalue".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let value = redacted_json(&cfg).unwrap();
        assert_eq!(value["llm"]["apiKey"], "sk-v***");
    }
}
