//! Log Redaction Layer
//!
//! Scrubs API keys and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static OPENAI_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sk-[A-Za-z0-9_\-]{20,}").expect("valid regex"));
static GOOGLE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AIza[0-9A-Za-z_\-]{35}").expect("valid regex"));
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[A-Za-z0-9\-\._~+/]+=*").expect("valid regex"));
static KEY_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([?&]key=)[^&\s]+").expect("valid regex"));

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BEARER_RE.replace_all(input, "Bearer [REDACTED_TOKEN]");
    let redacted = OPENAI_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]");
    let redacted = GOOGLE_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]");
    KEY_PARAM_RE.replace_all(&redacted, "${1}[REDACTED_KEY]").into_owned()
}
