//! Directive parsing with a best-effort repair pass for model output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ParseError;
use crate::types::ParsedDirective;

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n?(.*?)(?:```|\z)").expect("valid regex"));

/// Parse a directive of the form `{"command": {"name": ..., "args": {...}}}`.
pub fn parse_directive(raw: &str) -> Result<ParsedDirective, ParseError> {
    let value = parse_json_lenient(raw).ok_or(ParseError::InvalidJson)?;
    directive_from_value(value)
}

/// Strict decode first, then the repair pass.
pub fn parse_json_lenient(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    let strict = serde_json::from_str::<Value>(trimmed).ok();
    if matches!(strict, Some(Value::Object(_))) {
        return strict;
    }
    let repaired = repair_json(trimmed).and_then(|fixed| {
        debug!(repaired = %fixed, "Attempting repaired directive");
        serde_json::from_str::<Value>(&fixed).ok()
    });
    repaired.or(strict)
}

/// Rewrite common model mistakes into parseable JSON. `None` when there is no object at all.
pub fn repair_json(text: &str) -> Option<String> {
    let unfenced = FENCE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|inner| inner.contains('{'))
        .unwrap_or(text);

    let object = slice_object(unfenced)?;
    let quoted = if object.contains('"') {
        object.to_string()
    } else {
        object.replace('\'', "\"")
    };
    Some(normalize(&quoted))
}

/// From the first `{` to its matching `}`, or to the end when it never closes.
fn slice_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    Some(&text[start..])
}

/// Escape control characters inside strings, drop trailing commas, and close
/// whatever is left open.
fn normalize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut closers = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(c),
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' => {
                closers.push('}');
                out.push(c);
            }
            '[' => {
                closers.push(']');
                out.push(c);
            }
            '}' | ']' => {
                if closers.last() == Some(&c) {
                    closers.pop();
                }
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    if in_string {
        if escaped {
            out.pop();
        }
        out.push('"');
    }
    out.truncate(out.trim_end().len());
    if out.ends_with(',') {
        out.pop();
    }
    if out.ends_with(':') {
        out.push_str(" null");
    }
    while let Some(close) = closers.pop() {
        out.push(close);
    }
    out
}

fn directive_from_value(value: Value) -> Result<ParsedDirective, ParseError> {
    let Value::Object(mut root) = value else {
        return Err(ParseError::Unknown("Directive must be a JSON object".into()));
    };
    let command = match root.remove("command") {
        None => return Err(ParseError::MissingCommand),
        Some(Value::Object(command)) => command,
        Some(_) => return Err(ParseError::Unknown("'command' must be an object".into())),
    };
    let name = match command.get("name") {
        None => return Err(ParseError::MissingName),
        Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
        Some(Value::String(_)) => {
            return Err(ParseError::Unknown("Command name must not be empty".into()));
        }
        Some(_) => return Err(ParseError::Unknown("Command name must be a string".into())),
    };
    let args = match command.get("args") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(args)) => args.clone(),
        Some(Value::String(s)) if s.trim().is_empty() => Map::new(),
        Some(Value::Array(items)) if items.is_empty() => Map::new(),
        Some(_) => return Err(ParseError::Unknown("'args' must be an object".into())),
    };
    Ok(ParsedDirective { name, args })
}
