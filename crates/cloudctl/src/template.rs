//! Field templates for `--output template`.
//!
//! A template is plain text with `{{ .Field.Sub }}` placeholders that are
//! looked up in the item serialized to JSON. `{{ . }}` prints the whole item.
//! Array elements are addressed by index, e.g. `{{ .Keys.0.AccessKey }}`.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

/// Printed for paths that do not resolve.
pub const NO_VALUE: &str = "<no value>";

const PLACEHOLDER: &str = r"\{\{\s*\.([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*)?\s*\}\}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Field(Vec<String>),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    parts: Vec<Part>,
}

impl Template {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns an error for `{{` or `}}` outside a valid placeholder.
    pub fn parse(source: &str) -> Result<Self, CliError> {
        let placeholder =
            Regex::new(PLACEHOLDER).map_err(|e| CliError::Format(format!("template: {e}")))?;

        let mut parts = Vec::new();
        let mut last = 0;
        for caps in placeholder.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_text(&mut parts, &source[last..whole.start()])?;
            let path = caps
                .get(1)
                .map(|m| m.as_str().split('.').map(str::to_string).collect())
                .unwrap_or_default();
            parts.push(Part::Field(path));
            last = whole.end();
        }
        push_text(&mut parts, &source[last..])?;

        Ok(Self { parts })
    }

    /// Render the template against a serializable item.
    ///
    /// # Errors
    ///
    /// Returns an error if the item cannot be serialized.
    pub fn render<T: Serialize + ?Sized>(&self, item: &T) -> Result<String, CliError> {
        let value = serde_json::to_value(item)?;
        Ok(self.render_value(&value))
    }

    /// Render the template against a JSON value.
    pub fn render_value(&self, value: &Value) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Field(path) => match lookup(value, path) {
                    Some(found) => out.push_str(&display(found)),
                    None => out.push_str(NO_VALUE),
                },
            }
        }
        out
    }
}

fn push_text(parts: &mut Vec<Part>, text: &str) -> Result<(), CliError> {
    if text.contains("{{") || text.contains("}}") {
        return Err(CliError::InvalidArgument(format!(
            "invalid template near '{text}': placeholders look like {{{{ .Field }}}}"
        )));
    }
    if !text.is_empty() {
        parts.push(Part::Text(text.to_string()));
    }
    Ok(())
}

fn lookup<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => NO_VALUE.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
