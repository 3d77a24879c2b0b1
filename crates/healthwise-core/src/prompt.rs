//! Prompt templates with `{{{field}}}` placeholders.
//!
//! A template is filled from the flow input after it has been serialized to a
//! JSON object. Strings are inserted verbatim, numbers and booleans in their
//! display form, arrays and objects as compact JSON.

use serde::Serialize;
use serde_json::Value;

use healthwise_contracts::error::{HealthwiseError, HealthwiseResult};

/// A fixed prompt text with named placeholders.
///
/// Both `{{{name}}}` and `{{name}}` are accepted and behave the same; no
/// escaping is applied.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    /// Names of every placeholder, in order of appearance.
    pub fn placeholders(&self) -> HealthwiseResult<Vec<String>> {
        let mut names = Vec::new();
        self.walk(|segment| {
            if let Segment::Placeholder(name) = segment {
                names.push(name.to_string());
            }
            Ok(())
        })?;
        Ok(names)
    }

    /// Fill the template from `input`, which must serialize to a JSON object.
    ///
    /// Returns `ConfigError` for an unterminated placeholder or one whose
    /// name is not a key of the serialized input.
    pub fn render<I: Serialize>(&self, input: &I) -> HealthwiseResult<String> {
        let value = serde_json::to_value(input).map_err(|e| {
            HealthwiseError::config(format!("prompt input is not serializable: {e}"))
        })?;
        let fields = value.as_object().ok_or_else(|| {
            HealthwiseError::config("prompt input must serialize to a JSON object")
        })?;

        let mut out = String::with_capacity(self.source.len());
        self.walk(|segment| {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let field = fields.get(name).ok_or_else(|| {
                        HealthwiseError::config(format!(
                            "prompt placeholder '{name}' has no matching input field"
                        ))
                    })?;
                    out.push_str(&display_value(field));
                }
            }
            Ok(())
        })?;
        Ok(out)
    }

    fn walk<'a>(
        &'a self,
        mut visit: impl FnMut(Segment<'a>) -> HealthwiseResult<()>,
    ) -> HealthwiseResult<()> {
        let mut rest = self.source.as_str();
        while let Some(start) = rest.find("{{") {
            visit(Segment::Text(&rest[..start]))?;

            let tail = &rest[start..];
            let (open, close) = if tail.starts_with("{{{") {
                ("{{{", "}}}")
            } else {
                ("{{", "}}")
            };
            let body = &tail[open.len()..];
            let end = body.find(close).ok_or_else(|| {
                HealthwiseError::config(format!(
                    "unterminated placeholder starting at byte {start} of prompt template"
                ))
            })?;

            visit(Segment::Placeholder(body[..end].trim()))?;
            rest = &body[end + close.len()..];
        }
        visit(Segment::Text(rest))
    }
}

enum Segment<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        // Whole floats print without a trailing ".0".
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{:.0}", f),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
