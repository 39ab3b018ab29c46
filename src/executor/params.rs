//! Request parameter preparation.
//!
//! Turns a URL template, a parameter schema and the caller's arguments into the
//! concrete URL and the parameter set sent as query string or JSON body.
//! Coercion is lenient: a value that cannot be converted is forwarded as-is, and
//! required parameters are not enforced here.

use crate::executor::Arguments;
use crate::tools::{ParamSpec, ParamType};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Outcome of [`prepare`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub url: String,
    pub params: Arguments,
}

/// Resolve path placeholders, coerce typed arguments and inject defaults.
pub fn prepare(
    url_template: &str,
    schema: &BTreeMap<String, ParamSpec>,
    arguments: &Arguments,
) -> PreparedRequest {
    let mut params = merge_params(schema, arguments);
    let (url, used) = substitute_path_params(url_template, arguments);
    for name in &used {
        params.remove(name);
    }
    PreparedRequest { url, params }
}

/// Arguments coerced per schema, plus defaults for schema entries not supplied.
pub fn merge_params(schema: &BTreeMap<String, ParamSpec>, arguments: &Arguments) -> Arguments {
    let mut params = Arguments::new();

    for (name, value) in arguments {
        let value = match schema.get(name) {
            Some(spec) => coerce(&spec.param_type, value),
            None => value.clone(),
        };
        params.insert(name.clone(), value);
    }

    for (name, spec) in schema {
        if params.contains_key(name) {
            continue;
        }
        if let Some(default) = &spec.default {
            params.insert(name.clone(), default.clone());
        }
    }

    params
}

/// Convert textual values for `number` and `integer` parameters.
pub fn coerce(param_type: &ParamType, value: &Value) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };
    let text = text.trim();

    let converted = match param_type {
        ParamType::Number => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        ParamType::Integer => text.parse::<i64>().ok().map(Value::from),
        _ => None,
    };

    converted.unwrap_or_else(|| value.clone())
}

/// Replace `{name}` placeholders that have a matching argument.
///
/// Returns the resolved URL and the names that were substituted, in template
/// order. Values are percent-encoded.
pub fn substitute_path_params(template: &str, arguments: &Arguments) -> (String, Vec<String>) {
    let mut url = String::with_capacity(template.len());
    let mut used: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        url.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let name_len = after
            .find(|c: char| !is_word_char(c))
            .unwrap_or(after.len());
        let name = &after[..name_len];
        let closed = after[name_len..].starts_with('}');

        match arguments.get(name) {
            Some(value) if closed && !name.is_empty() => {
                url.push_str(&urlencoding::encode(&path_text(value)));
                if !used.iter().any(|u| u == name) {
                    used.push(name.to_string());
                }
                rest = &after[name_len + 1..];
            }
            _ => {
                url.push('{');
                rest = after;
            }
        }
    }
    url.push_str(rest);

    (url, used)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn path_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
