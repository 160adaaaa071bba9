use serde_json::Value;

use crate::error::{IndexError, Result};

/// Page parameters keyed by lowercased front matter name.
pub type Params = serde_json::Map<String, Value>;

/// Split a content file into its front matter parameters and body.
///
/// Recognizes YAML (`---`), TOML (`+++`) and JSON (leading `{`) front
/// matter. A file without front matter is all body.
pub fn split<'a>(path: &str, source: &'a str) -> Result<(Params, &'a str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let first_line = source.lines().next().unwrap_or("").trim_end();

    match first_line {
        "---" => {
            let (raw, body) = split_delimited(source, "---")
                .ok_or_else(|| front_matter_error(path, "unterminated YAML front matter"))?;
            let value: Value = serde_yaml::from_str(raw)
                .map_err(|e| front_matter_error(path, &format!("YAML: {e}")))?;
            Ok((into_params(path, value)?, body))
        }
        "+++" => {
            let (raw, body) = split_delimited(source, "+++")
                .ok_or_else(|| front_matter_error(path, "unterminated TOML front matter"))?;
            let table: toml::Table = toml::from_str(raw)
                .map_err(|e| front_matter_error(path, &format!("TOML: {e}")))?;
            let value = toml_to_json(toml::Value::Table(table));
            Ok((into_params(path, value)?, body))
        }
        _ if source.starts_with('{') => {
            let mut stream = serde_json::Deserializer::from_str(source).into_iter::<Value>();
            let value = match stream.next() {
                Some(Ok(value)) => value,
                Some(Err(e)) => return Err(front_matter_error(path, &format!("JSON: {e}"))),
                None => return Err(front_matter_error(path, "empty JSON front matter")),
            };
            let body = &source[stream.byte_offset()..];
            Ok((into_params(path, value)?, body.trim_start_matches(['\r', '\n'])))
        }
        _ => Ok((Params::new(), source)),
    }
}

/// Locate the closing delimiter line; returns the raw front matter and the
/// body that follows it.
fn split_delimited<'a>(source: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    let first_line_end = source.find('\n')?;
    let rest = &source[first_line_end + 1..];

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn into_params(path: &str, value: Value) -> Result<Params> {
    match value {
        Value::Null => Ok(Params::new()),
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect()),
        other => Err(front_matter_error(
            path,
            &format!("expected a map of parameters, found {other}"),
        )),
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

fn front_matter_error(path: &str, message: &str) -> IndexError {
    IndexError::FrontMatter {
        path: path.to_string(),
        message: message.to_string(),
    }
}
