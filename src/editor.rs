//! External editor round-trip for raw JSON bodies.
//!
//! The session asks for an edit ([`EditorRequest`]), the UI loop releases the
//! terminal and calls [`run`], then hands the [`EditorOutcome`] back to the
//! session, which decides what the content means.

use std::collections::HashMap;
use std::process::Command;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::constants::FALLBACK_EDITOR;
use crate::discovery::Endpoint;
use crate::error::ValidationError;
use crate::request::coerce;

/// Text to open in the editor
#[derive(Clone, Debug, PartialEq)]
pub struct EditorRequest {
    pub seed: String,
}

/// What came back from the editor.
///
/// `content` is `None` only when nothing could be edited at all (temp file
/// or launch failure). A non-zero exit still returns whatever was saved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorOutcome {
    pub content: Option<String>,
    pub failure: Option<String>,
}

impl EditorOutcome {
    fn failed(message: String) -> Self {
        EditorOutcome {
            content: None,
            failure: Some(message),
        }
    }
}

/// Initial editor text: the current raw body if any, otherwise an object
/// built from defaults, examples and entered field values.
pub fn seed_body(
    endpoint: &Endpoint,
    body_values: &HashMap<String, String>,
    raw_body: Option<&str>,
) -> String {
    if let Some(raw) = raw_body.filter(|r| !r.trim().is_empty()) {
        return format!("{}\n", raw.trim_end());
    }

    let mut object = Map::new();
    for field in endpoint.body_fields() {
        let value = field
            .default
            .as_deref()
            .or(field.example.as_deref())
            .or(body_values.get(&field.name).map(String::as_str))
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(value) = value {
            let json = coerce(field.field_type, value).unwrap_or_else(|| Value::String(value.to_string()));
            object.insert(field.name.clone(), json);
        }
    }

    match serde_json::to_string_pretty(&Value::Object(object)) {
        Ok(text) => format!("{}\n", text),
        Err(_) => "{}\n".to_string(),
    }
}

/// Interpret edited text. Blank means "no raw body"; otherwise it must be
/// exactly one JSON value and is stored pretty-printed, numbers as written.
pub fn parse_edited_body(content: &str) -> Result<Option<String>, ValidationError> {
    if content.trim().is_empty() {
        return Ok(None);
    }

    let mut values = serde_json::Deserializer::from_str(content).into_iter::<Value>();
    let value = match values.next() {
        Some(Ok(value)) => value,
        Some(Err(e)) => return Err(ValidationError::MalformedRawBody(e.to_string())),
        None => return Ok(None),
    };
    match values.next() {
        None => {}
        Some(Ok(_)) => {
            return Err(ValidationError::MalformedRawBody(
                "expected a single JSON value".to_string(),
            ))
        }
        Some(Err(e)) => return Err(ValidationError::MalformedRawBody(e.to_string())),
    }

    serde_json::to_string_pretty(&value)
        .map(Some)
        .map_err(|e| ValidationError::MalformedRawBody(e.to_string()))
}

/// Split an editor command line on whitespace
pub fn split_command(command: &str) -> Vec<String> {
    let parts: Vec<String> = command.split_whitespace().map(String::from).collect();
    if parts.is_empty() {
        vec![FALLBACK_EDITOR.to_string()]
    } else {
        parts
    }
}

/// Write the seed to a temp file, run the editor on it and read it back.
///
/// Blocks until the editor exits; the caller must have released the terminal.
pub fn run(command: &str, request: &EditorRequest) -> EditorOutcome {
    let file = match tempfile::Builder::new()
        .prefix("specdeck-body-")
        .suffix(".json")
        .tempfile()
    {
        Ok(file) => file,
        Err(e) => return EditorOutcome::failed(format!("could not create temp file: {}", e)),
    };
    if let Err(e) = std::fs::write(file.path(), &request.seed) {
        return EditorOutcome::failed(format!("could not write temp file: {}", e));
    }

    let parts = split_command(command);
    let (program, args) = parts.split_at(1);
    let program = &program[0];
    debug!(program = %program, path = %file.path().display(), "launching editor");

    let failure = match Command::new(program).args(args).arg(file.path()).status() {
        Ok(status) if status.success() => None,
        Ok(status) => Some(format!("editor {} exited with {}", program, status)),
        Err(e) => {
            warn!(program = %program, error = %e, "editor failed to launch");
            return EditorOutcome::failed(format!("failed to launch editor {}: {}", program, e));
        }
    };

    // Editors may replace the file rather than write in place; read by path.
    let content = std::fs::read_to_string(file.path()).unwrap_or_default();
    EditorOutcome {
        content: Some(content),
        failure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{BodyField, BodySchema, ParamType};
    use crate::models::HttpMethod;

    fn create_user() -> Endpoint {
        let mut name = BodyField::new("name", ParamType::String);
        name.example = Some("Ada".into());
        let mut age = BodyField::new("age", ParamType::Integer);
        age.default = Some("30".into());
        let admin = BodyField::new("admin", ParamType::Boolean);
        let mut ep = Endpoint::new(HttpMethod::POST, "/users");
        ep.body = Some(BodySchema {
            supported: true,
            fields: vec![name, age, admin],
        });
        ep
    }

    #[test]
    fn seed_prefers_existing_raw_body() {
        let seed = seed_body(&create_user(), &HashMap::new(), Some("[1,2]"));
        assert_eq!(seed, "[1,2]\n");
    }

    #[test]
    fn seed_builds_typed_object_from_hints_and_values() {
        let mut values = HashMap::new();
        values.insert("admin".to_string(), "true".to_string());
        values.insert("age".to_string(), "99".to_string());
        let seed = seed_body(&create_user(), &values, None);
        let parsed: Value = serde_json::from_str(&seed).unwrap();
        // defaults beat entered values when seeding
        assert_eq!(parsed, serde_json::json!({"name": "Ada", "age": 30, "admin": true}));
        assert!(seed.ends_with('\n'));
    }

    #[test]
    fn seed_falls_back_to_string_and_empty_object() {
        let mut values = HashMap::new();
        values.insert("age".to_string(), "old".to_string());
        let mut ep = create_user();
        if let Some(body) = ep.body.as_mut() {
            body.fields[1].default = None;
        }
        let parsed: Value = serde_json::from_str(&seed_body(&ep, &values, None)).unwrap();
        assert_eq!(parsed["age"], serde_json::json!("old"));

        let bare = Endpoint::new(HttpMethod::POST, "/ping");
        assert_eq!(seed_body(&bare, &HashMap::new(), None), "{}\n");
    }

    #[test]
    fn edited_body_must_be_one_json_value() {
        assert_eq!(parse_edited_body("  \n"), Ok(None));
        assert_eq!(
            parse_edited_body("{\"a\":1}\n"),
            Ok(Some("{\n  \"a\": 1\n}".to_string()))
        );
        assert!(parse_edited_body("{\"a\":1} {\"b\":2}").is_err());
        assert!(parse_edited_body("{\"a\":1} trailing").is_err());
        assert!(parse_edited_body("{oops").is_err());
    }

    #[test]
    fn edited_body_keeps_numbers_as_written() {
        let body = parse_edited_body("{\"id\": 123456789012345678901234567890, \"price\": 1.10}")
            .unwrap()
            .unwrap();
        assert!(body.contains("123456789012345678901234567890"));
        assert!(body.contains("1.10"));
    }

    #[test]
    fn split_command_handles_arguments_and_blank() {
        assert_eq!(split_command("code --wait"), vec!["code", "--wait"]);
        assert_eq!(split_command("   "), vec!["vi"]);
    }

    #[cfg(unix)]
    #[test]
    fn run_reads_back_content_even_when_editor_fails() {
        // `true` leaves the seed untouched; `false` does too but reports failure
        let request = EditorRequest {
            seed: "{\"a\":1}\n".into(),
        };
        let ok = run("true", &request);
        assert_eq!(ok.content.as_deref(), Some("{\"a\":1}\n"));
        assert_eq!(ok.failure, None);

        let failed = run("false", &request);
        assert_eq!(failed.content.as_deref(), Some("{\"a\":1}\n"));
        assert!(failed.failure.is_some());
    }

    #[test]
    fn missing_editor_yields_no_content() {
        let outcome = run(
            "specdeck-no-such-editor-binary",
            &EditorRequest { seed: "{}".into() },
        );
        assert_eq!(outcome.content, None);
        assert!(outcome.failure.unwrap().contains("failed to launch"));
    }
}
