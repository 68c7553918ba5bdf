//! Request assembly - turns entered values into a concrete HTTP request

use std::collections::{BTreeMap, HashMap};

use reqwest::Url;
use serde_json::{Map, Number, Value};

use crate::discovery::{BodySchema, Endpoint, Param, ParamType};
use crate::error::ValidationError;
use crate::models::RequestSpec;

/// Build the request for `endpoint` from the values the user entered.
///
/// Blank values count as missing. A non-blank `raw_body` replaces the
/// field-built body, but only for methods that send a body.
pub fn build_request(
    base_url: &str,
    endpoint: &Endpoint,
    path_values: &HashMap<String, String>,
    query_values: &HashMap<String, String>,
    body_values: &HashMap<String, String>,
    raw_body: Option<&str>,
) -> Result<RequestSpec, ValidationError> {
    let path = substitute_path(&endpoint.path, &endpoint.path_params, path_values)?;
    let mut url = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), path))
        .map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    let pairs = query_pairs(&endpoint.query_params, query_values)?;
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    let body = match &endpoint.body {
        Some(schema) if endpoint.method.sends_body() => build_body(schema, body_values, raw_body)?,
        _ => None,
    };

    let mut headers = BTreeMap::new();
    if body.is_some() {
        headers.insert("Content-Type".to_string(), "application/json".to_string());
    }

    Ok(RequestSpec {
        method: endpoint.method,
        url: url.to_string(),
        headers,
        body,
    })
}

fn substitute_path(
    template: &str,
    params: &[Param],
    values: &HashMap<String, String>,
) -> Result<String, ValidationError> {
    let mut path = template.to_string();
    for param in params {
        let value = lookup(values, &param.name)
            .ok_or_else(|| ValidationError::MissingPathParam(param.name.clone()))?;
        path = path.replace(
            &format!("{{{}}}", param.name),
            &urlencoding::encode(value),
        );
    }
    Ok(path)
}

fn query_pairs(
    params: &[Param],
    values: &HashMap<String, String>,
) -> Result<Vec<(String, String)>, ValidationError> {
    let mut pairs = Vec::new();
    for param in params {
        let Some(value) = lookup(values, &param.name) else {
            if param.required {
                return Err(ValidationError::MissingQueryParam(param.name.clone()));
            }
            continue;
        };
        if coerce(param.param_type, value).is_none() {
            return Err(ValidationError::InvalidQueryParam {
                name: param.name.clone(),
                expected: param.param_type.as_str(),
            });
        }
        pairs.push((param.name.clone(), value.to_string()));
    }
    Ok(pairs)
}

fn build_body(
    schema: &BodySchema,
    values: &HashMap<String, String>,
    raw_body: Option<&str>,
) -> Result<Option<String>, ValidationError> {
    if let Some(raw) = raw_body.map(str::trim).filter(|r| !r.is_empty()) {
        serde_json::from_str::<Value>(raw)
            .map_err(|e| ValidationError::MalformedRawBody(e.to_string()))?;
        return Ok(Some(raw.to_string()));
    }
    if !schema.supported {
        return Ok(None);
    }

    let mut object = Map::new();
    for field in &schema.fields {
        let Some(value) = lookup(values, &field.name) else {
            if field.required {
                return Err(ValidationError::MissingBodyField(field.name.clone()));
            }
            continue;
        };
        let json = coerce(field.field_type, value).ok_or_else(|| ValidationError::InvalidBodyField {
            name: field.name.clone(),
            expected: field.field_type.as_str(),
        })?;
        object.insert(field.name.clone(), json);
    }

    if object.is_empty() {
        return Ok(None);
    }
    Ok(Some(Value::Object(object).to_string()))
}

/// Trimmed, non-blank value for `name`
fn lookup<'a>(values: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    values
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Typed JSON value for `raw`, or `None` when it does not parse as `kind`.
/// Strings and unknown types always succeed.
pub fn coerce(kind: ParamType, raw: &str) -> Option<Value> {
    match kind {
        ParamType::Integer => raw.parse::<i64>().ok().map(Value::from),
        ParamType::Number => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        ParamType::Boolean => parse_bool(raw).map(Value::Bool),
        ParamType::String | ParamType::Unknown => Some(Value::String(raw.to_string())),
    }
}

/// Accepts the usual spellings: 1/0, t/f, true/false in lower, upper and title case.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
