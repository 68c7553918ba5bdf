//! OpenAPI/Swagger description parser

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::catalog::Catalog;
use crate::discovery::models::{
    BodyField, BodySchema, Endpoint, Param, ParamLocation, ParamType, SchemeKind,
    SecurityRequirement, SecurityScheme,
};
use crate::error::LoadError;
use crate::models::HttpMethod;

/// Guards against `$ref` cycles
const MAX_REF_DEPTH: usize = 16;

/// Method keys in the order endpoints of one path are listed
const METHOD_ORDER: [&str; 5] = ["get", "post", "put", "patch", "delete"];

/// Parse a JSON or YAML document
pub fn parse_str(content: &str) -> Result<Catalog, LoadError> {
    let doc: Value = if content.trim_start().starts_with('{') {
        serde_json::from_str(content).map_err(|e| LoadError::Parse(e.to_string()))?
    } else {
        serde_yaml::from_str(content).map_err(|e| LoadError::Parse(e.to_string()))?
    };
    parse_document(&doc)
}

/// Build the catalog from an already-decoded description
pub fn parse_document(doc: &Value) -> Result<Catalog, LoadError> {
    let paths = doc
        .get("paths")
        .and_then(Value::as_object)
        .ok_or(LoadError::NotOpenApi)?;

    let schemes = extract_security_schemes(doc);
    let global_security = doc.get("security").map(parse_security).unwrap_or_default();

    // serde_json keeps object keys sorted, so paths come out in order
    let mut endpoints = Vec::new();
    for (path, item) in paths {
        let item = resolve(doc, item);
        let Some(item_obj) = item.as_object() else {
            continue;
        };
        let shared_params = item_obj.get("parameters");

        for key in METHOD_ORDER {
            let (Some(op), Some(method)) = (item_obj.get(key), HttpMethod::parse(key)) else {
                continue;
            };
            endpoints.push(parse_operation(
                doc,
                method,
                path,
                op,
                shared_params,
                &global_security,
            ));
        }
    }

    let mut catalog = Catalog::new(endpoints, schemes);
    catalog.title = string_at(doc, "/info/title");
    catalog.version = string_at(doc, "/info/version");
    catalog.server_url = server_url(doc);
    debug!(
        endpoints = catalog.len(),
        server = ?catalog.server_url,
        "parsed api description"
    );
    Ok(catalog)
}

fn parse_operation(
    doc: &Value,
    method: HttpMethod,
    path: &str,
    op: &Value,
    shared_params: Option<&Value>,
    global_security: &[SecurityRequirement],
) -> Endpoint {
    let mut endpoint = Endpoint::new(method, path);
    endpoint.summary = non_blank(op.get("summary"));
    endpoint.operation_id = non_blank(op.get("operationId"));

    let mut params: Vec<Param> = Vec::new();
    for list in [shared_params, op.get("parameters")].into_iter().flatten() {
        for raw in list.as_array().into_iter().flatten() {
            let raw = resolve(doc, raw);
            // Swagger 2 carries the body as an `in: body` parameter
            if raw.get("in").and_then(Value::as_str) == Some("body") {
                if let Some(schema) = raw.get("schema") {
                    endpoint.body = Some(parse_body_schema(doc, schema));
                }
                continue;
            }
            if let Some(param) = parse_parameter(doc, raw) {
                // Operation parameters override path-item ones
                params.retain(|p| !(p.name == param.name && p.location == param.location));
                params.push(param);
            }
        }
    }

    let (mut path_params, query_params): (Vec<Param>, Vec<Param>) = params
        .into_iter()
        .partition(|p| p.location == ParamLocation::Path);
    // Order path parameters as they appear in the template
    path_params.sort_by_cached_key(|p| {
        path.find(&format!("{{{}}}", p.name))
            .unwrap_or(usize::MAX)
    });
    endpoint.path_params = path_params;
    endpoint.query_params = query_params;

    if let Some(body) = op.get("requestBody").and_then(|b| parse_request_body(doc, b)) {
        endpoint.body = Some(body);
    }

    // Operation-level security replaces the global list; `[]` opts out
    endpoint.security = match op.get("security") {
        Some(security) => parse_security(security),
        None => global_security.to_vec(),
    };

    endpoint
}

fn parse_parameter(doc: &Value, param: &Value) -> Option<Param> {
    let name = param.get("name")?.as_str()?.to_string();
    let location = match param.get("in")?.as_str()? {
        "path" => ParamLocation::Path,
        "query" => ParamLocation::Query,
        _ => return None,
    };

    // Swagger 2 puts the type on the parameter itself
    let schema = param.get("schema").map(|s| resolve(doc, s)).unwrap_or(param);

    let mut p = Param::new(name, location, schema_type(schema));
    p.required = location == ParamLocation::Path
        || param.get("required").and_then(Value::as_bool).unwrap_or(false);
    p.description = non_blank(param.get("description"));
    p.example = param
        .get("example")
        .or_else(|| schema.get("example"))
        .and_then(display_value);
    p.default = schema.get("default").and_then(display_value);
    p.enum_values = enum_values(schema);
    Some(p)
}

fn parse_request_body(doc: &Value, body: &Value) -> Option<BodySchema> {
    let body = resolve(doc, body);
    let schema = body.get("content")?.get("application/json")?.get("schema")?;
    Some(parse_body_schema(doc, schema))
}

/// Flatten an object schema into scalar fields. Anything else is kept as
/// an unsupported body that can only be sent as raw JSON.
fn parse_body_schema(doc: &Value, schema: &Value) -> BodySchema {
    let schema = resolve(doc, schema);
    let properties = schema.get("properties").and_then(Value::as_object);
    let is_object = match schema.get("type") {
        Some(_) => first_type(schema) == Some("object"),
        None => properties.is_some(),
    };
    if !is_object {
        return BodySchema {
            supported: false,
            fields: Vec::new(),
        };
    }

    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut supported = true;
    let mut fields = Vec::new();
    for (name, prop) in properties.into_iter().flatten() {
        let prop = resolve(doc, prop);
        let field_type = schema_type(prop);
        if field_type == ParamType::Unknown {
            supported = false;
        }
        let mut field = BodyField::new(name.clone(), field_type);
        field.required = required.contains(&name.as_str());
        field.description = non_blank(prop.get("description"));
        field.example = prop.get("example").and_then(display_value);
        field.default = prop.get("default").and_then(display_value);
        field.enum_values = enum_values(prop);
        fields.push(field);
    }

    BodySchema { supported, fields }
}

fn extract_security_schemes(doc: &Value) -> BTreeMap<String, SecurityScheme> {
    let declared = doc
        .pointer("/components/securitySchemes")
        .or_else(|| doc.get("securityDefinitions")) // Swagger 2
        .and_then(Value::as_object);

    let mut schemes = BTreeMap::new();
    for (name, raw) in declared.into_iter().flatten() {
        let scheme = resolve(doc, raw);
        let scheme_type = scheme.get("type").and_then(Value::as_str).unwrap_or("");
        let kind = match scheme_type {
            "http" => {
                let http_scheme = scheme
                    .get("scheme")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_lowercase();
                if http_scheme == "bearer" {
                    SchemeKind::Bearer
                } else {
                    SchemeKind::Unsupported(format!("http {}", http_scheme))
                }
            }
            "oauth2" => oauth2_kind(scheme),
            "basic" => SchemeKind::Unsupported("http basic".to_string()),
            "" => SchemeKind::Unsupported("unknown".to_string()),
            other => SchemeKind::Unsupported(other.to_string()),
        };

        schemes.insert(
            name.clone(),
            SecurityScheme {
                name: name.clone(),
                kind,
                description: non_blank(scheme.get("description")),
                bearer_format: non_blank(scheme.get("bearerFormat")),
            },
        );
    }
    schemes
}

fn oauth2_kind(scheme: &Value) -> SchemeKind {
    // OpenAPI 3 nests flows; Swagger 2 has a single `flow`
    let flow = match scheme.pointer("/flows/password") {
        Some(flow) => Some(flow),
        None if scheme.get("flow").and_then(Value::as_str) == Some("password") => Some(scheme),
        None => None,
    };

    let token_url = flow.and_then(|f| non_blank(f.get("tokenUrl")));
    let scopes: BTreeMap<String, String> = flow
        .and_then(|f| f.get("scopes"))
        .and_then(Value::as_object)
        .map(|s| {
            s.iter()
                .map(|(k, v)| (k.clone(), v.as_str().unwrap_or_default().to_string()))
                .collect()
        })
        .unwrap_or_default();

    SchemeKind::OAuth2 { token_url, scopes }
}

fn parse_security(security: &Value) -> Vec<SecurityRequirement> {
    security
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .map(|req| {
            req.iter()
                .map(|(name, scopes)| {
                    let scopes: Vec<String> = scopes
                        .as_array()
                        .map(|s| s.iter().filter_map(Value::as_str).map(String::from).collect())
                        .unwrap_or_default();
                    (name.clone(), scopes)
                })
                .collect()
        })
        .collect()
}

/// First absolute server URL without template variables
fn server_url(doc: &Value) -> Option<String> {
    let from_servers = doc
        .get("servers")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|s| s.get("url").and_then(Value::as_str))
        .map(str::trim)
        .find(|url| {
            !url.contains('{') && (url.starts_with("http://") || url.starts_with("https://"))
        })
        .map(|url| url.trim_end_matches('/').to_string());

    from_servers.or_else(|| {
        // Swagger 2: schemes + host + basePath
        let host = doc.get("host").and_then(Value::as_str)?.trim();
        if host.is_empty() {
            return None;
        }
        let scheme = doc
            .pointer("/schemes/0")
            .and_then(Value::as_str)
            .unwrap_or("https");
        let base_path = doc.get("basePath").and_then(Value::as_str).unwrap_or("");
        Some(
            format!("{}://{}{}", scheme, host, base_path)
                .trim_end_matches('/')
                .to_string(),
        )
    })
}

/// Follow local `#/...` references
fn resolve<'a>(doc: &'a Value, value: &'a Value) -> &'a Value {
    let mut current = value;
    for _ in 0..MAX_REF_DEPTH {
        let target = current
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|r| r.strip_prefix('#'))
            .and_then(|pointer| doc.pointer(pointer));
        match target {
            Some(next) => current = next,
            None => break,
        }
    }
    current
}

/// `type` as a string, or the first non-null entry of an OpenAPI 3.1 type list
fn first_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(t) => Some(t.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null"),
        _ => None,
    }
}

fn schema_type(schema: &Value) -> ParamType {
    first_type(schema)
        .map(ParamType::from_schema_type)
        .unwrap_or_default()
}

fn enum_values(schema: &Value) -> Vec<String> {
    schema
        .get("enum")
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(display_value).collect())
        .unwrap_or_default()
}

/// Strings verbatim, other scalars in their JSON form
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn string_at(doc: &Value, pointer: &str) -> Option<String> {
    non_blank(doc.pointer(pointer))
}
