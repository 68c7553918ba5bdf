//! Normalized endpoint model produced by the description loader

use std::collections::BTreeMap;

use crate::models::HttpMethod;

/// Scalar type of a parameter or body field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    #[default]
    Unknown,
}

impl ParamType {
    pub fn from_schema_type(t: &str) -> ParamType {
        match t {
            "string" => ParamType::String,
            "integer" => ParamType::Integer,
            "number" => ParamType::Number,
            "boolean" => ParamType::Boolean,
            _ => ParamType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Unknown => "unknown",
        }
    }
}

/// Parameter location in request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParamLocation {
    Path,
    #[default]
    Query,
}

/// A path or query parameter
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Param {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    pub param_type: ParamType,
    pub description: Option<String>,
    pub example: Option<String>,
    pub default: Option<String>,
    pub enum_values: Vec<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, location: ParamLocation, param_type: ParamType) -> Self {
        Param {
            name: name.into(),
            location,
            required: location == ParamLocation::Path,
            param_type,
            ..Param::default()
        }
    }
}

/// One property of a flat JSON object body
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BodyField {
    pub name: String,
    pub required: bool,
    pub field_type: ParamType,
    pub description: Option<String>,
    pub example: Option<String>,
    pub default: Option<String>,
    pub enum_values: Vec<String>,
}

impl BodyField {
    pub fn new(name: impl Into<String>, field_type: ParamType) -> Self {
        BodyField {
            name: name.into(),
            field_type,
            ..BodyField::default()
        }
    }
}

/// Body schema information
///
/// `supported` is false when the JSON body is not a flat object of scalar
/// fields; such bodies can only be sent through the raw JSON override.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BodySchema {
    pub supported: bool,
    pub fields: Vec<BodyField>,
}

/// Scheme name -> required scopes. Members of one requirement are AND'd.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// What the client knows how to do with a declared security scheme
#[derive(Clone, Debug, PartialEq)]
pub enum SchemeKind {
    /// `type: http, scheme: bearer`; token typed in by hand
    Bearer,
    /// `type: oauth2`; only the password flow can be driven from the client
    OAuth2 {
        token_url: Option<String>,
        scopes: BTreeMap<String, String>,
    },
    /// Anything else, labelled for display (e.g. "apiKey", "http basic")
    Unsupported(String),
}

/// A named security scheme declared by the description
#[derive(Clone, Debug, PartialEq)]
pub struct SecurityScheme {
    pub name: String,
    pub kind: SchemeKind,
    pub description: Option<String>,
    pub bearer_format: Option<String>,
}

impl SecurityScheme {
    pub fn type_label(&self) -> &str {
        match &self.kind {
            SchemeKind::Bearer => "http bearer",
            SchemeKind::OAuth2 { .. } => "oauth2",
            SchemeKind::Unsupported(label) => label,
        }
    }

    /// Token URL of the password flow, if the scheme declares one
    pub fn password_token_url(&self) -> Option<&str> {
        match &self.kind {
            SchemeKind::OAuth2 {
                token_url: Some(url),
                ..
            } if !url.trim().is_empty() => Some(url.as_str()),
            _ => None,
        }
    }
}

/// A single API operation
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoint {
    pub method: HttpMethod,
    /// URL path template (e.g., "/users/{id}")
    pub path: String,
    pub summary: Option<String>,
    pub operation_id: Option<String>,
    pub path_params: Vec<Param>,
    pub query_params: Vec<Param>,
    pub body: Option<BodySchema>,
    /// OR'd alternatives; empty means no authentication
    pub security: Vec<SecurityRequirement>,
}

impl Endpoint {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Endpoint {
            method,
            path: path.into(),
            summary: None,
            operation_id: None,
            path_params: Vec::new(),
            query_params: Vec::new(),
            body: None,
            security: Vec::new(),
        }
    }

    /// Summary, falling back to the operation id
    pub fn label(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.operation_id.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// Lowercased text the endpoint filter matches against
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.method.as_str(),
            self.path,
            self.label().unwrap_or_default()
        )
        .to_lowercase()
    }

    pub fn requires_auth(&self) -> bool {
        !self.security.is_empty()
    }

    /// Flat body fields, empty when the body is absent or unsupported
    pub fn body_fields(&self) -> &[BodyField] {
        match &self.body {
            Some(body) if body.supported => body.fields.as_slice(),
            _ => &[],
        }
    }
}
