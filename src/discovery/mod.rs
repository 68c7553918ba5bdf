//! API description loading - turns an OpenAPI document into an endpoint catalog

pub mod models;
pub mod openapi;
pub mod source;

pub use models::*;
pub use openapi::{parse_document, parse_str};
pub use source::{load, resolve_base_url, SpecSource};
