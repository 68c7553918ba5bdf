//! Endpoint catalog - the read-only result of loading an API description

use std::collections::BTreeMap;

use crate::discovery::{Endpoint, SecurityScheme};
use crate::fuzzy;

/// Everything the session needs from the API description.
///
/// Built once by the loader and never mutated; the session refers to
/// endpoints by index.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub title: Option<String>,
    pub version: Option<String>,
    /// First concrete `servers[].url` of the document
    pub server_url: Option<String>,
    endpoints: Vec<Endpoint>,
    schemes: BTreeMap<String, SecurityScheme>,
    search_texts: Vec<String>,
}

impl Catalog {
    pub fn new(endpoints: Vec<Endpoint>, schemes: BTreeMap<String, SecurityScheme>) -> Self {
        let search_texts = endpoints.iter().map(Endpoint::search_text).collect();
        Catalog {
            title: None,
            version: None,
            server_url: None,
            endpoints,
            schemes,
            search_texts,
        }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn get(&self, index: usize) -> Option<&Endpoint> {
        self.endpoints.get(index)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Declared security schemes, sorted by name
    pub fn schemes(&self) -> &BTreeMap<String, SecurityScheme> {
        &self.schemes
    }

    pub fn scheme(&self, name: &str) -> Option<&SecurityScheme> {
        self.schemes.get(name)
    }

    /// Catalog indices matching `needle`, best first
    pub fn filter(&self, needle: &str) -> Vec<usize> {
        fuzzy::rank(
            needle,
            self.search_texts
                .iter()
                .enumerate()
                .map(|(i, text)| (i, text.as_str())),
        )
    }
}
