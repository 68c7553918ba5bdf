use crate::models::{HttpMethod, RequestSpec};

/// Format request as cURL command
pub fn to_curl(request: &RequestSpec) -> String {
    let mut parts = vec!["curl".to_string()];

    // Method
    if request.method != HttpMethod::GET {
        parts.push(format!("-X {}", request.method.as_str()));
    }

    // URL
    parts.push(quote(&request.url));

    // Headers
    for (key, value) in &request.headers {
        if !value.trim().is_empty() {
            parts.push(format!("-H {}", quote(&format!("{}: {}", key, value))));
        }
    }

    // Body
    if let Some(body) = request.body.as_deref().filter(|b| !b.is_empty()) {
        parts.push(format!("-d {}", quote(body)));
    }

    parts.join(" \\\n  ")
}

/// Single-quote for a POSIX shell
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
