//! Public route matching
//!
//! Decides which requests skip authentication. Patterns come from
//! `jwt.public_routes` and may carry an HTTP method prefix:
//!
//! - `GET /items` matches only `GET` on exactly `/items`
//! - `/health` matches any method on `/health`
//! - `{name}` matches one path segment, `*` one segment, `**` any number of segments

use regex::Regex;
use std::collections::HashSet;

use crate::error::{Error, Result};

/// Compiled set of unauthenticated routes
///
/// Routes are matched in this order:
/// 1. Method-prefixed exact matches (e.g., `GET /items`)
/// 2. Exact path matches for any method (e.g., `/health`)
/// 3. Placeholder and wildcard patterns
#[derive(Debug, Clone, Default)]
pub struct PublicRoutes {
    /// "METHOD /path" keys
    method_exact: HashSet<String>,

    /// Paths open to every method
    exact: HashSet<String>,

    patterns: Vec<CompiledPattern>,
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    /// HTTP method filter (None = any method)
    method: Option<String>,
    regex: Regex,
}

impl PublicRoutes {
    /// Compile route patterns from configuration
    pub fn compile<S: AsRef<str>>(routes: &[S]) -> Result<Self> {
        let mut public = Self::default();

        for route in routes {
            let (method, path) = Self::parse_method_prefix(route.as_ref());

            if Self::is_pattern(&path) {
                let regex = Self::compile_pattern_to_regex(&path)?;
                public.patterns.push(CompiledPattern { method, regex });
            } else if let Some(m) = method {
                public.method_exact.insert(format!("{} {}", m, path));
            } else {
                public.exact.insert(path);
            }
        }

        Ok(public)
    }

    /// Whether a request with this method and path may skip authentication
    pub fn is_public(&self, method: &str, path: &str) -> bool {
        if self.method_exact.contains(&format!("{} {}", method, path)) {
            return true;
        }

        if self.exact.contains(path) {
            return true;
        }

        self.patterns.iter().any(|pattern| {
            pattern.method.as_deref().is_none_or(|m| m == method) && pattern.regex.is_match(path)
        })
    }

    /// Number of configured routes
    pub fn len(&self) -> usize {
        self.method_exact.len() + self.exact.len() + self.patterns.len()
    }

    /// Check if there are no public routes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse method prefix from pattern (e.g., "POST /items" -> (Some("POST"), "/items"))
    fn parse_method_prefix(pattern: &str) -> (Option<String>, String) {
        let trimmed = pattern.trim();

        let methods = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];
        for method in methods {
            if let Some(rest) = trimmed.strip_prefix(method) {
                let rest = rest.trim_start();
                if rest.starts_with('/') {
                    return (Some(method.to_string()), rest.to_string());
                }
            }
        }

        (None, trimmed.to_string())
    }

    fn is_pattern(path: &str) -> bool {
        path.contains('*') || path.contains('{')
    }

    /// Compile a pattern with placeholders or wildcards to an anchored regex
    fn compile_pattern_to_regex(pattern: &str) -> Result<Regex> {
        let mut regex_str = String::from("^");
        let mut literal = String::new();

        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            let segment_regex = match c {
                '*' if chars.peek() == Some(&'*') => {
                    chars.next();
                    ".*"
                }
                '*' => "[^/]+",
                '{' => {
                    // skip the placeholder name
                    for c in chars.by_ref() {
                        if c == '}' {
                            break;
                        }
                    }
                    "[^/]+"
                }
                _ => {
                    literal.push(c);
                    continue;
                }
            };
            regex_str.push_str(&regex::escape(&literal));
            literal.clear();
            regex_str.push_str(segment_regex);
        }

        regex_str.push_str(&regex::escape(&literal));
        regex_str.push('$');

        Regex::new(&regex_str).map_err(|e| {
            Error::Config(Box::new(figment::Error::from(format!(
                "invalid public route pattern '{}': {}",
                pattern, e
            ))))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> PublicRoutes {
        PublicRoutes::compile(&[
            "GET /items",
            "GET /items/paging",
            "GET /items/skip",
            "GET /health",
            "GET /ready",
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_method_prefix() {
        let (method, path) = PublicRoutes::parse_method_prefix("POST /items");
        assert_eq!(method, Some("POST".to_string()));
        assert_eq!(path, "/items");

        let (method, path) = PublicRoutes::parse_method_prefix("/items");
        assert_eq!(method, None);
        assert_eq!(path, "/items");

        let (method, path) = PublicRoutes::parse_method_prefix("GET  /items");
        assert_eq!(method, Some("GET".to_string()));
        assert_eq!(path, "/items");
    }

    #[test]
    fn test_default_routes() {
        let public = defaults();
        assert_eq!(public.len(), 5);

        assert!(public.is_public("GET", "/items"));
        assert!(public.is_public("GET", "/items/paging"));
        assert!(public.is_public("GET", "/items/skip"));
        assert!(public.is_public("GET", "/health"));

        assert!(!public.is_public("POST", "/items"));
        assert!(!public.is_public("GET", "/items/550e8400-e29b-41d4-a716-446655440000"));
        assert!(!public.is_public("DELETE", "/items/abc"));
    }

    #[test]
    fn test_any_method_exact_path() {
        let public = PublicRoutes::compile(&["/health"]).unwrap();
        assert!(public.is_public("GET", "/health"));
        assert!(public.is_public("HEAD", "/health"));
        assert!(!public.is_public("GET", "/health/deep"));
    }

    #[test]
    fn test_placeholder_pattern() {
        let public = PublicRoutes::compile(&["GET /items/{id}"]).unwrap();
        assert!(public.is_public("GET", "/items/abc"));
        assert!(!public.is_public("PUT", "/items/abc"));
        assert!(!public.is_public("GET", "/items/abc/extra"));
        assert!(!public.is_public("GET", "/items"));
    }

    #[test]
    fn test_wildcards() {
        let public = PublicRoutes::compile(&["/docs/**", "GET /files/*.json"]).unwrap();
        assert!(public.is_public("GET", "/docs/a/b/c"));
        assert!(public.is_public("GET", "/files/report.json"));
        // the dot is literal
        assert!(!public.is_public("GET", "/files/reportxjson"));
    }

    #[test]
    fn test_empty() {
        let public = PublicRoutes::compile::<&str>(&[]).unwrap();
        assert!(public.is_empty());
        assert!(!public.is_public("GET", "/items"));
    }
}
