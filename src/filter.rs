use url::Url;

/// Administrative and backend path prefixes that are never crawled.
const BACKEND_PATTERNS: [&str; 5] = ["/admin", "/api", "/login", "/logout", "/search"];

/// Error and utility pages.
const UTILITY_PATTERNS: [&str; 2] = ["/404", "/error"];

/// Policy pages.
const POLICY_PATTERNS: [&str; 3] = ["/privacy", "/terms", "/cookie"];

/// Non-HTML document and binary file extensions.
const EXTENSION_PATTERNS: [&str; 15] = [
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".zip", ".rar", ".exe", ".dmg",
    ".iso", ".img", ".tar", ".gz",
];

/// Decides whether a URL may ever be scheduled or reported.
///
/// Matching is substring containment on the lower-cased path, mirroring the
/// original filter's semantics exactly (a path merely containing a pattern
/// is excluded).
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    patterns: Vec<String>,
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ExclusionFilter {
    /// Create a filter with the built-in patterns plus any extra ones.
    pub fn new(extra_patterns: Vec<String>) -> Self {
        let mut patterns: Vec<String> = BACKEND_PATTERNS
            .iter()
            .chain(UTILITY_PATTERNS.iter())
            .chain(POLICY_PATTERNS.iter())
            .chain(EXTENSION_PATTERNS.iter())
            .map(|p| p.to_string())
            .collect();

        for pattern in extra_patterns {
            let pattern = pattern.to_lowercase();
            if !pattern.is_empty() && !patterns.contains(&pattern) {
                patterns.push(pattern);
            }
        }

        Self { patterns }
    }

    /// True when the URL must never be added to the found set or frontier.
    pub fn is_excluded(&self, url: &Url) -> bool {
        let path = url.path().to_lowercase();
        self.patterns.iter().any(|p| path.contains(p.as_str()))
    }
}
