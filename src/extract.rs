use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Href prefixes that can never become crawlable page URLs.
const SKIP_PREFIXES: [&str; 3] = ["mailto:", "tel:", "javascript:"];

/// Query-string markers identifying tracking parameters; a query containing
/// any of these is dropped during normalization.
const TRACKING_MARKERS: [&str; 3] = ["utm_", "fbclid", "gclid"];

/// Extracts the deduplicated set of normalized, same-origin candidate URLs
/// reachable from anchor tags on one fetched page.
///
/// # Arguments
///
/// * `html` - Raw HTML text of the fetched page
/// * `page_url` - URL the page was fetched from, used as the resolution base
/// * `site_origin` - URL whose host the crawl is restricted to
pub fn extract_links(html: &str, page_url: &Url, site_origin: &Url) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("anchor selector");

    let mut links = BTreeSet::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(resolved) = resolve_href(page_url, href) else {
            continue;
        };

        if !same_host(&resolved, site_origin) {
            ::log::trace!("dropping cross-domain link: {}", resolved);
            continue;
        }

        if let Some(normalized) = normalize_url(&resolved) {
            links.insert(normalized);
        }
    }

    ::log::debug!("extracted {} links from {}", links.len(), page_url);
    links
}

/// Resolves a (possibly relative) href against the page URL.
///
/// Fragment-only, `mailto:`, `tel:` and `javascript:` hrefs yield `None`, as
/// do hrefs that fail RFC 3986 resolution.
fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIP_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        return None;
    }

    // Url::join handles scheme-relative (//host/path), root-relative (/path)
    // and document-relative forms against the page URL.
    base.join(href).ok()
}

/// True when the candidate is an http(s) URL on the crawl origin's host.
fn same_host(candidate: &Url, origin: &Url) -> bool {
    matches!(candidate.scheme(), "http" | "https") && candidate.host_str() == origin.host_str()
}

/// Reduces a URL to its canonical crawl form: origin + path, with a trailing
/// slash unless the final path segment contains a dot, plus the query string
/// when it carries no tracking markers.
pub fn normalize_url(url: &Url) -> Option<String> {
    let origin = url.origin();
    if !matches!(origin, url::Origin::Tuple(..)) {
        return None;
    }

    let mut normalized = origin.ascii_serialization();
    let path = url.path();
    normalized.push_str(path);

    let last_segment = path.rsplit('/').next().unwrap_or("");
    if !path.ends_with('/') && !last_segment.contains('.') {
        normalized.push('/');
    }

    if let Some(query) = url.query() {
        if !query.is_empty() && !TRACKING_MARKERS.iter().any(|m| query.contains(m)) {
            normalized.push('?');
            normalized.push_str(query);
        }
    }

    Some(normalized)
}
