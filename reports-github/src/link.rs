//! `Link` header parsing for paginated collections.
//!
//! GitHub paginates with RFC 8288 links:
//!
//! ```text
//! Link: <https://api.github.com/user/1/repos?page=2>; rel="next", <https://api.github.com/user/1/repos?page=5>; rel="last"
//! ```

use http::HeaderMap;
use http::header::LINK;

/// One link of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target URL, without the angle brackets.
    pub url: String,
    /// Relation types from the `rel` parameter, e.g. `next` or `last`.
    pub rels: Vec<String>,
}

impl Link {
    /// Whether `rel` is one of this link's relations, ignoring case.
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Parses a `Link` header value. Malformed entries are skipped.
pub fn parse(value: &str) -> Vec<Link> {
    value.split(',').filter_map(parse_one).collect()
}

fn parse_one(entry: &str) -> Option<Link> {
    let mut parts = entry.split(';');
    let target = parts.next()?.trim();
    let url = target.strip_prefix('<')?.strip_suffix('>')?.trim();
    if url.is_empty() {
        return None;
    }

    let rels = parts
        .filter_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("rel")
                .then(|| value.trim().trim_matches('"').to_owned())
        })
        .flat_map(|value| {
            value
                .split_whitespace()
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .collect();

    Some(Link {
        url: url.to_owned(),
        rels,
    })
}

/// URL of the `rel="next"` link, if the response has one.
pub fn next_page(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(parse)
        .find(|link| link.has_rel("next"))
        .map(|link| link.url)
}
