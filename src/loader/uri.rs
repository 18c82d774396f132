//! Base URI computation and reference-target composition.
//!
//! Composition follows RFC 3986 merge and dot-segment removal as implemented by [`url`];
//! the scheme and authority pass through untouched and no percent-decoding is applied to
//! the path.

use url::Url;

/// Computes a document's base URI: `base_of(resolve($self, retrieval_uri))`.
///
/// Returns `None` when neither an absolute `$self` nor a retrieval URI is available.
pub fn document_base(retrieval_uri: Option<&Url>, self_uri: Option<&str>) -> Option<Url> {
    let resolved = match (self_uri, retrieval_uri) {
        (Some(self_uri), retrieval) => match Url::parse(self_uri) {
            Ok(url) => Some(url),
            Err(_) => retrieval.and_then(|base| base.join(self_uri).ok()),
        },
        (None, Some(retrieval)) => Some(retrieval.clone()),
        (None, None) => None,
    };

    resolved.map(|url| base_of(&url))
}

/// Strips the fragment from a URI, yielding the registry key form.
pub fn base_of(url: &Url) -> Url {
    let mut base = url.clone();
    base.set_fragment(None);
    base
}

/// Resolves a reference's document part against the owning document's base URI.
///
/// An empty source means a fragment-only reference into the current document (`None`).
pub fn reference_target(document_uri: Option<&Url>, source: &str) -> Option<Url> {
    if source.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(source) {
        return Some(base_of(&url));
    }

    document_uri
        .and_then(|base| base.join(source).ok())
        .map(|url| base_of(&url))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn base_strips_fragment_only() {
        assert_eq!(
            base_of(&url("https://example.com/a/b.json#/components/schemas/X")),
            url("https://example.com/a/b.json")
        );
    }

    #[test]
    fn self_uri_resolves_against_retrieval() {
        assert_eq!(
            document_base(Some(&url("https://example.com/api/openapi.json")), Some("v2/spec.json")),
            Some(url("https://example.com/api/v2/spec.json"))
        );
    }

    #[test]
    fn absolute_self_uri_wins() {
        assert_eq!(
            document_base(
                Some(&url("https://example.com/api/openapi.json")),
                Some("https://other.example/spec.json"),
            ),
            Some(url("https://other.example/spec.json"))
        );
    }

    #[test]
    fn dot_segments_are_removed() {
        assert_eq!(
            reference_target(Some(&url("https://example.com/a/b/c.json")), "../common/./shared.json"),
            Some(url("https://example.com/a/common/shared.json"))
        );
    }

    #[test]
    fn fragment_only_reference_is_self() {
        assert_eq!(reference_target(Some(&url("https://example.com/a.json")), ""), None);
        assert_eq!(reference_target(None, ""), None);
    }
}
