// Pagination metadata carried in list/search response headers.
//
// The server reports the total row count in `x-total-count` and page
// navigation in an RFC 8288 `Link` header whose targets carry a `page`
// query parameter.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
pub const LINK_HEADER: &str = "link";

/// Page numbers advertised by the `Link` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub first: Option<u32>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
    pub last: Option<u32>,
}

impl PageLinks {
    /// Parse a `Link` header value.
    ///
    /// Entries look like `<http://host/api/x?page=1&size=20&sort=id,asc>; rel="next"`.
    /// Targets may contain commas (sort expressions), so entries are
    /// delimited by `<` rather than by `,`. Unknown relations and targets
    /// without a numeric `page` parameter are ignored.
    pub fn parse(header: &str) -> Self {
        let mut links = Self::default();

        for entry in header.split('<').skip(1) {
            let Some((target, params)) = entry.split_once('>') else {
                continue;
            };
            let Some(rel) = params.split(';').find_map(|p| {
                p.trim()
                    .strip_prefix("rel=")
                    .map(|r| r.trim_end_matches(',').trim().trim_matches('"'))
            }) else {
                continue;
            };
            let Some(page) = page_param(target) else {
                continue;
            };

            match rel {
                "first" => links.first = Some(page),
                "prev" => links.prev = Some(page),
                "next" => links.next = Some(page),
                "last" => links.last = Some(page),
                _ => {}
            }
        }

        links
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn page_param(target: &str) -> Option<u32> {
    // Relative targets are resolved against a dummy base so query parsing still works.
    let url = Url::parse(target)
        .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(target)))
        .ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
}

/// Read `x-total-count`.
///
/// Returns `Ok(None)` when the header is absent so the caller can decide on a
/// fallback; a present but non-numeric value is an error.
pub fn total_count(headers: &HeaderMap) -> Result<Option<u64>, Error> {
    let Some(value) = headers.get(TOTAL_COUNT_HEADER) else {
        return Ok(None);
    };
    let raw = value.to_str().map_err(|_| Error::InvalidHeader {
        name: TOTAL_COUNT_HEADER,
        value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
    })?;
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| Error::InvalidHeader {
            name: TOTAL_COUNT_HEADER,
            value: raw.to_owned(),
        })
}

/// Read and parse the `Link` header; absent or non-UTF-8 yields no links.
pub fn page_links(headers: &HeaderMap) -> PageLinks {
    headers
        .get(LINK_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(PageLinks::parse)
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn parses_all_relations() {
        let header = "<http://localhost/api/credentials?page=2&size=20>; rel=\"next\",\
                      <http://localhost/api/credentials?page=0&size=20>; rel=\"prev\",\
                      <http://localhost/api/credentials?page=4&size=20>; rel=\"last\",\
                      <http://localhost/api/credentials?page=0&size=20>; rel=\"first\"";
        let links = PageLinks::parse(header);
        assert_eq!(
            links,
            PageLinks {
                first: Some(0),
                prev: Some(0),
                next: Some(2),
                last: Some(4),
            }
        );
    }

    #[test]
    fn sort_commas_inside_targets_do_not_split_entries() {
        let header = "</api/credentials?page=1&size=5&sort=id,asc>; rel=\"next\",\
                      </api/credentials?page=3&size=5&sort=id,asc>; rel=\"last\"";
        let links = PageLinks::parse(header);
        assert_eq!(links.next, Some(1));
        assert_eq!(links.last, Some(3));
        assert_eq!(links.first, None);
    }

    #[test]
    fn garbage_yields_empty_links() {
        assert!(PageLinks::parse("not a link header").is_empty());
        assert!(PageLinks::parse("<http://x/?size=1>; rel=\"next\"").is_empty());
    }

    #[test]
    fn total_count_absent_is_none() {
        assert_eq!(total_count(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn total_count_parses_integer() {
        let mut headers = HeaderMap::new();
        headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from_static("42"));
        assert_eq!(total_count(&headers).unwrap(), Some(42));
    }

    #[test]
    fn total_count_rejects_non_numeric() {
        let mut headers = HeaderMap::new();
        headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from_static("many"));
        assert!(matches!(
            total_count(&headers),
            Err(Error::InvalidHeader { name: TOTAL_COUNT_HEADER, .. })
        ));
    }
}
