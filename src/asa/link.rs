//! `Link` header parsing for cursor pagination
//!
//! The API advertises the neighbouring page as `<uri>; rel="next"`. Only the
//! first entry of the header is ever consulted by the pagination loop.

/// One `<target>; rel="..."` entry of a `Link` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub target: String,
    /// Raw `rel` value, empty when the entry has none
    pub relation: String,
}

impl LinkEntry {
    /// `prev` marks the last page when walking forward
    pub fn is_prev(&self) -> bool {
        self.relation == "prev"
    }
}

/// Parse a `Link` header value into its entries, in header order
///
/// Entries without a `<...>` target are skipped.
pub fn parse_link_header(value: &str) -> Vec<LinkEntry> {
    let mut entries = Vec::new();
    let mut rest = value;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            break;
        };

        let target = after[..end].trim().to_string();
        let (params, next) = split_entry(&after[end + 1..]);

        entries.push(LinkEntry {
            target,
            relation: relation_of(params),
        });
        rest = next;
    }

    entries
}

/// Split at the first comma outside a quoted string
fn split_entry(s: &str) -> (&str, &str) {
    let mut in_quotes = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return (&s[..i], &s[i + 1..]),
            _ => {}
        }
    }
    (s, "")
}

fn relation_of(params: &str) -> String {
    params
        .split(';')
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("rel"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .unwrap_or_default()
}
