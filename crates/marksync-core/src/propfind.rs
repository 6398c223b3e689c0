//! PROPFIND multistatus parsing
//!
//! A 207 Multi-Status body is a small, flat XML document: one `response`
//! element per object, each carrying an `href` and (usually) a
//! `getlastmodified` property. Servers differ in namespace prefixes
//! (`D:`, `d:`, `lp1:`, or none), so matching is by local element name.
//! `response`, `href`, and `getlastmodified` never nest within themselves,
//! which is the only structural assumption made here.

use chrono::{DateTime, Utc};

/// One object listed by a PROPFIND response
#[derive(Debug, Clone, PartialEq)]
pub struct DavEntry {
    /// Raw href as reported by the server
    pub href: String,
    /// Last path segment of the href, percent-decoded
    pub filename: String,
    /// Value of the getlastmodified property, when present and parseable
    pub last_modified: Option<DateTime<Utc>>,
}

/// Parse a Multi-Status body into its listed entries
///
/// Malformed fragments are skipped rather than failing the whole listing.
pub fn parse_multistatus(body: &str) -> Vec<DavEntry> {
    elements(body, "response")
        .into_iter()
        .filter_map(|block| {
            let href_raw = elements(block, "href").into_iter().next()?;
            let href = unescape(href_raw.trim());
            if href.is_empty() {
                return None;
            }

            let filename = filename_of(&href);
            let last_modified = elements(block, "getlastmodified")
                .into_iter()
                .next()
                .and_then(|text| DateTime::parse_from_rfc2822(text.trim()).ok())
                .map(|dt| dt.with_timezone(&Utc));

            Some(DavEntry {
                href,
                filename,
                last_modified,
            })
        })
        .collect()
}

/// Inner text of every element with the given local name, in document order
fn elements<'a>(xml: &'a str, local: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut pos = 0;

    while let Some(offset) = xml[pos..].find('<') {
        let tag_start = pos + offset + 1;
        let rest = &xml[tag_start..];

        // Skip closing tags, declarations, and comments
        if rest.starts_with('/') || rest.starts_with('?') || rest.starts_with('!') {
            pos = tag_start;
            continue;
        }

        let name_end = rest
            .find(|c: char| c == '>' || c == '/' || c.is_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..name_end];

        let Some(gt) = rest.find('>') else {
            break;
        };

        if !local_name(name).eq_ignore_ascii_case(local) {
            pos = tag_start;
            continue;
        }

        // Self-closing element has no text
        if rest[..gt].ends_with('/') {
            out.push("");
            pos = tag_start + gt + 1;
            continue;
        }

        let content_start = tag_start + gt + 1;
        match find_closing(xml, content_start, local) {
            Some((close_start, close_end)) => {
                out.push(&xml[content_start..close_start]);
                pos = close_end;
            }
            None => break,
        }
    }

    out
}

/// Find the next closing tag with the given local name
///
/// Returns the byte range from the `</` to just past the `>`.
fn find_closing(xml: &str, from: usize, local: &str) -> Option<(usize, usize)> {
    let mut pos = from;
    while let Some(offset) = xml[pos..].find("</") {
        let close_start = pos + offset;
        let name_start = close_start + 2;
        let rest = &xml[name_start..];
        let name_end = rest
            .find(|c: char| c == '>' || c.is_whitespace())
            .unwrap_or(rest.len());

        if local_name(&rest[..name_end]).eq_ignore_ascii_case(local) {
            let gt = rest.find('>')?;
            return Some((close_start, name_start + gt + 1));
        }
        pos = name_start;
    }
    None
}

/// Element name without its namespace prefix
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Last path segment of an href, percent-decoded
fn filename_of(href: &str) -> String {
    let segment = href.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Decode the XML entities that can appear in an href
fn unescape(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/sync/</D:href>
    <D:propstat>
      <D:prop><D:getlastmodified>Mon, 03 Aug 2026 09:00:00 GMT</D:getlastmodified></D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/sync/bookmarks.json</D:href>
    <D:propstat>
      <D:prop><D:getlastmodified>Tue, 04 Aug 2026 10:30:00 GMT</D:getlastmodified></D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/sync/tabs.my%20laptop.json</D:href>
    <D:propstat>
      <D:prop><D:getlastmodified>Wed, 05 Aug 2026 11:45:00 GMT</D:getlastmodified></D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#;

    #[test]
    fn test_parse_multistatus() {
        let entries = parse_multistatus(SAMPLE);
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[1].filename, "bookmarks.json");
        assert_eq!(entries[1].href, "/sync/bookmarks.json");
        let modified = entries[1].last_modified.unwrap();
        assert_eq!(modified.to_rfc2822(), "Tue, 4 Aug 2026 10:30:00 +0000");
    }

    #[test]
    fn test_percent_decoded_filenames() {
        let entries = parse_multistatus(SAMPLE);
        assert_eq!(entries[2].filename, "tabs.my laptop.json");
    }

    #[test]
    fn test_collection_entry_filename() {
        let entries = parse_multistatus(SAMPLE);
        // The collection itself lists as its directory name
        assert_eq!(entries[0].filename, "sync");
    }

    #[test]
    fn test_namespace_prefix_variants() {
        let body = r#"<d:multistatus xmlns:d="DAV:" xmlns:lp1="DAV:">
          <d:response>
            <d:href>/dav/history.desk.json</d:href>
            <lp1:getlastmodified>Thu, 06 Aug 2026 08:15:00 GMT</lp1:getlastmodified>
          </d:response>
        </d:multistatus>"#;

        let entries = parse_multistatus(body);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filename, "history.desk.json");
        assert!(entries[0].last_modified.is_some());
    }

    #[test]
    fn test_unprefixed_elements() {
        let body = r#"<multistatus xmlns="DAV:">
          <response><href>/x/a.json</href></response>
        </multistatus>"#;

        let entries = parse_multistatus(body);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filename, "a.json");
        assert!(entries[0].last_modified.is_none());
    }

    #[test]
    fn test_escaped_href() {
        let body = r#"<D:multistatus xmlns:D="DAV:">
          <D:response><D:href>/sync/a&amp;b.json</D:href></D:response>
        </D:multistatus>"#;

        let entries = parse_multistatus(body);
        assert_eq!(entries[0].filename, "a&b.json");
    }

    #[test]
    fn test_empty_and_garbage_bodies() {
        assert!(parse_multistatus("").is_empty());
        assert!(parse_multistatus("not xml").is_empty());
        assert!(parse_multistatus("<D:multistatus/>").is_empty());
    }
}
