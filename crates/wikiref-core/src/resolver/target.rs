use serde::{Deserialize, Serialize};

use crate::naming::{wiki_ref_as_file_name, WIKI_PAGE_EXTENSION};
use crate::syntax::{split_wiki_link, WikiLinkFormat};

const EXTERNAL_SCHEMES: &[&str] = &["http://", "https://", "ftp://"];
const MAIL_SCHEME: &str = "mailto:";
const FILE_SCHEME: &str = "file:";

/// What an href points at, before any lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HrefClass {
    /// `http://`, `https://` or `ftp://`
    External,
    Mail,
    /// `file:` URL, with the path part
    File(String),
    /// Rooted in-project path
    Absolute,
    /// `#anchor` inside the same document
    Anchor,
    Relative,
}

pub fn classify_href(href: &str) -> HrefClass {
    let lower = href.to_ascii_lowercase();
    if EXTERNAL_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        HrefClass::External
    } else if lower.starts_with(MAIL_SCHEME) {
        HrefClass::Mail
    } else if lower.starts_with(FILE_SCHEME) {
        let rest = &href[FILE_SCHEME.len()..];
        let path = rest.strip_prefix("//").unwrap_or(rest);
        HrefClass::File(path.to_string())
    } else if href.starts_with('/') {
        HrefClass::Absolute
    } else if href.starts_with('#') {
        HrefClass::Anchor
    } else {
        HrefClass::Relative
    }
}

/// A wiki link body turned into a document href
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTarget {
    /// `./Page-Name.md#anchor`, or `#anchor` for a self reference
    pub href: String,
    /// Page reference as written, `None` for a self reference
    pub page: Option<String>,
    pub anchor: Option<String>,
    /// Display text, when the link has one
    pub text: Option<String>,
}

/// Percent-encode each path segment of a page name written with dashes.
/// An anchoring `/` is dropped.
fn encode_page(page: &str) -> String {
    wiki_ref_as_file_name(page.trim_start_matches('/'))
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Turn the body of `[[...]]` into the href a renderer emits.
///
/// ```
/// use wikiref_core::resolver::normalize_wiki_link;
/// use wikiref_core::syntax::WikiLinkFormat;
///
/// let target = normalize_wiki_link("Page Name#Intro|read this", WikiLinkFormat::TargetFirst);
/// assert_eq!(target.href, "./Page-Name.md#Intro");
/// assert_eq!(target.text.as_deref(), Some("read this"));
/// ```
pub fn normalize_wiki_link(body: &str, format: WikiLinkFormat) -> NormalizedTarget {
    let parts = split_wiki_link(body, format);
    let anchor_suffix = parts
        .anchor
        .as_ref()
        .map(|a| format!("#{}", a))
        .unwrap_or_default();

    if parts.page.is_empty() {
        return NormalizedTarget {
            href: anchor_suffix,
            page: None,
            anchor: parts.anchor,
            text: parts.text,
        };
    }

    NormalizedTarget {
        href: format!(
            "./{}{}{}",
            encode_page(&parts.page),
            WIKI_PAGE_EXTENSION,
            anchor_suffix
        ),
        page: Some(parts.page),
        anchor: parts.anchor,
        text: parts.text,
    }
}
