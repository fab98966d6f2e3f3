//! Rendering of resolved links to HTML and back to markdown markup.

use serde::{Deserialize, Serialize};

use crate::config::LinkConfig;
use crate::model::{LinkKind, LinkNode};
use crate::resolver::Resolution;
use crate::syntax::{format_wikilink, split_wiki_link, WikiLinkFormat};

const MAIL_LINK_CLASS: &str = "mail-link";
const MAIL_SCHEME: &str = "mailto:";

/// A link ready for HTML output.
///
/// `href` and `text` are already HTML-safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendering {
    pub href: String,
    pub text: String,
    pub image: bool,
    pub attributes: Vec<(String, String)>,
}

impl Rendering {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
            image: false,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), escape_html(value)));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_html(&self) -> String {
        let attributes: String = self
            .attributes
            .iter()
            .map(|(name, value)| format!(" {}=\"{}\"", name, value))
            .collect();
        if self.image {
            format!(
                "<img src=\"{}\" alt=\"{}\"{} />",
                self.href, self.text, attributes
            )
        } else {
            format!("<a href=\"{}\"{}>{}</a>", self.href, attributes, self.text)
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Spell `text` with HTML character references so that address harvesters
/// do not see it.
///
/// Characters cycle through decimal references, hexadecimal references and
/// plain text. Only ASCII letters, digits and `.` are ever left plain, so `@`
/// is always encoded.
///
/// ```
/// use wikiref_core::render::obfuscate;
///
/// assert_eq!(obfuscate("abc@d"), "&#97;&#x62;c&#64;&#x64;");
/// ```
pub fn obfuscate(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 6);
    for (i, c) in text.chars().enumerate() {
        let plain_ok = c.is_ascii_alphanumeric() || c == '.';
        match i % 3 {
            1 if c != '@' => out.push_str(&format!("&#x{:x};", c as u32)),
            2 if plain_ok => out.push(c),
            _ => out.push_str(&format!("&#{};", c as u32)),
        }
    }
    out
}

/// Render a link node using its resolution.
///
/// Links whose target is missing or unreachable carry the configured
/// missing-target class.
pub fn render(node: &LinkNode, resolution: &Resolution, config: &LinkConfig) -> Rendering {
    let mut rendering = match node.kind {
        LinkKind::MailLink => {
            let address = node
                .href
                .strip_prefix(MAIL_SCHEME)
                .unwrap_or(&node.href);
            let text = if node.text.is_empty() {
                address
            } else {
                node.text.as_str()
            };
            Rendering::new(
                format!("{}{}", obfuscate(MAIL_SCHEME), obfuscate(address)),
                obfuscate(text),
            )
            .with_attribute("class", MAIL_LINK_CLASS)
        }
        LinkKind::WikiLink | LinkKind::EmbeddedWikiLink => {
            let parts = split_wiki_link(&node.href, config.wiki_link_format());
            Rendering::new(
                escape_html(&resolution.target),
                escape_html(&parts.display_text()),
            )
        }
        _ => Rendering::new(escape_html(&node.href), escape_html(&node.text)),
    };
    rendering.image = node.kind.is_image();

    if resolution.validated && resolution.verdict.is_missing() {
        rendering = rendering.with_attribute("class", &config.missing_target_class);
    }
    rendering
}

/// Backslash-escape every character of `text` found in `special`
fn escape_markup(text: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Markdown for `node` rewritten to point at `new_target`.
///
/// Wiki links keep their display text and anchor and follow the configured
/// `|` order; other links become inline links. Display text is escaped so it
/// cannot close the link early.
pub fn replacement_markup(node: &LinkNode, new_target: &str, config: &LinkConfig) -> String {
    match node.kind {
        LinkKind::WikiLink | LinkKind::EmbeddedWikiLink => {
            let format = config.wiki_link_format();
            let parts = split_wiki_link(&node.href, format);
            // With the text first, a `|` in it would be read as the separator
            let special: &[char] = match format {
                WikiLinkFormat::AliasFirst => &[']', '|'],
                WikiLinkFormat::TargetFirst => &[']'],
            };
            let text = parts.text.as_deref().map(|t| escape_markup(t, special));
            format_wikilink(
                new_target,
                text.as_deref(),
                parts.anchor.as_deref(),
                node.kind == LinkKind::EmbeddedWikiLink,
                format,
            )
        }
        LinkKind::Image => format!(
            "![{}]({})",
            escape_markup(&node.text, &['\\', '[', ']']),
            new_target
        ),
        _ => format!(
            "[{}]({})",
            escape_markup(&node.text, &['\\', '[', ']']),
            new_target
        ),
    }
}
