//! Wiki link syntax: splitting `[[...]]` contents and rendering them back.


/// Order of page and display text inside a wiki link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WikiLinkFormat {
    /// GitHub wikis: [[text|page]]
    AliasFirst,
    /// [[page|text]]
    TargetFirst,
}

/// The pieces of a wiki link body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLinkParts {
    /// Page reference with the anchor removed, trimmed
    pub page: String,
    pub anchor: Option<String>,
    /// Display text, only when the link carries a `|`
    pub text: Option<String>,
}

impl WikiLinkParts {
    /// Text a renderer should show for this link
    pub fn display_text(&self) -> String {
        if let Some(text) = &self.text {
            return text.clone();
        }
        match &self.anchor {
            Some(anchor) => format!("{}#{}", self.page, anchor),
            None => self.page.clone(),
        }
    }
}

/// Split the body of a wiki link (the text between `[[` and `]]`).
///
/// Only the first `|` separates page and text; the anchor is everything
/// after the first `#` of the page part.
pub fn split_wiki_link(body: &str, format: WikiLinkFormat) -> WikiLinkParts {
    let (target, text) = match body.split_once('|') {
        Some((left, right)) => match format {
            WikiLinkFormat::TargetFirst => (left, Some(right)),
            WikiLinkFormat::AliasFirst => (right, Some(left)),
        },
        None => (body, None),
    };

    let (page, anchor) = match target.split_once('#') {
        Some((page, anchor)) => (page, Some(anchor.to_string())),
        None => (target, None),
    };

    WikiLinkParts {
        page: page.trim().to_string(),
        anchor,
        text: text.map(|t| t.trim().to_string()),
    }
}

/// Generate wiki link markup in the configured order
pub fn format_wikilink(
    target: &str,
    alias: Option<&str>,
    anchor: Option<&str>,
    is_embed: bool,
    format: WikiLinkFormat,
) -> String {
    let mut text = if is_embed { "![[" } else { "[[" }.to_string();
    let mut target_text = target.to_string();
    if let Some(anc) = anchor {
        target_text.push('#');
        target_text.push_str(anc);
    }

    match (alias, format) {
        (Some(a), WikiLinkFormat::AliasFirst) => {
            text.push_str(a);
            text.push('|');
            text.push_str(&target_text);
        }
        (Some(a), WikiLinkFormat::TargetFirst) => {
            text.push_str(&target_text);
            text.push('|');
            text.push_str(a);
        }
        (None, _) => text.push_str(&target_text),
    }
    text.push_str("]]");
    text
}
