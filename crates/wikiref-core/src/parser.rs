use std::ops::Range;

use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd};

use crate::line_map::LineMap;
use crate::model::{LinkKind, LinkNode};

const MAIL_SCHEME: &str = "mailto:";

struct PendingLink {
    href: String,
    kind: LinkKind,
    span: Range<usize>,
    text: String,
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_WIKILINKS);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    options
}

fn link_kind(link_type: LinkType, is_image: bool) -> LinkKind {
    match link_type {
        LinkType::WikiLink { .. } if is_image => LinkKind::EmbeddedWikiLink,
        LinkType::WikiLink { .. } => LinkKind::WikiLink,
        _ if is_image => LinkKind::Image,
        LinkType::Inline => LinkKind::Explicit,
        LinkType::Reference
        | LinkType::ReferenceUnknown
        | LinkType::Collapsed
        | LinkType::CollapsedUnknown
        | LinkType::Shortcut
        | LinkType::ShortcutUnknown => LinkKind::Reference,
        LinkType::Autolink => LinkKind::AutoLink,
        LinkType::Email => LinkKind::MailLink,
    }
}

/// Locate the body of a wiki link starting at `start` (`[[` or `![[`).
/// Returns the body span and the offset just past the closing `]]`.
fn wiki_body(text: &str, start: usize) -> Option<(Range<usize>, usize)> {
    let rest = text.get(start..)?;
    let open = rest.find("[[").filter(|&pos| pos <= 1)?;
    let body_start = start + open + 2;
    let close = text[body_start..].find("]]")?;
    let body_end = body_start + close;
    Some((body_start..body_end, body_end + 2))
}

fn start_link(
    text: &str,
    link_type: LinkType,
    dest_url: &str,
    span: Range<usize>,
    is_image: bool,
) -> PendingLink {
    let kind = link_kind(link_type, is_image);

    if kind.is_wiki() {
        if let Some((body, end)) = wiki_body(text, span.start) {
            return PendingLink {
                href: text[body].to_string(),
                kind,
                span: span.start..end.max(span.end),
                text: String::new(),
            };
        }
        // pulldown_cmark may report the range before the last ']'
        let mut end = span.end;
        while end < text.len() && text.as_bytes()[end] == b']' {
            end += 1;
        }
        return PendingLink {
            href: dest_url.to_string(),
            kind,
            span: span.start..end,
            text: String::new(),
        };
    }

    let href = if kind == LinkKind::MailLink && !dest_url.starts_with(MAIL_SCHEME) {
        format!("{}{}", MAIL_SCHEME, dest_url)
    } else {
        dest_url.to_string()
    };

    PendingLink {
        href,
        kind,
        span,
        text: String::new(),
    }
}

/// Extract every link of a markdown document in source order.
///
/// Wiki links keep their raw body as `href` (`page|text#anchor`); splitting
/// it depends on the configured [`crate::syntax::WikiLinkFormat`]. Email
/// autolinks get a `mailto:` href.
pub fn extract_links(text: &str) -> Vec<LinkNode> {
    let parser = Parser::new_ext(text, parser_options());
    let line_map = LineMap::new(text);

    let mut links = Vec::new();
    let mut open: Vec<PendingLink> = Vec::new();

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                ..
            }) => open.push(start_link(text, link_type, &dest_url, range, false)),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                ..
            }) => open.push(start_link(text, link_type, &dest_url, range, true)),
            Event::Text(t) | Event::Code(t) => {
                for pending in open.iter_mut() {
                    pending.text.push_str(&t);
                }
            }
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                if let Some(pending) = open.pop() {
                    links.push(LinkNode {
                        range: line_map.range(pending.span),
                        href: pending.href,
                        text: pending.text.trim().to_string(),
                        kind: pending.kind,
                    });
                }
            }
            _ => {}
        }
    }

    links.sort_by_key(|link| (link.range.start.line, link.range.start.col));
    links
}
