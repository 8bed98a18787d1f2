//! Shared RSS/Atom feed parsing.
//!
//! Used by every feed-backed source so item extraction lives in one place.
//! Handles RSS `<item>` and Atom `<entry>` elements; text inside a field is
//! accumulated until that field's own closing tag, so nested markup does not
//! truncate descriptions.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::dates::{parse_timestamp, FEED_DATE_FORMATS};
use crate::error::NewsError;

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Feed {
    /// Channel (RSS) or feed (Atom) title.
    pub title: Option<String>,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub published: Option<String>,
    /// RSS `<source>` element text (Google News puts the publisher here).
    pub source: Option<String>,
    pub guid: Option<String>,
}

impl FeedItem {
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published
            .as_deref()
            .and_then(|raw| parse_timestamp(raw, FEED_DATE_FORMATS))
    }

    /// The item link, or a `guid` that is itself a URL.
    pub fn permalink(&self) -> Option<String> {
        self.link.clone().or_else(|| {
            self.guid
                .as_deref()
                .filter(|g| g.starts_with("http"))
                .map(ToString::to_string)
        })
    }
}

/// Lower rank wins when an item carries several date elements.
fn date_rank(tag: &str) -> Option<u8> {
    match tag {
        "pubDate" => Some(0),
        "published" => Some(1),
        "updated" => Some(2),
        "dc:date" => Some(3),
        _ => None,
    }
}

fn is_item_field(tag: &str) -> bool {
    matches!(
        tag,
        "title"
            | "link"
            | "description"
            | "summary"
            | "content"
            | "content:encoded"
            | "source"
            | "guid"
            | "id"
    ) || date_rank(tag).is_some()
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn href(e: &BytesStart<'_>) -> Option<String> {
    let attr = e.try_get_attribute("href").ok().flatten()?;
    let value = attr
        .unescape_value()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Parse an RSS 2.0 or Atom document.
///
/// # Errors
///
/// Returns [`NewsError::Xml`] if the document is malformed before any item
/// could be read. Errors after the first complete item are logged and the
/// items parsed so far are returned.
pub(crate) fn parse_feed(xml: &str) -> Result<Feed, NewsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut feed = Feed::default();
    let mut current: Option<FeedItem> = None;
    let mut date_seen: Option<u8> = None;
    // (tag, accumulated text) for the field currently being read.
    let mut capture: Option<(String, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if capture.is_some() {
                    continue;
                }
                let name = tag_name(&e);
                if name == "item" || name == "entry" {
                    current = Some(FeedItem::default());
                    date_seen = None;
                } else if let Some(item) = current.as_mut() {
                    if name == "link" && item.link.is_none() {
                        item.link = href(&e);
                    }
                    if is_item_field(&name) {
                        capture = Some((name, String::new()));
                    }
                } else if name == "title" && feed.title.is_none() {
                    capture = Some((name, String::new()));
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(item) = current.as_mut() {
                    if capture.is_none() && tag_name(&e) == "link" && item.link.is_none() {
                        item.link = href(&e);
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some((_, buf)) = capture.as_mut() {
                    let text = e
                        .unescape()
                        .map(Cow::into_owned)
                        .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                    push_text(buf, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some((_, buf)) = capture.as_mut() {
                    push_text(buf, &String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if capture.as_ref().is_some_and(|(tag, _)| *tag == name) {
                    if let Some((tag, text)) = capture.take() {
                        let text = text.trim().to_string();
                        match current.as_mut() {
                            Some(item) => assign(item, &tag, text, &mut date_seen),
                            None if !text.is_empty() => feed.title = Some(text),
                            None => {}
                        }
                    }
                } else if (name == "item" || name == "entry") && capture.is_none() {
                    if let Some(item) = current.take() {
                        feed.items.push(item);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                if feed.items.is_empty() {
                    return Err(NewsError::Xml(e));
                }
                tracing::warn!(
                    items = feed.items.len(),
                    error = %e,
                    "feed truncated by XML error; keeping items parsed so far"
                );
                break;
            }
            _ => {}
        }
    }

    Ok(feed)
}

fn push_text(buf: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !buf.is_empty() {
        buf.push(' ');
    }
    buf.push_str(text);
}

fn assign(item: &mut FeedItem, tag: &str, text: String, date_seen: &mut Option<u8>) {
    if text.is_empty() {
        return;
    }
    if let Some(rank) = date_rank(tag) {
        if date_seen.map_or(true, |seen| rank < seen) {
            item.published = Some(text);
            *date_seen = Some(rank);
        }
        return;
    }
    let slot = match tag {
        "title" => &mut item.title,
        "link" => &mut item.link,
        "description" | "summary" | "content" | "content:encoded" => &mut item.description,
        "source" => &mut item.source,
        "guid" | "id" => &mut item.guid,
        _ => return,
    };
    if slot.is_none() {
        *slot = Some(text);
    }
}
