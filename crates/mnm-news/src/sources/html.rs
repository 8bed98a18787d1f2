//! HTML helpers for feed descriptions and scraped company pages.
//!
//! `scraper::Html` is not `Send`, so everything here is synchronous and
//! returns owned data; callers parse after the response body is read.

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::dates::{parse_timestamp, HTML_DATE_FORMATS};
use crate::types::RawItem;

/// Headline selectors tried on company pages when the feed yields nothing.
pub(crate) const HEADLINE_SELECTORS: &str = "article h2, h2.entry-title, .post-title, .card__title";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// Visible text of an HTML fragment.
pub(crate) fn to_text(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    element_text(html.root_element())
}

/// First `href` in an HTML fragment.
pub(crate) fn first_link(fragment: &str) -> Option<String> {
    let html = Html::parse_fragment(fragment);
    html.select(&selector("a[href]"))
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .map(ToString::to_string)
}

/// Text of the first element matching `css` in an HTML fragment.
pub(crate) fn first_text(fragment: &str, css: &str) -> Option<String> {
    let html = Html::parse_fragment(fragment);
    html.select(&selector(css))
        .map(element_text)
        .find(|text| !text.is_empty())
}

/// Pull up to `limit` headlines from a company page.
///
/// The link is the first `a[href]` inside or around the headline, resolved
/// against `page_url`; without one, the page itself is used. The date comes
/// from a `time[datetime]` in the enclosing `<article>` if there is one.
pub(crate) fn scrape_headlines(page: &str, page_url: &Url, limit: usize) -> Vec<RawItem> {
    let html = Html::parse_document(page);
    let headline_sel = selector(HEADLINE_SELECTORS);
    let link_sel = selector("a[href]");
    let time_sel = selector("time[datetime]");

    let mut items = Vec::new();
    for headline in html.select(&headline_sel) {
        if items.len() >= limit {
            break;
        }
        let title = element_text(headline);
        if title.is_empty() {
            continue;
        }

        let article = headline
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "article");

        let href = headline
            .select(&link_sel)
            .next()
            .or_else(|| {
                headline
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .find(|el| el.value().name() == "a" && el.value().attr("href").is_some())
            })
            .and_then(|a| a.value().attr("href"));
        let url = href
            .and_then(|h| page_url.join(h.trim()).ok())
            .unwrap_or_else(|| page_url.clone());

        let published_at = article
            .and_then(|a| a.select(&time_sel).next())
            .and_then(|t| t.value().attr("datetime"))
            .and_then(|raw| parse_timestamp(raw, HTML_DATE_FORMATS));

        items.push(RawItem {
            title: Some(title),
            url: Some(url.to_string()),
            published_at,
            ..RawItem::default()
        });
    }
    items
}
