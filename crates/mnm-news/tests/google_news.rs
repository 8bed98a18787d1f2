//! Integration tests for `GoogleNewsSource` using wiremock HTTP mocks.

use std::sync::Arc;
use std::time::Duration;

use mnm_news::sources::GoogleNewsSource;
use mnm_news::{Aggregator, HttpSettings, NewsError, NewsSource, SourceKind};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NUBANK_RSS: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>"Nubank" - Google News</title>
    <item>
      <title>Nubank lança cartão para PJ - InfoMoney</title>
      <link>https://news.google.com/rss/articles/abc?oc=5</link>
      <pubDate>Tue, 02 Jan 2024 10:00:00 GMT</pubDate>
      <description>&lt;a href="https://www.infomoney.com.br/nubank-pj"&gt;Nubank lança cartão para PJ&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;InfoMoney&lt;/font&gt;</description>
      <source url="https://www.infomoney.com.br">InfoMoney</source>
    </item>
    <item>
      <title></title>
      <link>https://news.google.com/rss/articles/empty</link>
    </item>
    <item>
      <title>Nubank sem data - Exame</title>
      <link>https://news.google.com/rss/articles/def</link>
      <description>&lt;a href="https://exame.com/nubank"&gt;Nubank sem data&lt;/a&gt;&amp;nbsp;&lt;font color="#6f6f6f"&gt;Exame&lt;/font&gt;</description>
    </item>
  </channel>
</rss>"##;

fn source(server: &MockServer) -> GoogleNewsSource {
    GoogleNewsSource::new(HttpSettings::default(), "pt-BR", "BR")
        .with_endpoint(&format!("{}/rss/search", server.uri()))
}

#[tokio::test]
async fn fetch_sends_locale_and_maps_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rss/search"))
        .and(query_param("q", "Nubank"))
        .and(query_param("hl", "pt-BR"))
        .and(query_param("gl", "BR"))
        .and(query_param("ceid", "BR:pt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NUBANK_RSS))
        .expect(1)
        .mount(&server)
        .await;

    let records = source(&server)
        .fetch(&["Nubank".to_string()])
        .await
        .expect("fetch should succeed");

    assert_eq!(records.len(), 2, "item with empty title is dropped");

    let first = &records[0];
    assert_eq!(first.company(), "Nubank");
    assert_eq!(first.title(), "Nubank lança cartão para PJ");
    assert_eq!(first.url(), "https://www.infomoney.com.br/nubank-pj");
    assert_eq!(first.source_name(), "InfoMoney");
    assert_eq!(first.source_kind(), SourceKind::SearchRss);
    assert!(first.published_at().is_some());

    let second = &records[1];
    assert_eq!(second.url(), "https://exame.com/nubank");
    assert_eq!(second.source_name(), "Exame");
    assert!(second.published_at().is_none());
}

#[tokio::test]
async fn one_failing_company_does_not_hide_the_others() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("q", "Nubank"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NUBANK_RSS))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "Stone"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let records = source(&server)
        .fetch(&["Stone".to_string(), "Nubank".to_string()])
        .await
        .expect("partial failure is not an error");

    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.company() == "Nubank"));
}

#[tokio::test]
async fn every_company_failing_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = source(&server)
        .fetch(&["Stone".to_string()])
        .await
        .expect_err("all requests failed");

    match err {
        NewsError::UnexpectedStatus { status, endpoint } => {
            assert_eq!(status, 500);
            assert!(endpoint.ends_with("/rss/search"));
            assert!(!endpoint.contains('?'));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_feed_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<rss><channel></oops>"))
        .mount(&server)
        .await;

    let result = source(&server).fetch(&["Totvs".to_string()]).await;
    assert!(matches!(result, Err(NewsError::Xml(_))));
}

#[tokio::test]
async fn slow_companies_do_not_push_the_source_past_its_deadline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("q", "Nubank"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NUBANK_RSS))
        .mount(&server)
        .await;
    for slow in ["Slow1", "Slow2", "Slow3"] {
        Mock::given(method("GET"))
            .and(query_param("q", slow))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(NUBANK_RSS)
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
    }

    let http = HttpSettings {
        timeout: Duration::from_millis(800),
        ..HttpSettings::default()
    };
    let source = GoogleNewsSource::new(http, "pt-BR", "BR")
        .with_endpoint(&format!("{}/rss/search", server.uri()));
    let aggregator = Aggregator::new(vec![Arc::new(source)], Duration::from_millis(1500))
        .expect("one source registered");

    let companies: Vec<String> = ["Nubank", "Slow1", "Slow2", "Slow3"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let records = aggregator.aggregate(&companies).await;

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.company() == "Nubank"));
}
