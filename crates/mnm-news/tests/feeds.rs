//! Integration tests for the publisher feed and company site sources.

use mnm_core::CompanySite;
use mnm_news::sources::{CompanySiteSource, PublisherFeedsSource};
use std::sync::Arc;
use std::time::Duration;

use mnm_news::{Aggregator, HttpSettings, NewsSource, SourceKind};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rss(channel: &str, items: &[(&str, &str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(title, link, description)| {
            format!(
                "<item><title>{title}</title><link>{link}</link>\
                 <description>{description}</description>\
                 <pubDate>Tue, 02 Jan 2024 10:00:00 GMT</pubDate></item>"
            )
        })
        .collect();
    format!("<rss version=\"2.0\"><channel><title>{channel}</title>{items}</channel></rss>")
}

async fn mount(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn publisher_feeds_keep_only_relevant_items() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/valor",
        200,
        rss(
            "Valor Econômico",
            &[
                ("Stone anuncia resultado", "https://valor.test/stone", ""),
                ("Bolsa fecha em alta", "https://valor.test/bolsa", "Sem empresas"),
                ("Fintechs", "https://valor.test/fintechs", "Totvs e Nubank crescem"),
            ],
        ),
    )
    .await;
    mount(&server, "/exame", 503, String::new()).await;

    let source = PublisherFeedsSource::new(
        HttpSettings::default(),
        vec![format!("{}/valor", server.uri()), format!("{}/exame", server.uri())],
    );
    let records = source
        .fetch(&["Stone".to_string(), "Nubank".to_string()])
        .await
        .expect("one healthy feed is enough");

    let got: Vec<_> = records.iter().map(|r| (r.company(), r.url())).collect();
    assert_eq!(
        got,
        vec![
            ("Stone", "https://valor.test/stone"),
            ("Nubank", "https://valor.test/fintechs"),
        ]
    );
    assert!(records.iter().all(|r| r.source_name() == "Valor Econômico"));
    assert!(records
        .iter()
        .all(|r| r.source_kind() == SourceKind::PublisherFeed));
}

#[tokio::test]
async fn publisher_feeds_all_failing_is_an_error() {
    let server = MockServer::start().await;
    mount(&server, "/a", 500, String::new()).await;

    let source = PublisherFeedsSource::new(
        HttpSettings::default(),
        vec![format!("{}/a", server.uri())],
    );
    assert!(source.fetch(&["Stone".to_string()]).await.is_err());
}

fn site(server: &MockServer, company: &str, feed: Option<&str>, page: Option<&str>) -> CompanySite {
    CompanySite {
        company: company.to_string(),
        feed_url: feed.map(|p| format!("{}{p}", server.uri())),
        page_url: page.map(|p| format!("{}{p}", server.uri())),
    }
}

#[tokio::test]
async fn company_site_prefers_feed_and_caps_items() {
    let server = MockServer::start().await;
    let items: Vec<(String, String)> = (0..7)
        .map(|i| (format!("Post {i}"), format!("https://blog.test/{i}")))
        .collect();
    let borrowed: Vec<(&str, &str, &str)> = items
        .iter()
        .map(|(t, l)| (t.as_str(), l.as_str(), "<p>corpo</p>"))
        .collect();
    mount(&server, "/feed", 200, rss("Blog", &borrowed)).await;

    let source = CompanySiteSource::new(
        HttpSettings::default(),
        vec![site(&server, "Nubank", Some("/feed"), Some("/blog"))],
    );
    let records = source.fetch(&["nubank".to_string()]).await.unwrap();

    assert_eq!(records.len(), 5);
    assert!(records
        .iter()
        .all(|r| r.source_name() == "Site Oficial (RSS)" && r.description() == "corpo"));
    assert_eq!(records[0].source_kind(), SourceKind::CompanySite);
}

#[tokio::test]
async fn company_site_scrapes_page_when_feed_fails() {
    let server = MockServer::start().await;
    mount(&server, "/feed", 404, String::new()).await;
    mount(
        &server,
        "/blog/",
        200,
        r#"<html><body>
            <article><time datetime="2024-01-05">5 jan</time>
              <h2><a href="/blog/maquininha">Nova maquininha</a></h2></article>
            <div class="card"><span class="card__title">Parceria anunciada</span></div>
        </body></html>"#
            .to_string(),
    )
    .await;

    let source = CompanySiteSource::new(
        HttpSettings::default(),
        vec![site(&server, "Stone", Some("/feed"), Some("/blog/"))],
    );
    let records = source.fetch(&["Stone".to_string()]).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title(), "Nova maquininha");
    assert_eq!(records[0].url(), format!("{}/blog/maquininha", server.uri()));
    assert!(records[0].published_at().is_some());
    assert_eq!(records[1].url(), format!("{}/blog/", server.uri()));
    assert!(records.iter().all(|r| r.source_name() == "Site Oficial"));
}

#[tokio::test]
async fn company_without_catalogue_entry_yields_nothing() {
    let server = MockServer::start().await;
    let source = CompanySiteSource::new(
        HttpSettings::default(),
        vec![site(&server, "Totvs", Some("/feed"), None)],
    );
    let records = source.fetch(&["Unknown Co".to_string()]).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn unlinked_headlines_survive_aggregation() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/novidades",
        200,
        r#"<html><body>
            <h2 class="entry-title">Post um</h2>
            <h2 class="entry-title">Post dois</h2>
            <h2 class="entry-title">Post três</h2>
        </body></html>"#
            .to_string(),
    )
    .await;

    let source = CompanySiteSource::new(
        HttpSettings::default(),
        vec![site(&server, "Totvs", None, Some("/novidades"))],
    );
    let aggregator = Aggregator::new(vec![Arc::new(source)], Duration::from_secs(5))
        .expect("one source registered");
    let records = aggregator.aggregate(&["Totvs".to_string()]).await;

    let titles: Vec<_> = records.iter().map(|r| r.title()).collect();
    assert_eq!(titles, vec!["Post um", "Post dois", "Post três"]);
    assert!(records
        .iter()
        .all(|r| r.url() == format!("{}/novidades", server.uri())));
}
