//! Integration tests for the crawl-to-graph pipeline
//!
//! These tests use wiremock to serve a small documentation site and run
//! sitemap reading, page extraction, graph building and cache refresh
//! end-to-end.

use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use docgraph::cache::{load_or_refresh, refresh, GraphSource, SnapshotCache};
use docgraph::config::UserAgentConfig;
use docgraph::crawler::{build_http_client, extract_page, GraphBuilder, BATCH_SIZE};
use docgraph::graph::{DocumentGraph, FlatRecord};
use docgraph::sitemap::read_sitemap;
use docgraph::storage::{KeyValueStore, MemoryStore, SqliteStore};
use docgraph::DocGraphError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VERSION: &str = "5.1";

fn test_client() -> reqwest::Client {
    build_http_client(&UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    })
    .expect("Failed to build client")
}

fn sitemap_xml(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|url| format!("<url><loc>{}</loc></url>", url))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

/// Renders a documentation page with an optional browse navigation
fn page_html(title: &str, body: &str, previous: Option<&str>, next: Option<&str>) -> String {
    let mut nav = String::new();
    if let Some(href) = previous {
        nav.push_str(&format!(r#"<a rel="prev" href="{}">Previous</a>"#, href));
    }
    if let Some(href) = next {
        nav.push_str(&format!(r#"<a rel="next" href="{}">Next</a>"#, href));
    }

    format!(
        r##"<html><head><title>{title} | Docs</title></head><body>
        <h1>{title}<a class="headerlink" href="#top">¶</a></h1>
        <div id="docs-content">{body}</div>
        <nav aria-labelledby="browse-header">{nav}</nav>
        </body></html>"##
    )
}

async fn mount_html(server: &MockServer, page_path: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_sitemap(server: &MockServer, urls: &[String]) {
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sitemap_xml(urls))
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

fn builder_for(server: &MockServer) -> GraphBuilder {
    GraphBuilder::new(test_client(), format!("{}/sitemap.xml", server.uri()))
}

#[tokio::test]
async fn test_read_sitemap_lists_locations() {
    let server = MockServer::start().await;
    let base = server.uri();
    let urls = vec![
        format!("{}/en/5.1/topics/db/", base),
        format!("{}/en/5.1/ref/models/", base),
    ];
    mount_sitemap(&server, &urls).await;

    let listed = read_sitemap(&test_client(), &format!("{}/sitemap.xml", base))
        .await
        .expect("Sitemap should be readable");

    assert_eq!(listed, urls);
}

#[tokio::test]
async fn test_read_sitemap_not_found_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = read_sitemap(&test_client(), &format!("{}/sitemap.xml", server.uri()))
        .await
        .expect_err("404 should fail");

    match err {
        DocGraphError::Fetch { status, reason, .. } => {
            assert_eq!(status, 404);
            assert_eq!(reason, "Not Found");
        }
        other => panic!("Expected Fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_extract_page_over_http() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_html(
        &server,
        "/en/5.1/topics/db/",
        page_html(
            "Models and databases",
            r#"<p>See <a href="queries/">queries</a>.</p>"#,
            Some("../http/"),
            Some("/en/5.1/topics/forms/"),
        ),
    )
    .await;

    let page = extract_page(&test_client(), &format!("{}/en/5.1/topics/db/", base))
        .await
        .expect("Page should extract");

    assert_eq!(page.title, "Models and databases");
    assert!(page
        .content
        .contains(&format!("{}/en/5.1/topics/db/queries/", base)));
    assert_eq!(
        page.previous_url.as_deref(),
        Some(format!("{}/en/5.1/topics/http/", base).as_str())
    );
    assert_eq!(
        page.next_url.as_deref(),
        Some(format!("{}/en/5.1/topics/forms/", base).as_str())
    );
}

#[tokio::test]
async fn test_extract_page_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = extract_page(&test_client(), &format!("{}/en/5.1/ref/", server.uri()))
        .await
        .expect_err("503 should fail");

    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_build_graph_filters_and_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    let db = format!("{}/en/5.1/topics/db/", base);
    let queries = format!("{}/en/5.1/topics/db/queries/", base);
    let models = format!("{}/en/5.1/ref/models/", base);

    let sitemap = vec![
        db.clone(),
        format!("{}/en/5.0/topics/db/", base),
        format!("{}/en/5.1/intro/", base),
        queries.clone(),
        format!("{}/en/5.1/topics/db/queries/extra/", base),
        models.clone(),
    ];
    mount_sitemap(&server, &sitemap).await;

    mount_html(
        &server,
        "/en/5.1/topics/db/",
        page_html("Databases", "<p>db</p>", None, Some(&queries)),
    )
    .await;
    mount_html(
        &server,
        "/en/5.1/topics/db/queries/",
        page_html("Queries", "<p>queries</p>", Some(&db), Some(&models)),
    )
    .await;
    mount_html(
        &server,
        "/en/5.1/ref/models/",
        page_html(
            "Model reference",
            "<p>models</p>",
            Some(&queries),
            Some("/en/5.1/ref/unlisted/"),
        ),
    )
    .await;

    let graph = builder_for(&server)
        .build_graph(VERSION)
        .await
        .expect("Graph should build");

    let urls: Vec<&str> = graph.documents().iter().map(|d| d.url()).collect();
    assert_eq!(urls, vec![db.as_str(), queries.as_str(), models.as_str()]);

    let db_id = graph.find(&db).expect("db page");
    let queries_id = graph.find(&queries).expect("queries page");
    let models_id = graph.find(&models).expect("models page");

    assert_eq!(graph.next_of(db_id).map(|d| d.url()), Some(queries.as_str()));
    assert!(graph.previous_of(db_id).is_none());
    assert_eq!(
        graph.previous_of(queries_id).map(|d| d.url()),
        Some(db.as_str())
    );
    assert_eq!(
        graph.next_of(queries_id).map(|d| d.url()),
        Some(models.as_str())
    );

    // Reported next link points outside the crawled set
    assert!(graph.next_of(models_id).is_none());

    // In-scope pages sit too close to their section root for a parent
    assert!(graph.documents().iter().all(|d| d.parent().is_none()));

    assert_eq!(graph.get(db_id).map(|d| d.title()), Some("Databases"));
}

#[tokio::test]
async fn test_build_graph_preserves_sitemap_order_across_batches() {
    let server = MockServer::start().await;
    let base = server.uri();

    let count = BATCH_SIZE + 2;
    let urls: Vec<String> = (0..count)
        .map(|i| format!("{}/en/5.1/topics/page{}/", base, i))
        .collect();
    mount_sitemap(&server, &urls).await;

    for i in 0..count {
        let mut template = ResponseTemplate::new(200)
            .set_body_string(page_html(&format!("Page {}", i), "<p>x</p>", None, None))
            .insert_header("content-type", "text/html");
        // A slow early page must not reorder the batch
        if i == 2 {
            template = template.set_delay(StdDuration::from_millis(200));
        }
        Mock::given(method("GET"))
            .and(path(format!("/en/5.1/topics/page{}/", i)))
            .respond_with(template)
            .mount(&server)
            .await;
    }

    let graph = builder_for(&server)
        .build_graph(VERSION)
        .await
        .expect("Graph should build");

    assert_eq!(graph.len(), count);
    for (i, document) in graph.documents().iter().enumerate() {
        assert_eq!(document.url(), urls[i]);
        assert_eq!(document.title(), format!("Page {}", i));
    }
}

#[tokio::test]
async fn test_build_graph_fails_on_any_page_error() {
    let server = MockServer::start().await;
    let base = server.uri();

    let urls: Vec<String> = (0..10)
        .map(|i| format!("{}/en/5.1/ref/page{}/", base, i))
        .collect();
    mount_sitemap(&server, &urls).await;

    Mock::given(method("GET"))
        .and(path("/en/5.1/ref/page4/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page_html("Page", "<p>x</p>", None, None))
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let builder = builder_for(&server);
    let err = builder
        .build_graph(VERSION)
        .await
        .expect_err("A failed page should fail the build");
    assert_eq!(err.status(), Some(500));

    // A failed refresh leaves nothing behind
    let mut cache = SnapshotCache::new(MemoryStore::new(), "docs");
    assert!(refresh(&mut cache, &builder, VERSION).await.is_err());
    assert!(cache.store().is_empty());
}

#[tokio::test]
async fn test_build_graph_empty_scope() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_sitemap(&server, &[format!("{}/en/4.2/topics/db/", base)]).await;

    let graph = builder_for(&server)
        .build_graph(VERSION)
        .await
        .expect("Empty scope is not an error");

    assert!(graph.is_empty());
}

#[tokio::test]
async fn test_load_or_refresh_uses_fresh_cache() {
    let server = MockServer::start().await;
    // Any request fails the test through expect(0)
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let cached = DocumentGraph::from_records(vec![FlatRecord {
        url: "https://docs.example.com/en/5.1/topics/db/".to_string(),
        title: "Databases".to_string(),
        content: "body".to_string(),
        parent_url: None,
        previous_url: None,
        next_url: None,
    }]);

    let mut cache = SnapshotCache::new(MemoryStore::new(), "docs");
    cache.write(VERSION, &cached).expect("write");

    let loaded = load_or_refresh(
        &mut cache,
        &builder_for(&server),
        VERSION,
        Duration::days(7),
        false,
    )
    .await
    .expect("Fresh cache should load");

    assert_eq!(loaded.source, GraphSource::Cache);
    assert_eq!(loaded.graph, cached);
}

#[tokio::test]
async fn test_load_or_refresh_recrawls_stale_snapshot() {
    let server = MockServer::start().await;
    let base = server.uri();
    let page = format!("{}/en/5.1/topics/db/", base);
    mount_sitemap(&server, &[page.clone()]).await;
    mount_html(
        &server,
        "/en/5.1/topics/db/",
        page_html("Fresh title", "<p>new</p>", None, None),
    )
    .await;

    let old = DocumentGraph::from_records(vec![FlatRecord {
        url: page.clone(),
        title: "Old title".to_string(),
        content: String::new(),
        parent_url: None,
        previous_url: None,
        next_url: None,
    }]);

    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::new(&dir.path().join("snapshots.db")).expect("store");
    let mut cache = SnapshotCache::new(store, "docs");
    cache
        .write_at(VERSION, &old, Utc::now() - Duration::days(8))
        .expect("write");

    let loaded = load_or_refresh(
        &mut cache,
        &builder_for(&server),
        VERSION,
        Duration::days(7),
        false,
    )
    .await
    .expect("Stale cache should be rebuilt");

    assert_eq!(loaded.source, GraphSource::Crawl);
    assert_eq!(loaded.graph.documents()[0].title(), "Fresh title");

    assert!(!cache.is_stale(VERSION, Duration::days(7)).expect("status"));
    let reread = cache.read(VERSION).expect("read").expect("snapshot");
    assert_eq!(reread, loaded.graph);
}

#[tokio::test]
async fn test_forced_refresh_ignores_fresh_cache() {
    let server = MockServer::start().await;
    let base = server.uri();
    let page = format!("{}/en/5.1/ref/settings/", base);
    mount_sitemap(&server, &[page.clone()]).await;
    mount_html(
        &server,
        "/en/5.1/ref/settings/",
        page_html("Settings", "<p>s</p>", None, None),
    )
    .await;

    let mut cache = SnapshotCache::new(MemoryStore::new(), "docs");
    cache
        .write(VERSION, &DocumentGraph::from_records(Vec::new()))
        .expect("write");

    let loaded = load_or_refresh(
        &mut cache,
        &builder_for(&server),
        VERSION,
        Duration::days(7),
        true,
    )
    .await
    .expect("Forced refresh should crawl");

    assert_eq!(loaded.source, GraphSource::Crawl);
    assert_eq!(loaded.graph.len(), 1);
    assert_eq!(
        cache.store().keys().expect("keys"),
        vec!["docs-5.1".to_string()]
    );
}
