//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use hostmap::config::{CrawlConfig, ProbeMode};
use hostmap::crawler::{crawl, Coordinator};
use hostmap::state::PageOutcome;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted at the mock server
fn create_test_config(server: &MockServer) -> CrawlConfig {
    let mut config = CrawlConfig::new(format!("{}/", server.uri()));
    config.request_timeout_secs = 5;
    config.connect_timeout_secs = 2;
    config
}

const HTML_MIME: &str = "text/html; charset=utf-8";

/// Bodiless HTML response, used to answer HEAD probes
fn html_response() -> ResponseTemplate {
    ResponseTemplate::new(200).insert_header("content-type", HTML_MIME)
}

/// HTML response with a body; the body's mime is what sets Content-Type
fn html_page(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), HTML_MIME)
}

/// Mounts an HTML page that must be probed and fetched exactly once
async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("HEAD"))
        .and(path(page_path))
        .respond_with(html_response())
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(body))
        .expect(1)
        .mount(server)
        .await;
}

fn links_of<'a>(outcome: &'a PageOutcome) -> &'a BTreeSet<String> {
    outcome.links().expect("page was not linked")
}

#[tokio::test]
async fn test_single_link_spawns_child() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", format!("<a href='{}/a'>", base)).await;
    mount_page(&server, "/a", "<p>leaf</p>".to_string()).await;

    let report = crawl(create_test_config(&server)).await.expect("crawl failed");

    let root = format!("{}/", base);
    let child = format!("{}/a", base);
    assert_eq!(report.root, root);
    assert_eq!(report.pages.len(), 2);
    assert_eq!(
        links_of(&report.pages[&root]),
        &BTreeSet::from([child.clone()])
    );
    assert!(links_of(&report.pages[&child]).is_empty());
}

#[tokio::test]
async fn test_img_tag_contributes_nothing() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        format!("<a href='{}'><img/><a href='{}/link'>", base, base),
    )
    .await;
    mount_page(&server, "/link", String::new()).await;

    let report = crawl(create_test_config(&server)).await.expect("crawl failed");

    let root = format!("{}/", base);
    let links = links_of(&report.pages[&root]);
    assert_eq!(links.len(), 2);
    assert!(links.contains(&root));
    assert!(links.contains(&format!("{}/link", base)));
    // The self-link must not cause a second fetch of the root (checked by expect(1))
    assert_eq!(report.pages.len(), 2);
}

#[tokio::test]
async fn test_transport_error_is_recorded_and_run_completes() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Same host, closed port: in scope, but the connection is refused
    let broken = "http://127.0.0.1:1/nowhere".to_string();
    mount_page(
        &server,
        "/",
        format!("<a href='{}'></a><a href='/ok'></a>", broken),
    )
    .await;
    mount_page(&server, "/ok", String::new()).await;

    let report = crawl(create_test_config(&server)).await.expect("crawl failed");

    assert_eq!(report.pages.len(), 3);
    assert!(matches!(
        report.pages[&broken],
        PageOutcome::Error { .. }
    ));
    assert!(report.pages[&format!("{}/ok", base)].is_linked());
    assert_eq!(report.statistics().error_pages, 1);
}

#[tokio::test]
async fn test_unreachable_root() {
    let report = crawl(CrawlConfig::new("http://127.0.0.1:1/"))
        .await
        .expect("crawl failed");

    assert_eq!(report.pages.len(), 1);
    assert!(report.pages["http://127.0.0.1:1/"].is_error());
}

#[tokio::test]
async fn test_cycles_terminate_without_revisits() {
    let server = MockServer::start().await;

    mount_page(&server, "/", "<a href='/a'></a><a href='/b'></a>".to_string()).await;
    mount_page(
        &server,
        "/a",
        "<a href='/'></a><a href='/a'></a><a href='/b'></a>".to_string(),
    )
    .await;
    mount_page(&server, "/b", "<a href='/a'></a><a href='/b'></a>".to_string()).await;

    let report = tokio::time::timeout(Duration::from_secs(10), crawl(create_test_config(&server)))
        .await
        .expect("crawl did not terminate")
        .expect("crawl failed");

    assert_eq!(report.pages.len(), 3);
    assert!(report.pages.values().all(PageOutcome::is_linked));
}

#[tokio::test]
async fn test_fragment_variants_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        "<a href='/x#one'></a><a href='/x#two'></a><a href='/x'></a><a href='/x%23three'></a>"
            .to_string(),
    )
    .await;
    mount_page(&server, "/x", "<a href='/#top'></a>".to_string()).await;

    let report = crawl(create_test_config(&server)).await.expect("crawl failed");

    let root = format!("{}/", base);
    let x = format!("{}/x", base);
    assert_eq!(links_of(&report.pages[&root]), &BTreeSet::from([x.clone()]));
    assert_eq!(links_of(&report.pages[&x]), &BTreeSet::from([root]));
}

#[tokio::test]
async fn test_out_of_scope_links_dropped() {
    let server = MockServer::start().await;
    let port = url::Url::parse(&server.uri())
        .expect("Failed to parse base URL")
        .port()
        .expect("mock server has a port");

    mount_page(
        &server,
        "/",
        format!(
            "<a href='http://other.test/y'></a>\
             <a href='http://localhost:{}/z'></a>\
             <a href='mailto:someone@127.0.0.1'></a>\
             <a href='relative.html'></a>",
            port
        ),
    )
    .await;

    let report = crawl(create_test_config(&server)).await.expect("crawl failed");

    assert_eq!(report.pages.len(), 1);
    assert!(links_of(report.pages.values().next().unwrap()).is_empty());
}

#[tokio::test]
async fn test_relative_links_followed_when_enabled() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/docs/", "<a href='intro.html'></a>".to_string()).await;
    mount_page(&server, "/docs/intro.html", "<a href='../'></a>".to_string()).await;
    mount_page(&server, "/", String::new()).await;

    let mut config = create_test_config(&server);
    config.root_url = format!("{}/docs/", base);
    config.follow_relative_links = true;

    let report = crawl(config).await.expect("crawl failed");

    assert_eq!(report.pages.len(), 3);
    assert!(report.pages.contains_key(&format!("{}/docs/intro.html", base)));
    assert!(report.pages.contains_key(&format!("{}/", base)));
}

#[tokio::test]
async fn test_non_html_page_not_downloaded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "<a href='/report.pdf'></a>".to_string()).await;

    Mock::given(method("HEAD"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/pdf"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = crawl(create_test_config(&server)).await.expect("crawl failed");

    assert_eq!(
        report.pages[&format!("{}/report.pdf", base)],
        PageOutcome::NonHtml {
            content_type: "application/pdf".to_string()
        }
    );
}

#[tokio::test]
async fn test_missing_content_type_is_non_html() {
    let server = MockServer::start().await;
    let base = server.uri();

    // /gone is not mounted: wiremock answers 404 without a content type
    mount_page(&server, "/", "<a href='/gone'></a>".to_string()).await;

    let report = crawl(create_test_config(&server)).await.expect("crawl failed");

    assert!(matches!(
        report.pages[&format!("{}/gone", base)],
        PageOutcome::NonHtml { .. }
    ));
}

#[tokio::test]
async fn test_html_error_page_still_parsed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "<a href='/missing'></a>".to_string()).await;

    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_raw("<a href='/'>home</a>", "text/html"),
        )
        .mount(&server)
        .await;

    let report = crawl(create_test_config(&server)).await.expect("crawl failed");

    let missing = &report.pages[&format!("{}/missing", base)];
    assert_eq!(links_of(missing), &BTreeSet::from([format!("{}/", base)]));
}

#[tokio::test]
async fn test_user_agent_sent_on_every_request() {
    let server = MockServer::start().await;
    let base = server.uri();
    let agent = "hostmap-test/0.1";

    for page in ["/", "/next"] {
        Mock::given(method("HEAD"))
            .and(path(page))
            .and(header("user-agent", agent))
            .respond_with(html_response())
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", agent))
        .respond_with(html_page("<a href='/next'></a>"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .and(header("user-agent", agent))
        .respond_with(html_response())
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.user_agent = agent.to_string();

    let report = crawl(config).await.expect("crawl failed");

    assert!(report.pages[&format!("{}/", base)].is_linked());
    assert!(report.pages[&format!("{}/next", base)].is_linked());
}

#[tokio::test]
async fn test_inline_probe_skips_head() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("HEAD"))
        .respond_with(html_response())
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("<a href='/logo.png'></a>"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(vec![0x89, b'P', b'N', b'G']),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.probe = ProbeMode::Inline;

    let report = crawl(config).await.expect("crawl failed");

    assert_eq!(report.pages.len(), 2);
    assert_eq!(
        links_of(&report.pages[&format!("{}/", base)]),
        &BTreeSet::from([format!("{}/logo.png", base)])
    );
    assert_eq!(
        report.pages[&format!("{}/logo.png", base)],
        PageOutcome::NonHtml {
            content_type: "image/png".to_string()
        }
    );
}

#[tokio::test]
async fn test_inline_probe_reads_get_content_type() {
    let server = MockServer::start().await;
    let base = server.uri();

    // A text body with links must not be parsed when the GET says text/plain
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<a href='/hidden'></a>"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.probe = ProbeMode::Inline;

    let report = crawl(config).await.expect("crawl failed");

    assert_eq!(report.pages.len(), 1);
    assert_eq!(
        report.pages[&format!("{}/", base)],
        PageOutcome::NonHtml {
            content_type: "text/plain".to_string()
        }
    );
}

#[tokio::test]
async fn test_get_failure_after_html_probe_is_error() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "<a href='/slow'></a>".to_string()).await;

    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(html_response())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("<a href='/never'></a>").set_delay(Duration::from_secs(3)))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.request_timeout_secs = 1;

    let report = crawl(config).await.expect("crawl failed");

    assert_eq!(report.pages.len(), 2);
    match &report.pages[&format!("{}/slow", base)] {
        PageOutcome::Error { reason } => assert!(reason.contains("timeout"), "{}", reason),
        other => panic!("expected an error outcome, got {:?}", other),
    }
    assert!(!report.pages.contains_key(&format!("{}/never", base)));
}

#[tokio::test]
async fn test_skip_extensions_never_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        "<a href='/photo.JPG'></a><a href='/page'></a>".to_string(),
    )
    .await;
    mount_page(&server, "/page", String::new()).await;

    let mut config = create_test_config(&server);
    config.skip_extensions = vec!["jpg".to_string()];

    let report = crawl(config).await.expect("crawl failed");

    assert_eq!(report.pages.len(), 2);
    assert!(!report.pages.contains_key(&format!("{}/photo.JPG", base)));
}

#[tokio::test]
async fn test_malformed_html_uses_partial_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        "<html><body><a href='/kept'>kept</a><table><tr><a href=\"/also\"".to_string(),
    )
    .await;
    mount_page(&server, "/kept", String::new()).await;

    let report = crawl(create_test_config(&server)).await.expect("crawl failed");

    assert!(report.pages[&format!("{}/", base)].is_linked());
    assert!(report.pages.contains_key(&format!("{}/kept", base)));
}

#[tokio::test]
async fn test_wide_graph_reaches_closure() {
    let server = MockServer::start().await;
    let base = server.uri();
    const PAGES: usize = 30;

    // Root links to every page; each page links to the next and back to root
    let root_body: String = (0..PAGES)
        .map(|i| format!("<a href='/p{}'></a>", i))
        .collect();
    mount_page(&server, "/", root_body).await;

    for i in 0..PAGES {
        let body = format!(
            "<a href='/'></a><a href='/p{}'></a><a href='/p{}'></a>",
            (i + 1) % PAGES,
            i
        );
        mount_page(&server, &format!("/p{}", i), body).await;
    }

    let report = crawl(create_test_config(&server)).await.expect("crawl failed");

    assert_eq!(report.pages.len(), PAGES + 1);
    let expected: BTreeSet<String> = std::iter::once(format!("{}/", base))
        .chain((0..PAGES).map(|i| format!("{}/p{}", base, i)))
        .collect();
    let visited: BTreeSet<String> = report.pages.keys().cloned().collect();
    assert_eq!(visited, expected);
    assert_eq!(report.statistics().linked_pages, PAGES + 1);
}

#[tokio::test]
async fn test_fetch_slots_bound_concurrency() {
    let server = MockServer::start().await;
    const CHILDREN: usize = 5;
    let delay = Duration::from_millis(100);

    let root_body: String = (0..CHILDREN)
        .map(|i| format!("<a href='/c{}'></a>", i))
        .collect();
    mount_page(&server, "/", root_body).await;

    for i in 0..CHILDREN {
        let child = format!("/c{}", i);
        Mock::given(method("HEAD"))
            .and(path(child.as_str()))
            .respond_with(html_response().set_delay(delay))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(child.as_str()))
            .respond_with(html_response())
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut config = create_test_config(&server);
    config.max_concurrent_fetches = 1;

    let start = Instant::now();
    let report = crawl(config).await.expect("crawl failed");
    let elapsed = start.elapsed();

    assert_eq!(report.pages.len(), CHILDREN + 1);
    // One slot: the delayed probes cannot overlap
    assert!(
        elapsed >= delay * CHILDREN as u32,
        "finished too fast for a single fetch slot: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_ledger_available_through_coordinator() {
    let server = MockServer::start().await;
    mount_page(&server, "/", String::new()).await;

    let coordinator = Coordinator::new(create_test_config(&server)).expect("setup failed");
    assert!(coordinator.ledger().is_empty());

    let report = coordinator.run().await;
    assert_eq!(report.pages.len(), 1);
    assert!(report.finished_at >= report.started_at);
}

#[tokio::test]
async fn test_initialization_error_aborts_before_fetching() {
    let result = crawl(CrawlConfig::new("http//missing-colon")).await;
    assert!(result.is_err());

    let result = crawl(CrawlConfig::default()).await;
    assert!(result.is_err());
}
