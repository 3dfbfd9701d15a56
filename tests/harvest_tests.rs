//! Anchor harvesting and online resolution against mock HTTP servers

use apilinks::{Config, HarvestError, HttpSource, Linker, MarkupSource, SetupError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PUBLIC_PAGE: &str = r#"
<html><body>
  <h1>Public API</h1>
  <h2 id="get-users">GET /users</h2>
  <h2 id="get-users-id">GET /users/{id}</h2>
  <h2 id="post-users">POST /users</h2>
</body></html>
"#;

const ADMIN_PAGE: &str = r#"
<html><body>
  <h2 id="get-users">GET /users</h2>
  <h2 id="delete-users-id">DELETE /users/{id}</h2>
</body></html>
"#;

async fn serve(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

fn config(server: &MockServer, apis: &[(&str, &str)]) -> Config {
    let mut yaml = String::from("API:\n");
    for (name, route) in apis {
        yaml.push_str(&format!("  {name}:\n    url: {}{route}/\n", server.uri()));
    }
    Config::from_yaml(&yaml).unwrap()
}

#[tokio::test]
async fn test_http_source_fetches_markup() {
    let server = MockServer::start().await;
    serve(&server, "/public/", 200, PUBLIC_PAGE).await;

    let source = HttpSource::new(5000).unwrap();
    let markup = source
        .fetch(&format!("{}/public/", server.uri()))
        .await
        .unwrap();
    let anchors = apilinks::extract_h2_anchors(&markup);

    assert_eq!(anchors.len(), 3);
    assert_eq!(anchors["get-users-id"], "GET /users/{id}");
}

#[tokio::test]
async fn test_http_source_decodes_declared_charset() {
    let server = MockServer::start().await;
    // "café" in ISO-8859-1 is not valid UTF-8
    let body = b"<html><body><h2 id=\"get-menu\">GET /caf\xE9</h2></body></html>".to_vec();
    Mock::given(method("GET"))
        .and(path("/latin/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=iso-8859-1"),
        )
        .mount(&server)
        .await;

    let source = HttpSource::new(5000).unwrap();
    let markup = source
        .fetch(&format!("{}/latin/", server.uri()))
        .await
        .unwrap();
    assert!(markup.contains("café"));

    let anchors = apilinks::extract_h2_anchors(&markup);
    assert_eq!(anchors["get-menu"], "GET /café");
}

#[tokio::test]
async fn test_http_source_rejects_non_markup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let source = HttpSource::new(5000).unwrap();
    let err = source
        .fetch(&format!("{}/json/", server.uri()))
        .await
        .unwrap_err();
    match err {
        HarvestError::Markup { content_type, .. } => assert_eq!(content_type, "application/json"),
        other => panic!("expected a markup error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_source_status_error() {
    let server = MockServer::start().await;
    serve(&server, "/broken/", 503, "unavailable").await;

    let source = HttpSource::new(5000).unwrap();
    let err = source
        .fetch(&format!("{}/broken/", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, HarvestError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_http_source_unreachable() {
    let source = HttpSource::new(2000).unwrap();
    let err = source.fetch("http://127.0.0.1:1/").await.unwrap_err();
    assert!(matches!(err, HarvestError::Request { .. }));
}

#[tokio::test]
async fn test_online_linking_across_apis() {
    let server = MockServer::start().await;
    serve(&server, "/public/", 200, PUBLIC_PAGE).await;
    serve(&server, "/admin/", 200, ADMIN_PAGE).await;

    let config = config(&server, &[("public", "/public"), ("admin", "/admin")]);
    let source = HttpSource::new(5000).unwrap();
    let linker = Linker::from_config(&config, &source).await.unwrap();
    assert!(linker.skipped.is_empty());

    let text = "`POST /users` | `GET /users` | `admin: GET /users` | `DELETE /users/{id}` | `GET /orders`";
    let result = linker.rewriter.rewrite(text);
    let uri = server.uri();

    assert_eq!(
        result.text,
        format!(
            "[POST /users]({uri}/public/#post-users) | `GET /users` | \
             [GET /users]({uri}/admin/#get-users) | \
             [DELETE /users/{{id}}]({uri}/admin/#delete-users-id) | `GET /orders`"
        )
    );
    assert_eq!(result.replaced, 3);
    assert_eq!(result.warnings.len(), 2);
    assert!(result.warnings[0].reason.contains("several APIs (public, admin)"));
    assert!(result.warnings[1].reason.contains("Cannot find method GET /orders"));
}

#[tokio::test]
async fn test_failed_api_is_skipped() {
    let server = MockServer::start().await;
    serve(&server, "/public/", 200, PUBLIC_PAGE).await;
    serve(&server, "/admin/", 404, "not found").await;

    let config = config(&server, &[("admin", "/admin"), ("public", "/public")]);
    let source = HttpSource::new(5000).unwrap();
    let linker = Linker::from_config(&config, &source).await.unwrap();

    assert_eq!(linker.skipped.len(), 1);
    assert_eq!(linker.skipped[0].name, "admin");
    assert_eq!(linker.rewriter.registry().names(), vec!["public"]);

    let result = linker.rewriter.rewrite("`GET /users`");
    assert_eq!(
        result.text,
        format!("[GET /users]({}/public/#get-users)", server.uri())
    );
}

#[tokio::test]
async fn test_all_apis_down_is_fatal() {
    let server = MockServer::start().await;
    serve(&server, "/admin/", 500, "boom").await;

    let config = config(&server, &[("admin", "/admin")]);
    let source = HttpSource::new(5000).unwrap();
    let err = Linker::from_config(&config, &source).await.unwrap_err();
    assert!(matches!(err, SetupError::EmptyRegistry));
}
