//! Exercises the REST client against a scripted local HTTP server.

use std::sync::{Arc, Mutex};

use catalog_client::{CatalogConfig, CatalogError, GeoServerClient, StyleCatalog};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serves one scripted `(status, body)` response per connection and records
/// each request.
async fn serve(responses: Vec<(u16, &'static str)>) -> (String, Arc<Mutex<Vec<Recorded>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let log = recorded.clone();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            log.lock().unwrap().push(request);

            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
    });

    (format!("http://{}/geoserver", addr), recorded)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Recorded {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap().split(' ');
    let method = request_line.next().unwrap().to_string();
    let path = request_line.next().unwrap().to_string();

    let headers: Vec<(String, String)> = lines
        .filter(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let length: usize = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .map(|(_, v)| v.parse().unwrap())
        .unwrap_or(0);

    while buf.len() < header_end + length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending body");
        buf.extend_from_slice(&chunk[..n]);
    }

    Recorded {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&buf[header_end..header_end + length]).to_string(),
    }
}

fn client(url: &str) -> GeoServerClient {
    GeoServerClient::new(CatalogConfig::new(url, "admin", "geoserver")).unwrap()
}

const SLD: &str = r#"<?xml version="1.0" encoding="UTF-8"?><StyledLayerDescriptor version="1.0.0"/>"#;

#[tokio::test]
async fn test_publish_registers_then_uploads() {
    let (url, recorded) = serve(vec![(201, "dem"), (200, "")]).await;
    client(&url).publish_style(Some("demo"), "dem", SLD).await.unwrap();

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);

    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/geoserver/rest/workspaces/demo/styles");
    assert_eq!(requests[0].header("content-type"), Some("text/xml"));
    assert_eq!(
        requests[0].body,
        "<style><name>dem</name><filename>dem.sld</filename></style>"
    );
    // admin:geoserver
    assert_eq!(
        requests[0].header("authorization"),
        Some("Basic YWRtaW46Z2Vvc2VydmVy")
    );

    assert_eq!(requests[1].method, "PUT");
    assert_eq!(requests[1].path, "/geoserver/rest/workspaces/demo/styles/dem");
    assert_eq!(
        requests[1].header("content-type"),
        Some("application/vnd.ogc.sld+xml")
    );
    assert_eq!(requests[1].body, SLD);
}

#[tokio::test]
async fn test_publish_overwrites_existing_style() {
    let (url, recorded) = serve(vec![(403, "Style 'dem' already exists"), (200, "")]).await;
    client(&url).publish_style(None, "dem", SLD).await.unwrap();

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests[0].path, "/geoserver/rest/styles");
    assert_eq!(requests[1].path, "/geoserver/rest/styles/dem");
}

#[tokio::test]
async fn test_publish_fails_on_server_error() {
    let (url, recorded) = serve(vec![(500, "boom")]).await;
    let err = client(&url).publish_style(None, "dem", SLD).await.unwrap_err();

    match err {
        CatalogError::Status { code, body } => {
            assert_eq!(code, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(recorded.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_assign_style_sets_qualified_default() {
    let (url, recorded) = serve(vec![(200, "")]).await;
    client(&url).assign_style("demo", "roads", "roads_outline").await.unwrap();

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].path, "/geoserver/rest/layers/demo:roads");
    assert_eq!(
        requests[0].body,
        "<layer><defaultStyle><name>demo:roads_outline</name></defaultStyle></layer>"
    );
}

#[tokio::test]
async fn test_delete_style_with_purge() {
    let (url, recorded) = serve(vec![(200, ""), (404, "No such style")]).await;
    let c = client(&url);

    c.delete_style(Some("demo"), "dem", true).await.unwrap();
    let err = c.delete_style(None, "gone", false).await.unwrap_err();
    assert!(err.is_not_found());

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path, "/geoserver/rest/workspaces/demo/styles/dem?purge=true");
    assert_eq!(requests[1].path, "/geoserver/rest/styles/gone?purge=false");
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .publish_style(None, "dem", SLD)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Http(_)));
}
