//! Route reloads while the server is serving.

use std::fs;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::mpsc;

use mock_server::config::ServerConfig;
use mock_server::routing::{Route, RouteWatcher};

mod common;

use common::{client, TestServer};

async fn wait_for_status(server: &TestServer, path: &str, expected: StatusCode) {
    let client = client();
    for _ in 0..50 {
        let res = client.get(server.url(path)).send().await.unwrap();
        if res.status() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("{path} never answered {expected}");
}

#[tokio::test]
async fn test_pushed_batch_is_merged() {
    let server = TestServer::start(ServerConfig::default(), vec![Route::new("/kept", "GET", 200)]).await;

    server
        .updates
        .send(vec![Route::new("/added", "GET", 202), Route::new("/kept", "GET", 203)])
        .unwrap();

    wait_for_status(&server, "/added", StatusCode::ACCEPTED).await;
    wait_for_status(&server, "/kept", StatusCode::NON_AUTHORITATIVE_INFORMATION).await;
    assert_eq!(server.routes.len(), 2);
}

#[tokio::test]
async fn test_rate_limit_survives_identical_reload() {
    let mut route = Route::new("/limited", "GET", 200);
    route.rate_limit_per_minute = 1.0;
    let server = TestServer::start(ServerConfig::default(), vec![route.clone()]).await;
    let client = client();

    let res = client.get(server.url("/limited")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    server.updates.send(vec![route]).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = client.get(server.url("/limited")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
}

async fn next_batch_with(rx: &mut mpsc::UnboundedReceiver<Vec<Route>>, path: &str) -> Vec<Route> {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let batch = rx.recv().await.expect("watcher stopped");
            if batch.iter().any(|r| r.path == path) {
                return batch;
            }
        }
    })
    .await
    .expect("no reload observed")
}

#[tokio::test]
async fn test_watcher_reloads_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.json"),
        r#"[{"path": "/first", "method": "GET", "status_code": 200}]"#,
    )
    .unwrap();

    let (watcher, mut rx) = RouteWatcher::new(dir.path());
    let _watcher = watcher.run().unwrap();

    fs::write(
        dir.path().join("b.json"),
        r#"[{"path": "/second", "method": "POST", "status_code": 201}]"#,
    )
    .unwrap();

    let batch = next_batch_with(&mut rx, "/second").await;
    assert!(batch.iter().any(|r| r.path == "/first"));
    assert_eq!(batch.len(), 2);
}

#[tokio::test]
async fn test_watcher_keeps_routes_on_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("routes.json");
    fs::write(&file, r#"[{"path": "/ok", "method": "GET", "status_code": 200}]"#).unwrap();

    let (watcher, mut rx) = RouteWatcher::new(&file);
    let _watcher = watcher.run().unwrap();

    fs::write(&file, "[{ broken").unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(rx.try_recv().is_err());

    fs::write(&file, r#"[{"path": "/fixed", "method": "GET", "status_code": 200}]"#).unwrap();
    let batch = next_batch_with(&mut rx, "/fixed").await;
    assert_eq!(batch, vec![Route::new("/fixed", "GET", 200)]);
}

#[tokio::test]
async fn test_watcher_follows_rename_over_saves() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("routes.json");
    let staging = dir.path().join(".routes.json.tmp");
    fs::write(&file, r#"[{"path": "/a", "method": "GET", "status_code": 200}]"#).unwrap();

    let (watcher, mut rx) = RouteWatcher::new(&file);
    let _watcher = watcher.run().unwrap();

    fs::write(&staging, r#"[{"path": "/b", "method": "GET", "status_code": 200}]"#).unwrap();
    fs::rename(&staging, &file).unwrap();
    let batch = next_batch_with(&mut rx, "/b").await;
    assert_eq!(batch, vec![Route::new("/b", "GET", 200)]);

    fs::write(&staging, r#"[{"path": "/c", "method": "GET", "status_code": 200}]"#).unwrap();
    fs::rename(&staging, &file).unwrap();
    let batch = next_batch_with(&mut rx, "/c").await;
    assert_eq!(batch, vec![Route::new("/c", "GET", 200)]);
}

#[tokio::test]
async fn test_watcher_ignores_sibling_files() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("routes.json");
    fs::write(&file, r#"[{"path": "/a", "method": "GET", "status_code": 200}]"#).unwrap();

    let (watcher, mut rx) = RouteWatcher::new(&file);
    let _watcher = watcher.run().unwrap();

    fs::write(dir.path().join("other.json"), "[]").unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(rx.try_recv().is_err());
}
