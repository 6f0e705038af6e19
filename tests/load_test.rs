//! Concurrent load through the relay.

use std::time::{Duration, Instant};

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde_json::Value;

mod common;

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    // Upstream echoes the path so each response can be matched to its request.
    let (upstream, recorder) = common::start_mock_upstream(|captured| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            serde_json::json!({ "path": captured.path }).to_string(),
        )
            .into_response()
    })
    .await;
    let (relay, shutdown) = common::start_relay(upstream, |_| {}).await;

    let concurrency = 20;
    let requests_per_task = 10;
    let total_requests = concurrency * requests_per_task;

    let client = common::client();
    let start = Instant::now();

    let mut handles = Vec::with_capacity(concurrency);
    for task in 0..concurrency {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let mut ok = 0;
            for i in 0..requests_per_task {
                let path = format!("/bot{}/call{}", task, i);
                let res = client
                    .get(format!("http://{}{}", relay, path))
                    .send()
                    .await
                    .expect("Relay unreachable");
                if res.status() != StatusCode::OK {
                    continue;
                }
                let body: Value = res.json().await.unwrap();
                if body["path"] == path.as_str() {
                    ok += 1;
                }
            }
            ok
        }));
    }

    let results = futures_util::future::join_all(handles).await;
    let succeeded: usize = results.into_iter().map(|r| r.unwrap()).sum();
    let elapsed = start.elapsed();

    println!(
        "Completed {} requests in {:?} ({:.0} req/s)",
        total_requests,
        elapsed,
        total_requests as f64 / elapsed.as_secs_f64()
    );

    assert_eq!(succeeded, total_requests);
    assert_eq!(recorder.lock().unwrap().len(), total_requests);

    shutdown.trigger();
}
