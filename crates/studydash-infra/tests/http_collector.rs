// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;
use studydash_core::telemetry::{
    CollectorPayload, CollectorTransport, MonitoringEvent, TransportError, UserEvent,
    UserEventKind,
};
use studydash_infra::HttpCollector;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Accepts one request, answers with `status`, and hands back the body.
async fn one_shot_server(status: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/monitoring/events", listener.local_addr().unwrap());
    let (body_tx, body_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0_u8; 4096];
        let body = loop {
            let read = socket.read(&mut chunk).await.unwrap();
            assert!(read > 0, "connection closed before the request was complete");
            request.extend_from_slice(&chunk[..read]);

            let text = String::from_utf8_lossy(&request).to_string();
            let Some(header_end) = text.find("\r\n\r\n") else {
                continue;
            };
            let length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if request.len() >= header_end + 4 + length {
                break text[header_end + 4..header_end + 4 + length].to_string();
            }
        };

        let response = format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        let _ = body_tx.send(body);
    });

    (url, body_rx)
}

fn payload() -> CollectorPayload {
    CollectorPayload::new(
        vec![MonitoringEvent::User(UserEvent::new(
            UserEventKind::Click,
            "tab#quiz",
        ))],
        "studydash-tests/1.0",
        "http://localhost/dashboard",
    )
}

#[tokio::test]
async fn test_send_posts_json_payload() {
    let (url, body) = one_shot_server("200 OK").await;
    let collector = HttpCollector::new(url).unwrap();

    collector.send(&payload()).await.unwrap();

    let body: serde_json::Value = serde_json::from_str(&body.await.unwrap()).unwrap();
    assert_eq!(body["events"][0]["type"], "user");
    assert_eq!(body["events"][0]["target"], "tab#quiz");
    assert_eq!(body["metadata"]["userAgent"], "studydash-tests/1.0");
    assert_eq!(body["metadata"]["url"], "http://localhost/dashboard");
}

#[tokio::test]
async fn test_error_status_is_rejected() {
    let (url, _body) = one_shot_server("503 Service Unavailable").await;
    let collector = HttpCollector::new(url).unwrap();

    let result = collector.send(&payload()).await;

    assert!(matches!(result, Err(TransportError::Rejected(503))));
}

#[tokio::test]
async fn test_unreachable_collector() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let collector = HttpCollector::new(format!("http://{addr}/events")).unwrap();

    let result = collector.send(&payload()).await;

    assert!(matches!(result, Err(TransportError::Unreachable(_))));
}

#[tokio::test]
async fn test_beacon_is_fire_and_forget() {
    let (url, body) = one_shot_server("204 No Content").await;
    let collector = HttpCollector::new(url).unwrap();

    collector.send_beacon(payload());

    let body = tokio::time::timeout(Duration::from_secs(5), body)
        .await
        .expect("beacon should reach the collector")
        .unwrap();
    assert!(body.contains("tab#quiz"));
}
