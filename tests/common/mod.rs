//! Minimal HTTP/1.1 stub standing in for the upstream price API.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const FIXTURE: &str = include_str!("../fixtures/sample_records.json");
pub const API_KEY: &str = "test-key";

type Handler = dyn Fn(&Url) -> (u16, String) + Send + Sync;

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Url>>>,
}

impl StubServer {
    /// Serves every request with `handler`, which sees the full request URL.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Url) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let seen = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let seen = seen.clone();
                let handler = handler.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }

                    let head = String::from_utf8_lossy(&buf);
                    let target = head.split_whitespace().nth(1).unwrap_or("/");
                    let url = Url::parse(&format!("http://{addr}{target}")).unwrap();
                    seen.lock().unwrap().push(url.clone());

                    let (status, body) = handler(&url);
                    let reason = if status < 400 { "OK" } else { "Error" };
                    let response = format!(
                        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}/resource/test"),
            requests,
        }
    }

    /// Serves the fixture, honouring the `filters[commodity]` parameter.
    pub async fn with_fixture() -> Self {
        Self::start(|url| (200, fixture_for(url))).await
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn fixture_for(url: &Url) -> String {
    let mut payload: serde_json::Value = serde_json::from_str(FIXTURE).unwrap();
    if let Some(crop) = query_param(url, "filters[commodity]") {
        let records = payload["records"].as_array().unwrap().clone();
        let matching: Vec<_> = records
            .into_iter()
            .filter(|r| r["commodity"] == crop.as_str())
            .collect();
        payload["records"] = serde_json::Value::Array(matching);
    }
    payload.to_string()
}
