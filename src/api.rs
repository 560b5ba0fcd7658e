// API client module: contains a small blocking HTTP client that exercises
// the backend's REST surface. It is intentionally small and synchronous;
// each call is fire-and-forget with a fixed timeout and no retry.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;

use crate::config::Config;

/// Upper bound for a single HTTP request, connection setup included.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Simple API client that holds a reqwest blocking client, the base URL
/// of the backend and the user id sent with notification posts.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    user_id: String,
}

impl ApiClient {
    /// Create an ApiClient from resolved configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: config.base_url.clone(),
            user_id: config.user_id.clone(),
        })
    }

    /// GET `{base}/health`. True only on exactly 200. Any other status
    /// prints a warning; any transport failure (timeout included) is
    /// reported as the server being inactive. Nothing escapes the call.
    pub fn check_health(&self) -> bool {
        let url = format!("{}/health", &self.base_url);
        match self.client.get(&url).send() {
            Ok(res) if res.status() == StatusCode::OK => {
                println!("✅ Server active (status: {})", res.status().as_u16());
                true
            }
            Ok(res) => {
                println!("⚠️  Server responded with status {}", res.status().as_u16());
                false
            }
            Err(_) => {
                println!("❌ Server inactive");
                false
            }
        }
    }

    /// POST `{base}/api/notifications/send` with the configured user id
    /// and the three notification fields. True only on 200; non-200 is
    /// reported with its status code, transport errors are printed.
    pub fn send_notification(&self, titre: &str, message: &str, kind: &str) -> bool {
        let url = format!("{}/api/notifications/send", &self.base_url);
        let body = json!({
            "userId": self.user_id,
            "titre": titre,
            "message": message,
            "type": kind,
        });
        println!("📤 Sending over HTTP...");
        match self.client.post(&url).json(&body).send() {
            Ok(res) if res.status() == StatusCode::OK => {
                println!("✅ Sent successfully (status: {})", res.status().as_u16());
                true
            }
            Ok(res) => {
                println!("⚠️  Send failed with status {}", res.status().as_u16());
                false
            }
            Err(e) => {
                println!("❌ Send error: {}", e);
                false
            }
        }
    }
}
