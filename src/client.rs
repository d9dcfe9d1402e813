use std::{collections::HashMap, sync::Arc, time::Duration};

use fantoccini::{Client, ClientBuilder};
use futures::lock::Mutex;
use serde_json::json;
use tracing::{info, warn};

use crate::{config::Config, error::Result};

/// Bootstraps and reuses WebDriver sessions by name.
///
/// Handles never create sessions themselves; callers either connect here or
/// bring their own [`Client`] and pass it into
/// [`JsObject`](crate::JsObject).
#[derive(Clone)]
pub struct ClientManager {
    clients: Arc<Mutex<HashMap<String, Client>>>,
    config: Config,
}

impl ClientManager {
    pub fn new(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

        Ok(Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
            config,
        })
    }

    /// Returns the client for `session_id`, connecting if it is missing or
    /// no longer responds.
    pub async fn get_or_create_client(
        &self,
        session_id: Option<String>,
    ) -> Result<(String, Client)> {
        let mut clients = self.clients.lock().await;
        let session = session_id.unwrap_or_else(|| "default".to_string());

        if let Some(client) = clients.get(&session) {
            match client.current_url().await {
                Ok(_) => return Ok((session, client.clone())),
                Err(_) => {
                    warn!(session = %session, "session stopped responding, reconnecting");
                    clients.remove(&session);
                }
            }
        }

        let client = self.create_configured_client().await.map_err(|e| {
            anyhow::anyhow!(
                "Failed to connect to WebDriver at '{}': {}\n\n{}",
                self.config.webdriver_endpoint,
                e,
                Config::setup_guidance()
            )
        })?;

        info!(
            session = %session,
            endpoint = %self.config.webdriver_endpoint,
            "created WebDriver session"
        );
        clients.insert(session.clone(), client.clone());
        Ok((session, client))
    }

    async fn create_configured_client(&self) -> Result<Client> {
        let endpoint = &self.config.webdriver_endpoint;

        // Geckodriver conventionally listens on 4444; everything else is
        // treated as a Chromium-family driver.
        let is_firefox = endpoint.contains(":4444")
            || self.config.preferred_browser.as_ref().is_some_and(|p| {
                p.to_lowercase().contains("firefox") || p.to_lowercase().contains("gecko")
            });

        let mut caps = serde_json::Map::new();

        if is_firefox {
            caps.insert("browserName".to_string(), json!("firefox"));

            if self.config.headless {
                let mut firefox_options = serde_json::Map::new();
                firefox_options.insert("args".to_string(), json!(["--headless"]));
                caps.insert("moz:firefoxOptions".to_string(), json!(firefox_options));
            }
        } else {
            caps.insert("browserName".to_string(), json!("chrome"));

            if self.config.headless {
                let mut chrome_options = serde_json::Map::new();
                chrome_options.insert(
                    "args".to_string(),
                    json!([
                        "--headless",
                        "--no-sandbox",
                        "--disable-dev-shm-usage",
                        "--disable-gpu"
                    ]),
                );
                caps.insert("goog:chromeOptions".to_string(), json!(chrome_options));
            }
        }

        let mut builder = ClientBuilder::native();
        builder.capabilities(caps);
        let timeout = Duration::from_millis(self.config.connect_timeout_ms);

        match tokio::time::timeout(timeout, builder.connect(endpoint)).await {
            Ok(client) => Ok(client?),
            Err(_) => Err(anyhow::anyhow!(
                "Timed out after {}ms connecting to '{}'",
                self.config.connect_timeout_ms,
                endpoint
            )
            .into()),
        }
    }
}
