// src/render/http.rs
// =============================================================================
// The built-in renderer: plain HTTP fetches with reqwest.
//
// There is no JavaScript engine here. "Network idle" means the response body
// has been read completely and then the configured quiet window has passed
// without the renderer starting any other request for this page.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{RenderError, RenderedPage, Renderer};
use crate::config::RenderConfig;

pub struct HttpRenderer {
    client: Client,
    idle: Duration,
}

impl HttpRenderer {
    // Creates the HTTP client once; it is reused for every page
    // (connection pooling)
    pub fn new(config: &RenderConfig) -> Result<Self, RenderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            idle: config.idle_window,
        })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &Url) -> Result<RenderedPage, RenderError> {
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(RenderError::Status {
                status: response.status().as_u16(),
            });
        }

        let base_url = response.url().clone();
        let html = response.text().await?;

        // Quiet window before the page counts as idle
        if !self.idle.is_zero() {
            tokio::time::sleep(self.idle).await;
        }

        debug!(url = %url, bytes = html.len(), "page idle");
        Ok(RenderedPage::new(url.clone(), base_url, html))
    }
}
