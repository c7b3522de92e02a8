//! Monitoring API HTTP client

use std::time::{Duration, Instant};

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, Url};

use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::http_log::HttpLogger;
use crate::model::ApiResponse;

/// Authenticated JSON client for the monitoring API
#[derive(Debug, Clone)]
pub struct MonitorClient {
    client: Client,
    base_url: Url,
    config: MonitorConfig,
    logger: HttpLogger,
}

impl MonitorClient {
    pub fn new(config: MonitorConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| MonitorError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()?;

        let logger = HttpLogger::from_level_name(&config.log_level);

        Ok(Self {
            client,
            base_url,
            config,
            logger,
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Build full URL: base URL followed by `path`
    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Send one request and decode the batch response.
    ///
    /// Fails on a non-2xx status, an undecodable body, any failed entry in
    /// the results, or an empty result set for a mutating method.
    pub async fn api_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse> {
        let mut builder = self
            .client
            .request(method.clone(), self.build_url(path))
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let request = builder.build()?;
        let url = request.url().clone();

        let started = Instant::now();
        let outcome = self.client.execute(request).await;
        self.logger.log_response(
            &method,
            &url,
            outcome.as_ref().map(|response| response.status()),
            started.elapsed(),
        );

        let response = outcome?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(MonitorError::Status { status, body: text });
        }

        let decoded: ApiResponse = serde_json::from_str(&text)?;
        decoded.ensure_success(&method)?;
        Ok(decoded)
    }

    /// GET `path`
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.api_request(Method::GET, path, None).await
    }

    /// POST a JSON body to `path`
    pub async fn post(&self, path: &str, body: &serde_json::Value) -> Result<ApiResponse> {
        self.api_request(Method::POST, path, Some(body)).await
    }
}
