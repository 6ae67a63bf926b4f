//! SwitchBot Cloud API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use super::signer::AuthHeaders;
use super::types::{CommandRequest, CommandResult, DeviceListing};
use super::{CommandTransport, Credentials};
use crate::error::CommandError;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SwitchBotClient {
    http_client: Client,
    credentials: Credentials,
    base_url: String,
}

impl SwitchBotClient {
    pub fn new(credentials: Credentials, base_url: &str) -> reqwest::Result<Self> {
        let http_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /v1.1/devices/{deviceId}/commands
    pub async fn send_command(
        &self,
        device_id: &str,
        request: &CommandRequest,
    ) -> Result<CommandResult, CommandError> {
        let url = format!("{}/v1.1/devices/{}/commands", self.base_url, device_id);
        let body = serde_json::to_vec(request)
            .map_err(|e| CommandError::Protocol(format!("Failed to encode command: {}", e)))?;

        tracing::debug!(
            "[SwitchBot] {} {} -> {}",
            request.command_type,
            request.command,
            device_id
        );

        self.execute(self.http_client.post(&url).body(body)).await
    }

    /// GET /v1.1/devices
    pub async fn list_devices(&self) -> Result<DeviceListing, CommandError> {
        let url = format!("{}/v1.1/devices", self.base_url);
        let result = self.execute(self.http_client.get(&url)).await?;

        if !result.is_success() {
            return Err(CommandError::Rejected {
                status_code: result.status_code,
                message: result.message,
            });
        }

        let body = result
            .body
            .ok_or_else(|| CommandError::Protocol("Device list response has no body".to_string()))?;
        serde_json::from_value(body)
            .map_err(|e| CommandError::Protocol(format!("Device list parse failed: {}", e)))
    }

    /// Sign, send, and decode the common `{statusCode, message, body}` envelope
    async fn execute(&self, builder: RequestBuilder) -> Result<CommandResult, CommandError> {
        let headers = AuthHeaders::build(&self.credentials)
            .to_header_map()
            .map_err(|e| CommandError::Network(format!("Invalid request header: {}", e)))?;

        let resp = builder
            .headers(headers)
            .send()
            .await
            .map_err(CommandError::from_reqwest)?
            .error_for_status()
            .map_err(CommandError::from_reqwest)?;

        let bytes = resp.bytes().await.map_err(CommandError::from_reqwest)?;

        serde_json::from_slice(&bytes)
            .map_err(|e| CommandError::Protocol(format!("Unexpected response body: {}", e)))
    }
}

#[async_trait]
impl CommandTransport for SwitchBotClient {
    async fn send_command(
        &self,
        device_id: &str,
        request: &CommandRequest,
    ) -> Result<CommandResult, CommandError> {
        SwitchBotClient::send_command(self, device_id, request).await
    }
}
