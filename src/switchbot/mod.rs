//! SwitchBot Cloud API integration module
//!
//! - `signer`: HMAC-SHA256 request signing (token + timestamp + nonce)
//! - `client`: Low-level API client (signed HTTP requests)
//! - `types`: Wire payloads

pub mod client;
pub mod signer;
pub mod types;

use std::fmt;

use async_trait::async_trait;

pub use client::SwitchBotClient;
pub use types::{CommandRequest, CommandResult};

use crate::error::CommandError;

pub const API_BASE_URL: &str = "https://api.switch-bot.com";

/// `statusCode` the API returns for an accepted command
pub const STATUS_SUCCESS: i64 = 100;

/// API token and signing secret
#[derive(Clone)]
pub struct Credentials {
    pub token: String,
    secret: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token)
            .field("secret", &"********")
            .finish()
    }
}

/// Anything that can deliver a device command and hand back the API result
#[async_trait]
pub trait CommandTransport: Send + Sync {
    async fn send_command(
        &self,
        device_id: &str,
        request: &CommandRequest,
    ) -> Result<CommandResult, CommandError>;
}
