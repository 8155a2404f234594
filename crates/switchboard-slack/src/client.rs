//! Remote operations the dispatcher drives.
//!
//! The dispatcher only depends on this trait; [`SlackWebClient`](crate::web::SlackWebClient)
//! is the production implementation and tests plug in recording mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SlackError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendOptions {
    pub media_url: Option<String>,
    /// Thread timestamp to reply into.
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadOptions {
    pub limit: Option<f64>,
    /// Only messages before this timestamp.
    pub before: Option<String>,
    /// Only messages after this timestamp.
    pub after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub message_id: String,
    pub channel_id: String,
}

/// One page of channel history. Its fields are spread into the envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    pub messages: Vec<Value>,
    pub has_more: bool,
}

/// Chat operations exposed to the agent. Opaque remote payloads stay as JSON.
#[async_trait]
pub trait SlackActions: Send + Sync {
    async fn react(&self, channel_id: &str, message_id: &str, emoji: &str)
        -> Result<(), SlackError>;

    async fn list_reactions(&self, channel_id: &str, message_id: &str)
        -> Result<Value, SlackError>;

    async fn send_message(
        &self,
        to: &str,
        content: &str,
        opts: SendOptions,
    ) -> Result<SendResult, SlackError>;

    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<(), SlackError>;

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), SlackError>;

    async fn read_messages(
        &self,
        channel_id: &str,
        opts: ReadOptions,
    ) -> Result<MessagePage, SlackError>;

    async fn pin_message(&self, channel_id: &str, message_id: &str) -> Result<(), SlackError>;

    async fn unpin_message(&self, channel_id: &str, message_id: &str) -> Result<(), SlackError>;

    async fn list_pins(&self, channel_id: &str) -> Result<Value, SlackError>;

    async fn member_info(&self, user_id: &str) -> Result<Value, SlackError>;

    async fn list_emojis(&self) -> Result<Value, SlackError>;
}
