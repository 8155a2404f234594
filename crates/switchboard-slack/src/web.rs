//! Slack Web API client backing [`SlackActions`].
//!
//! Every method is a form-encoded POST to `https://slack.com/api/<method>`
//! with the bot token as a bearer header. Slack answers HTTP 200 with
//! `{"ok": false, "error": "..."}` on failure; that becomes [`SlackError::Api`].

use async_trait::async_trait;
use serde_json::Value;
use switchboard_stream::{BlockChunker, BreakPreference, ChunkBounds};
use tracing::{debug, warn};

use crate::client::{MessagePage, ReadOptions, SendOptions, SendResult, SlackActions};
use crate::error::SlackError;

pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Slack truncates `chat.postMessage` text beyond 4000 characters.
const SLACK_TEXT_LIMIT: usize = 4000;

/// Where `send_message` should post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlackRecipient {
    Channel(String),
    User(String),
}

/// Parse a `to` value.
///
/// Accepts `channel:<id>`, `user:<id>`, `<@U123>` mentions, `@U123`, `#C123`,
/// or a bare id (treated as a channel).
pub fn parse_recipient(raw: &str) -> Result<SlackRecipient, SlackError> {
    let raw = raw.trim();
    let non_empty = |id: &str| {
        let id = id.trim();
        if id.is_empty() {
            Err(SlackError::InvalidRecipient(raw.to_string()))
        } else {
            Ok(id.to_string())
        }
    };

    if let Some(inner) = raw.strip_prefix("<@").and_then(|r| r.strip_suffix('>')) {
        // mentions may carry a display name: <@U123|alice>
        let id = inner.split('|').next().unwrap_or_default();
        return non_empty(id).map(SlackRecipient::User);
    }
    if let Some(id) = raw.strip_prefix("user:") {
        return non_empty(id).map(SlackRecipient::User);
    }
    if let Some(id) = raw.strip_prefix("channel:") {
        return non_empty(id).map(SlackRecipient::Channel);
    }
    if let Some(id) = raw.strip_prefix('@') {
        return non_empty(id).map(SlackRecipient::User);
    }
    if let Some(id) = raw.strip_prefix('#') {
        return non_empty(id).map(SlackRecipient::Channel);
    }
    non_empty(raw).map(SlackRecipient::Channel)
}

/// `:thumbsup:` and `thumbsup` both become `thumbsup`.
pub fn normalize_emoji(emoji: &str) -> String {
    emoji.trim().trim_matches(':').to_string()
}

pub struct SlackWebClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl SlackWebClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_token(Some(token.into()))
    }

    /// A client whose remote calls fail with [`SlackError::MissingToken`] when
    /// no (non-blank) token is given. Local request validation still runs first.
    pub fn with_token(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.filter(|t| !t.trim().is_empty()),
            base_url: SLACK_API_BASE.to_string(),
        }
    }

    fn token(&self) -> Result<&str, SlackError> {
        self.token.as_deref().ok_or(SlackError::MissingToken)
    }

    /// Point at a different API root (without trailing slash).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn call(&self, method: &str, form: &[(&str, String)]) -> Result<Value, SlackError> {
        let token = self.token()?;
        let url = format!("{}/{}", self.base_url, method);
        debug!(method, "calling Slack Web API");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .form(form)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            warn!(method, status, "Slack API HTTP failure");
            return Err(SlackError::Status {
                method: method.to_string(),
                status,
            });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| SlackError::Parse(e.to_string()))?;
        check_ok(method, body)
    }

    async fn resolve_channel(&self, recipient: SlackRecipient) -> Result<String, SlackError> {
        match recipient {
            SlackRecipient::Channel(id) => Ok(id),
            SlackRecipient::User(user) => {
                let body = self
                    .call("conversations.open", &[("users", user.clone())])
                    .await?;
                body["channel"]["id"]
                    .as_str()
                    .map(String::from)
                    .ok_or_else(|| {
                        SlackError::Parse(format!("conversations.open returned no channel for {user}"))
                    })
            }
        }
    }

    async fn post_text(
        &self,
        channel_id: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> Result<Option<String>, SlackError> {
        let mut form = vec![("channel", channel_id.to_string()), ("text", text.to_string())];
        if let Some(ts) = thread_ts {
            form.push(("thread_ts", ts.to_string()));
        }
        let body = self.call("chat.postMessage", &form).await?;
        Ok(body["ts"].as_str().map(String::from))
    }

    /// Download `media_url` and share it through the external upload flow.
    async fn upload_media(
        &self,
        channel_id: &str,
        media_url: &str,
        initial_comment: Option<&str>,
        thread_ts: Option<&str>,
    ) -> Result<String, SlackError> {
        self.token()?;
        let media = self.client.get(media_url).send().await?;
        if !media.status().is_success() {
            return Err(SlackError::Media(format!(
                "fetching {media_url} returned HTTP {}",
                media.status().as_u16()
            )));
        }
        let bytes = media.bytes().await?;
        let filename = media_filename(media_url);

        let ticket = self
            .call(
                "files.getUploadURLExternal",
                &[
                    ("filename", filename.clone()),
                    ("length", bytes.len().to_string()),
                ],
            )
            .await?;
        let upload_url = ticket["upload_url"]
            .as_str()
            .ok_or_else(|| SlackError::Parse("missing upload_url".to_string()))?
            .to_string();
        let file_id = ticket["file_id"]
            .as_str()
            .ok_or_else(|| SlackError::Parse("missing file_id".to_string()))?
            .to_string();

        let uploaded = self.client.post(&upload_url).body(bytes).send().await?;
        if !uploaded.status().is_success() {
            return Err(SlackError::Media(format!(
                "upload of {filename} returned HTTP {}",
                uploaded.status().as_u16()
            )));
        }

        let files = serde_json::json!([{ "id": file_id, "title": filename }]).to_string();
        let mut form = vec![("files", files), ("channel_id", channel_id.to_string())];
        if let Some(comment) = initial_comment {
            form.push(("initial_comment", comment.to_string()));
        }
        if let Some(ts) = thread_ts {
            form.push(("thread_ts", ts.to_string()));
        }
        self.call("files.completeUploadExternal", &form).await?;
        Ok(file_id)
    }
}

#[async_trait]
impl SlackActions for SlackWebClient {
    async fn react(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
    ) -> Result<(), SlackError> {
        self.call(
            "reactions.add",
            &[
                ("channel", channel_id.to_string()),
                ("timestamp", message_id.to_string()),
                ("name", normalize_emoji(emoji)),
            ],
        )
        .await?;
        Ok(())
    }

    async fn list_reactions(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<Value, SlackError> {
        let body = self
            .call(
                "reactions.get",
                &[
                    ("channel", channel_id.to_string()),
                    ("timestamp", message_id.to_string()),
                    ("full", "true".to_string()),
                ],
            )
            .await?;
        Ok(array_or_empty(&body["message"]["reactions"]))
    }

    async fn send_message(
        &self,
        to: &str,
        content: &str,
        opts: SendOptions,
    ) -> Result<SendResult, SlackError> {
        let channel_id = self.resolve_channel(parse_recipient(to)?).await?;
        let thread_ts = opts.reply_to.as_deref();
        let mut chunks = split_message(content).into_iter();
        let mut last_id = None;

        if let Some(media_url) = opts.media_url.as_deref() {
            let first = chunks.next();
            let file_id = self
                .upload_media(&channel_id, media_url, first.as_deref(), thread_ts)
                .await?;
            last_id = Some(file_id);
        }
        for chunk in chunks {
            if let Some(ts) = self.post_text(&channel_id, &chunk, thread_ts).await? {
                last_id = Some(ts);
            }
        }

        Ok(SendResult {
            message_id: last_id.unwrap_or_else(|| "unknown".to_string()),
            channel_id,
        })
    }

    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<(), SlackError> {
        self.call(
            "chat.update",
            &[
                ("channel", channel_id.to_string()),
                ("ts", message_id.to_string()),
                ("text", content.to_string()),
            ],
        )
        .await?;
        Ok(())
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), SlackError> {
        self.call(
            "chat.delete",
            &[
                ("channel", channel_id.to_string()),
                ("ts", message_id.to_string()),
            ],
        )
        .await?;
        Ok(())
    }

    async fn read_messages(
        &self,
        channel_id: &str,
        opts: ReadOptions,
    ) -> Result<MessagePage, SlackError> {
        let mut form = vec![("channel", channel_id.to_string())];
        if let Some(limit) = opts.limit {
            form.push(("limit", history_limit(limit).to_string()));
        }
        if let Some(before) = opts.before {
            form.push(("latest", before));
        }
        if let Some(after) = opts.after {
            form.push(("oldest", after));
        }
        let body = self.call("conversations.history", &form).await?;
        Ok(MessagePage {
            messages: body["messages"].as_array().cloned().unwrap_or_default(),
            has_more: body["has_more"].as_bool().unwrap_or(false),
        })
    }

    async fn pin_message(&self, channel_id: &str, message_id: &str) -> Result<(), SlackError> {
        self.call(
            "pins.add",
            &[
                ("channel", channel_id.to_string()),
                ("timestamp", message_id.to_string()),
            ],
        )
        .await?;
        Ok(())
    }

    async fn unpin_message(&self, channel_id: &str, message_id: &str) -> Result<(), SlackError> {
        self.call(
            "pins.remove",
            &[
                ("channel", channel_id.to_string()),
                ("timestamp", message_id.to_string()),
            ],
        )
        .await?;
        Ok(())
    }

    async fn list_pins(&self, channel_id: &str) -> Result<Value, SlackError> {
        let body = self
            .call("pins.list", &[("channel", channel_id.to_string())])
            .await?;
        Ok(array_or_empty(&body["items"]))
    }

    async fn member_info(&self, user_id: &str) -> Result<Value, SlackError> {
        self.call("users.info", &[("user", user_id.to_string())]).await
    }

    async fn list_emojis(&self) -> Result<Value, SlackError> {
        self.call("emoji.list", &[]).await
    }
}

fn check_ok(method: &str, body: Value) -> Result<Value, SlackError> {
    if body["ok"].as_bool() == Some(true) {
        return Ok(body);
    }
    let error = body["error"].as_str().unwrap_or("unknown_error").to_string();
    warn!(method, error = %error, "Slack API returned ok=false");
    Err(SlackError::Api {
        method: method.to_string(),
        error,
    })
}

fn array_or_empty(value: &Value) -> Value {
    match value {
        Value::Array(_) => value.clone(),
        _ => Value::Array(Vec::new()),
    }
}

/// `conversations.history` wants a positive integer.
fn history_limit(limit: f64) -> u32 {
    limit.floor().max(1.0) as u32
}

/// Split outgoing text into Slack-sized messages, preferring paragraph breaks.
fn split_message(content: &str) -> Vec<String> {
    let bounds = ChunkBounds {
        min_chars: SLACK_TEXT_LIMIT,
        max_chars: SLACK_TEXT_LIMIT,
        break_preference: BreakPreference::Paragraph,
    };
    BlockChunker::split(bounds, content)
}

/// Last path segment of the URL, without query string.
fn media_filename(url: &str) -> String {
    url.split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty() && !name.contains(':'))
        .unwrap_or("upload")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recipient_forms() {
        assert_eq!(
            parse_recipient("channel:C123").unwrap(),
            SlackRecipient::Channel("C123".into())
        );
        assert_eq!(
            parse_recipient("user:U1").unwrap(),
            SlackRecipient::User("U1".into())
        );
        assert_eq!(
            parse_recipient("<@U9|alice>").unwrap(),
            SlackRecipient::User("U9".into())
        );
        assert_eq!(parse_recipient("@U2").unwrap(), SlackRecipient::User("U2".into()));
        assert_eq!(
            parse_recipient("#C7").unwrap(),
            SlackRecipient::Channel("C7".into())
        );
        assert_eq!(
            parse_recipient(" C8 ").unwrap(),
            SlackRecipient::Channel("C8".into())
        );
    }

    #[test]
    fn empty_recipient_is_rejected() {
        for raw in ["", "user:", "channel:  ", "<@>", "#"] {
            assert!(
                matches!(parse_recipient(raw), Err(SlackError::InvalidRecipient(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn emoji_colons_are_stripped() {
        assert_eq!(normalize_emoji(":thumbsup:"), "thumbsup");
        assert_eq!(normalize_emoji("white_check_mark"), "white_check_mark");
    }

    #[test]
    fn check_ok_maps_api_errors() {
        assert!(check_ok("chat.postMessage", json!({ "ok": true, "ts": "1.2" })).is_ok());
        match check_ok("pins.add", json!({ "ok": false, "error": "not_pinnable" })) {
            Err(SlackError::Api { method, error }) => {
                assert_eq!(method, "pins.add");
                assert_eq!(error, "not_pinnable");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            check_ok("emoji.list", json!({})),
            Err(SlackError::Api { .. })
        ));
    }

    #[test]
    fn long_messages_are_split_under_the_limit() {
        let paragraph = "word ".repeat(500);
        let text = format!("{paragraph}\n\n{paragraph}");
        let chunks = split_message(&text);
        assert_eq!(chunks.len(), 2);
        for c in &chunks {
            assert!(c.chars().count() <= SLACK_TEXT_LIMIT);
        }
        assert_eq!(split_message("hi"), vec!["hi".to_string()]);
    }

    #[test]
    fn history_limit_is_positive_integer() {
        assert_eq!(history_limit(20.7), 20);
        assert_eq!(history_limit(0.0), 1);
        assert_eq!(history_limit(-3.0), 1);
    }

    #[test]
    fn media_filename_from_url() {
        assert_eq!(media_filename("https://x.io/a/b/photo.png?sig=1"), "photo.png");
        assert_eq!(media_filename("https://x.io/"), "upload");
    }

    #[test]
    fn array_or_empty_defaults() {
        assert_eq!(array_or_empty(&json!([1])), json!([1]));
        assert_eq!(array_or_empty(&Value::Null), json!([]));
    }

    #[tokio::test]
    async fn calls_without_token_fail_before_any_request() {
        // unroutable base url: reaching the network would surface as Http instead
        let client =
            SlackWebClient::with_token(Some("  ".into())).with_base_url("http://127.0.0.1:9");
        let err = client.list_emojis().await.unwrap_err();
        assert!(matches!(err, SlackError::MissingToken), "got {err}");
        let err = client
            .send_message(
                "C1",
                "hi",
                SendOptions {
                    media_url: Some("http://127.0.0.1:9/a.png".into()),
                    reply_to: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SlackError::MissingToken), "got {err}");
    }
}
