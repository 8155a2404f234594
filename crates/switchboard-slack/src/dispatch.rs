//! Action dispatcher for the `slack` tool.
//!
//! Flow per call: parse the action literal, check the category gate against
//! the config snapshot, read parameters lazily, make exactly one remote call,
//! wrap the result in an [`Envelope`]. Nothing is cached between calls.

use serde_json::{Map, Value};
use switchboard_core::config::SwitchboardConfig;
use tracing::{debug, warn};

use crate::action::ActionKind;
use crate::client::{ReadOptions, SendOptions, SlackActions};
use crate::envelope::Envelope;
use crate::error::{ActionError, SlackError};
use crate::gate;
use crate::params::Params;

/// Route one action request to the client.
///
/// A missing or non-string `action` is reported as an unknown (empty) action.
pub async fn dispatch(
    params: &Map<String, Value>,
    config: &SwitchboardConfig,
    client: &dyn SlackActions,
) -> Result<Envelope, ActionError> {
    let params = Params::new(params);
    let raw_action = params.optional_string("action").unwrap_or_default();
    let action: ActionKind = raw_action
        .parse()
        .map_err(|_| ActionError::UnknownAction {
            action: raw_action.clone(),
        })?;

    let category = action.category();
    let actions = config.slack.as_ref().map(|s| &s.actions);
    if !gate::is_enabled(actions, category, true) {
        warn!(action = %action, category = %category, "slack action category disabled");
        return Err(ActionError::Disabled { category });
    }

    debug!(action = %action, category = %category, "dispatching slack action");

    match action {
        ActionKind::React => {
            let channel_id = params.required_string("channelId")?;
            let message_id = params.required_string("messageId")?;
            let emoji = params.required_string("emoji")?;
            client.react(&channel_id, &message_id, &emoji).await?;
            Ok(Envelope::ok())
        }
        ActionKind::Reactions => {
            let channel_id = params.required_string("channelId")?;
            let message_id = params.required_string("messageId")?;
            let reactions = client.list_reactions(&channel_id, &message_id).await?;
            Ok(Envelope::ok().with("reactions", reactions))
        }
        ActionKind::SendMessage => {
            let to = params.required_string("to")?;
            let content = params.required_string("content")?;
            let opts = SendOptions {
                media_url: params.optional_string("mediaUrl"),
                reply_to: params.optional_string("replyTo"),
            };
            let result = client.send_message(&to, &content, opts).await?;
            let result = serde_json::to_value(result)
                .map_err(|e| SlackError::Parse(e.to_string()))?;
            Ok(Envelope::ok().with("result", result))
        }
        ActionKind::EditMessage => {
            let channel_id = params.required_string("channelId")?;
            let message_id = params.required_string("messageId")?;
            let content = params.required_string("content")?;
            client.edit_message(&channel_id, &message_id, &content).await?;
            Ok(Envelope::ok())
        }
        ActionKind::DeleteMessage => {
            let channel_id = params.required_string("channelId")?;
            let message_id = params.required_string("messageId")?;
            client.delete_message(&channel_id, &message_id).await?;
            Ok(Envelope::ok())
        }
        ActionKind::ReadMessages => {
            let channel_id = params.required_string("channelId")?;
            let opts = ReadOptions {
                limit: params.finite_number("limit"),
                before: params.optional_string("before"),
                after: params.optional_string("after"),
            };
            let page = client.read_messages(&channel_id, opts).await?;
            let page = serde_json::to_value(page)
                .map_err(|e| SlackError::Parse(e.to_string()))?;
            Ok(Envelope::ok().merge(page))
        }
        ActionKind::PinMessage => {
            let channel_id = params.required_string("channelId")?;
            let message_id = params.required_string("messageId")?;
            client.pin_message(&channel_id, &message_id).await?;
            Ok(Envelope::ok())
        }
        ActionKind::UnpinMessage => {
            let channel_id = params.required_string("channelId")?;
            let message_id = params.required_string("messageId")?;
            client.unpin_message(&channel_id, &message_id).await?;
            Ok(Envelope::ok())
        }
        ActionKind::ListPins => {
            let channel_id = params.required_string("channelId")?;
            let pins = client.list_pins(&channel_id).await?;
            Ok(Envelope::ok().with("pins", pins))
        }
        ActionKind::MemberInfo => {
            let user_id = params.required_string("userId")?;
            let info = client.member_info(&user_id).await?;
            Ok(Envelope::ok().with("info", info))
        }
        ActionKind::EmojiList => {
            let emojis = client.list_emojis().await?;
            Ok(Envelope::ok().with("emojis", emojis))
        }
    }
}
