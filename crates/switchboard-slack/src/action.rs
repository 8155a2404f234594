//! The closed set of actions the `slack` tool understands.

use std::fmt;
use std::str::FromStr;

use crate::gate::ActionCategory;

/// One variant per action literal accepted in the `action` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    React,
    Reactions,
    SendMessage,
    EditMessage,
    DeleteMessage,
    ReadMessages,
    PinMessage,
    UnpinMessage,
    ListPins,
    MemberInfo,
    EmojiList,
}

impl ActionKind {
    pub const ALL: [ActionKind; 11] = [
        ActionKind::React,
        ActionKind::Reactions,
        ActionKind::SendMessage,
        ActionKind::EditMessage,
        ActionKind::DeleteMessage,
        ActionKind::ReadMessages,
        ActionKind::PinMessage,
        ActionKind::UnpinMessage,
        ActionKind::ListPins,
        ActionKind::MemberInfo,
        ActionKind::EmojiList,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::React => "react",
            ActionKind::Reactions => "reactions",
            ActionKind::SendMessage => "sendMessage",
            ActionKind::EditMessage => "editMessage",
            ActionKind::DeleteMessage => "deleteMessage",
            ActionKind::ReadMessages => "readMessages",
            ActionKind::PinMessage => "pinMessage",
            ActionKind::UnpinMessage => "unpinMessage",
            ActionKind::ListPins => "listPins",
            ActionKind::MemberInfo => "memberInfo",
            ActionKind::EmojiList => "emojiList",
        }
    }

    /// Which capability switch governs this action.
    pub fn category(&self) -> ActionCategory {
        match self {
            ActionKind::React | ActionKind::Reactions => ActionCategory::Reactions,
            ActionKind::SendMessage
            | ActionKind::EditMessage
            | ActionKind::DeleteMessage
            | ActionKind::ReadMessages => ActionCategory::Messages,
            ActionKind::PinMessage | ActionKind::UnpinMessage | ActionKind::ListPins => {
                ActionCategory::Pins
            }
            ActionKind::MemberInfo => ActionCategory::MemberInfo,
            ActionKind::EmojiList => ActionCategory::EmojiList,
        }
    }

    /// Required string parameters, in the order they are read.
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            ActionKind::React => &["channelId", "messageId", "emoji"],
            ActionKind::Reactions => &["channelId", "messageId"],
            ActionKind::SendMessage => &["to", "content"],
            ActionKind::EditMessage => &["channelId", "messageId", "content"],
            ActionKind::DeleteMessage => &["channelId", "messageId"],
            ActionKind::ReadMessages => &["channelId"],
            ActionKind::PinMessage | ActionKind::UnpinMessage => &["channelId", "messageId"],
            ActionKind::ListPins => &["channelId"],
            ActionKind::MemberInfo => &["userId"],
            ActionKind::EmojiList => &[],
        }
    }

    pub fn optional_params(&self) -> &'static [&'static str] {
        match self {
            ActionKind::SendMessage => &["mediaUrl", "replyTo"],
            ActionKind::ReadMessages => &["limit", "before", "after"],
            _ => &[],
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}
