//! Per-category capability gate.

use std::fmt;

use serde::{Deserialize, Serialize};
use switchboard_core::config::SlackActionConfig;

/// A configuration-gated group of related actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionCategory {
    Reactions,
    Messages,
    Pins,
    MemberInfo,
    EmojiList,
}

impl ActionCategory {
    /// Config key as callers know it (`memberInfo`, not `member_info`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCategory::Reactions => "reactions",
            ActionCategory::Messages => "messages",
            ActionCategory::Pins => "pins",
            ActionCategory::MemberInfo => "memberInfo",
            ActionCategory::EmojiList => "emojiList",
        }
    }

    /// Subject + verb used in the "Slack … disabled." error.
    pub fn disabled_label(&self) -> &'static str {
        match self {
            ActionCategory::Reactions => "reactions are",
            ActionCategory::Messages => "messages are",
            ActionCategory::Pins => "pins are",
            ActionCategory::MemberInfo => "member info is",
            ActionCategory::EmojiList => "emoji list is",
        }
    }

    fn flag(&self, actions: &SlackActionConfig) -> Option<bool> {
        match self {
            ActionCategory::Reactions => actions.reactions,
            ActionCategory::Messages => actions.messages,
            ActionCategory::Pins => actions.pins,
            ActionCategory::MemberInfo => actions.member_info,
            ActionCategory::EmojiList => actions.emoji_list,
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unset flag → `default`; set flag → anything but an explicit `false`.
///
/// `None` for `actions` (no `[slack]` section at all) behaves like every flag unset.
pub fn is_enabled(
    actions: Option<&SlackActionConfig>,
    category: ActionCategory,
    default: bool,
) -> bool {
    match actions.and_then(|a| category.flag(a)) {
        None => default,
        Some(flag) => flag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_section_uses_default() {
        assert!(is_enabled(None, ActionCategory::Pins, true));
        assert!(!is_enabled(None, ActionCategory::Pins, false));
    }

    #[test]
    fn unset_flag_uses_default() {
        let actions = SlackActionConfig::default();
        assert!(is_enabled(Some(&actions), ActionCategory::Messages, true));
        assert!(!is_enabled(Some(&actions), ActionCategory::Messages, false));
    }

    #[test]
    fn explicit_flags_override_default() {
        let actions = SlackActionConfig {
            reactions: Some(false),
            emoji_list: Some(true),
            ..Default::default()
        };
        assert!(!is_enabled(Some(&actions), ActionCategory::Reactions, true));
        assert!(is_enabled(Some(&actions), ActionCategory::EmojiList, false));
        // other categories are untouched
        assert!(is_enabled(Some(&actions), ActionCategory::Pins, true));
    }

    #[test]
    fn labels() {
        assert_eq!(ActionCategory::MemberInfo.to_string(), "memberInfo");
        assert_eq!(ActionCategory::EmojiList.disabled_label(), "emoji list is");
    }
}
