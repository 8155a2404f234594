use thiserror::Error;

use crate::gate::ActionCategory;

/// Errors raised by the Slack Web API client.
#[derive(Debug, Error)]
pub enum SlackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Slack API error ({method}): {error}")]
    Api { method: String, error: String },

    #[error("Slack HTTP status {status} from {method}")]
    Status { method: String, status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("no Slack bot token: set [slack] bot_token or SLACK_BOT_TOKEN")]
    MissingToken,
}

/// Errors raised by the action dispatcher.
///
/// `Disabled` is a configuration denial; `UnknownAction` and `MissingParam`
/// reject the request. Both are raised before any remote call is made.
/// Remote failures pass through untouched.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Slack {} disabled.", .category.disabled_label())]
    Disabled { category: ActionCategory },

    #[error("Unknown action: {action}")]
    UnknownAction { action: String },

    #[error("{name} required")]
    MissingParam { name: String },

    #[error(transparent)]
    Remote(#[from] SlackError),
}

impl ActionError {
    /// Short error code string for callers that branch on the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            ActionError::Disabled { .. } => "ACTION_DISABLED",
            ActionError::UnknownAction { .. } => "UNKNOWN_ACTION",
            ActionError::MissingParam { .. } => "MISSING_PARAM",
            ActionError::Remote(_) => "REMOTE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = ActionError::Disabled {
            category: ActionCategory::Reactions,
        };
        assert_eq!(e.to_string(), "Slack reactions are disabled.");
        let e = ActionError::Disabled {
            category: ActionCategory::MemberInfo,
        };
        assert_eq!(e.to_string(), "Slack member info is disabled.");
        let e = ActionError::UnknownAction {
            action: "foo".into(),
        };
        assert_eq!(e.to_string(), "Unknown action: foo");
        let e = ActionError::MissingParam {
            name: "channelId".into(),
        };
        assert_eq!(e.to_string(), "channelId required");
    }

    #[test]
    fn remote_errors_pass_through() {
        let e = ActionError::from(SlackError::Api {
            method: "pins.add".into(),
            error: "already_pinned".into(),
        });
        assert_eq!(e.to_string(), "Slack API error (pins.add): already_pinned");
        assert_eq!(e.code(), "REMOTE_ERROR");
    }
}
