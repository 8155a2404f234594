//! Chat surfaces that receive block-streamed text, and their per-message
//! character ceilings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use switchboard_core::config::SwitchboardConfig;

/// Ceiling used when no surface is known.
pub const DEFAULT_TEXT_LIMIT: usize = 4000;
/// Discord rejects messages longer than 2000 characters.
pub const DISCORD_TEXT_LIMIT: usize = 2000;

/// A chat platform with its own message-length limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkSurface {
    Whatsapp,
    Telegram,
    Discord,
    Slack,
    Signal,
    Imessage,
    Webchat,
}

impl ChunkSurface {
    pub const ALL: [ChunkSurface; 7] = [
        ChunkSurface::Whatsapp,
        ChunkSurface::Telegram,
        ChunkSurface::Discord,
        ChunkSurface::Slack,
        ChunkSurface::Signal,
        ChunkSurface::Imessage,
        ChunkSurface::Webchat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkSurface::Whatsapp => "whatsapp",
            ChunkSurface::Telegram => "telegram",
            ChunkSurface::Discord => "discord",
            ChunkSurface::Slack => "slack",
            ChunkSurface::Signal => "signal",
            ChunkSurface::Imessage => "imessage",
            ChunkSurface::Webchat => "webchat",
        }
    }

    /// Trim + lowercase a caller-supplied surface name.
    ///
    /// Unknown or blank names resolve to `None` (no specific surface).
    pub fn normalize(raw: Option<&str>) -> Option<Self> {
        raw?.trim().to_lowercase().parse().ok()
    }

    /// Built-in ceiling when the config has no override.
    pub fn default_text_limit(&self) -> usize {
        match self {
            ChunkSurface::Discord => DISCORD_TEXT_LIMIT,
            _ => DEFAULT_TEXT_LIMIT,
        }
    }

    fn configured_limit(&self, config: &SwitchboardConfig) -> Option<i64> {
        let channels = &config.channels;
        let surface = match self {
            ChunkSurface::Slack => {
                return config.slack.as_ref().and_then(|s| s.text_chunk_limit);
            }
            ChunkSurface::Whatsapp => channels.whatsapp.as_ref(),
            ChunkSurface::Telegram => channels.telegram.as_ref(),
            ChunkSurface::Discord => channels.discord.as_ref(),
            ChunkSurface::Signal => channels.signal.as_ref(),
            ChunkSurface::Imessage => channels.imessage.as_ref(),
            ChunkSurface::Webchat => channels.webchat.as_ref(),
        };
        surface.and_then(|s| s.text_chunk_limit)
    }
}

impl fmt::Display for ChunkSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkSurface {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChunkSurface::ALL
            .into_iter()
            .find(|surface| surface.as_str() == s)
            .ok_or(())
    }
}

/// Supplies the hard per-message ceiling for a surface.
pub trait TextLimitSource: Send + Sync {
    fn text_limit(&self, config: &SwitchboardConfig, surface: Option<ChunkSurface>) -> usize;
}

/// Positive config override, else the surface default, else [`DEFAULT_TEXT_LIMIT`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredTextLimits;

impl TextLimitSource for ConfiguredTextLimits {
    fn text_limit(&self, config: &SwitchboardConfig, surface: Option<ChunkSurface>) -> usize {
        let Some(surface) = surface else {
            return DEFAULT_TEXT_LIMIT;
        };
        match surface.configured_limit(config) {
            Some(limit) if limit > 0 => limit as usize,
            _ => surface.default_text_limit(),
        }
    }
}
