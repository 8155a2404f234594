use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};

/// Top-level config (switchboard.toml + SWITCHBOARD_* env overrides).
///
/// Every section is optional: an empty file is a valid, fully-enabled setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchboardConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub slack: Option<SlackConfig>,
    #[serde(default)]
    pub channels: ChannelsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Overrides for block-streamed replies. Values are clamped, never rejected.
    #[serde(default, alias = "blockStreamingChunk")]
    pub block_streaming_chunk: Option<BlockStreamingChunkConfig>,
}

/// Raw chunking overrides as written by the operator.
///
/// Numbers are kept as `f64` so fractional or negative values survive loading
/// and get floored/clamped by the resolver instead of failing the whole config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockStreamingChunkConfig {
    #[serde(default, alias = "minChars")]
    pub min_chars: Option<f64>,
    #[serde(default, alias = "maxChars")]
    pub max_chars: Option<f64>,
    /// `paragraph`, `newline` or `sentence`; anything else means `paragraph`.
    #[serde(default, alias = "breakPreference")]
    pub break_preference: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`). Falls back to `SLACK_BOT_TOKEN` in the CLI.
    pub bot_token: Option<String>,
    #[serde(default)]
    pub actions: SlackActionConfig,
    /// Per-message character ceiling for Slack. Non-positive values are ignored.
    #[serde(default, alias = "textChunkLimit")]
    pub text_chunk_limit: Option<i64>,
}

/// Per-category switches for the `slack` tool.
///
/// `None` and `Some(true)` both mean enabled; only `Some(false)` disables.
/// Any value other than boolean `false` (`1`, `"yes"`, a table) loads as `Some(true)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackActionConfig {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub reactions: Option<bool>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub messages: Option<bool>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub pins: Option<bool>,
    #[serde(default, alias = "memberInfo", deserialize_with = "lenient_flag")]
    pub member_info: Option<bool>,
    #[serde(default, alias = "emojiList", deserialize_with = "lenient_flag")]
    pub emoji_list: Option<bool>,
}

fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => Some(value != serde_json::Value::Bool(false)),
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsConfig {
    pub whatsapp: Option<SurfaceConfig>,
    pub telegram: Option<SurfaceConfig>,
    pub discord: Option<SurfaceConfig>,
    pub signal: Option<SurfaceConfig>,
    pub imessage: Option<SurfaceConfig>,
    pub webchat: Option<SurfaceConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurfaceConfig {
    #[serde(default, alias = "textChunkLimit")]
    pub text_chunk_limit: Option<i64>,
}

impl SwitchboardConfig {
    /// Load config from a TOML file with SWITCHBOARD_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. `SWITCHBOARD_CONFIG` env var
    ///   3. ~/.switchboard/switchboard.toml
    ///
    /// Nested keys in env vars are separated by `__`, e.g.
    /// `SWITCHBOARD_SLACK__ACTIONS__PINS=false`.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .or_else(|| std::env::var("SWITCHBOARD_CONFIG").ok())
            .unwrap_or_else(default_config_path);
        debug!(path = %path, "loading switchboard config");

        Self::figment(&path)
            .extract()
            .map_err(|e| CoreError::Config(e.to_string()))
    }

    fn figment(path: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("SWITCHBOARD_").ignore(&["CONFIG"]).split("__"))
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.switchboard/switchboard.toml", home)
}

/// A read-only source of configuration snapshots.
///
/// Callers take a fresh snapshot per operation so edits apply on the next call
/// without any reload signal.
pub trait ConfigSource: Send + Sync {
    fn snapshot(&self) -> Result<SwitchboardConfig>;
}

/// Fixed in-memory configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig(pub SwitchboardConfig);

impl ConfigSource for StaticConfig {
    fn snapshot(&self) -> Result<SwitchboardConfig> {
        Ok(self.0.clone())
    }
}

/// Re-reads the TOML file (and env overrides) on every snapshot.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    path: Option<String>,
}

impl FileConfig {
    pub fn new(path: Option<String>) -> Self {
        Self { path }
    }
}

impl ConfigSource for FileConfig {
    fn snapshot(&self) -> Result<SwitchboardConfig> {
        SwitchboardConfig::load(self.path.as_deref())
    }
}
