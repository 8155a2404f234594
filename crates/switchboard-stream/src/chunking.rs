//! Chunk-size bounds for block-streamed replies.
//!
//! The streaming writer asks for bounds once per reply and then splits text
//! with [`BlockChunker`](crate::chunker::BlockChunker). Malformed overrides
//! are clamped or defaulted here, never rejected.

use serde::{Deserialize, Serialize};
use switchboard_core::config::SwitchboardConfig;
use tracing::debug;

use crate::surface::{ChunkSurface, ConfiguredTextLimits, TextLimitSource};

pub const DEFAULT_BLOCK_STREAM_MIN: usize = 800;
pub const DEFAULT_BLOCK_STREAM_MAX: usize = 1200;

/// Where the chunker would rather end a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakPreference {
    #[default]
    Paragraph,
    Newline,
    Sentence,
}

impl BreakPreference {
    /// Only the exact strings `newline` and `sentence` select those styles.
    pub fn from_config(raw: Option<&str>) -> Self {
        match raw {
            Some("newline") => BreakPreference::Newline,
            Some("sentence") => BreakPreference::Sentence,
            _ => BreakPreference::Paragraph,
        }
    }
}

/// Resolved bounds. Always `1 <= min_chars <= max_chars`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkBounds {
    pub min_chars: usize,
    pub max_chars: usize,
    pub break_preference: BreakPreference,
}

/// Resolve bounds using the configured per-surface text limits.
pub fn resolve_chunking(config: &SwitchboardConfig, surface: Option<&str>) -> ChunkBounds {
    resolve_chunking_with(&ConfiguredTextLimits, config, surface)
}

/// Resolve bounds against an explicit text-limit source.
pub fn resolve_chunking_with(
    limits: &dyn TextLimitSource,
    config: &SwitchboardConfig,
    surface: Option<&str>,
) -> ChunkBounds {
    let surface_key = ChunkSurface::normalize(surface);
    let text_limit = limits.text_limit(config, surface_key);
    let chunk_cfg = config.agent.block_streaming_chunk.as_ref();

    let max_requested = requested(
        chunk_cfg.and_then(|c| c.max_chars),
        DEFAULT_BLOCK_STREAM_MAX,
    );
    let max_chars = max_requested.min(text_limit).max(1);

    let min_requested = requested(
        chunk_cfg.and_then(|c| c.min_chars),
        DEFAULT_BLOCK_STREAM_MIN,
    );
    let min_chars = min_requested.min(max_chars);

    let break_preference =
        BreakPreference::from_config(chunk_cfg.and_then(|c| c.break_preference.as_deref()));

    debug!(
        surface = surface_key.map(|s| s.as_str()).unwrap_or("default"),
        text_limit, min_chars, max_chars, ?break_preference,
        "resolved block streaming chunk bounds"
    );

    ChunkBounds {
        min_chars,
        max_chars,
        break_preference,
    }
}

/// Floor the override and keep it at least 1; NaN falls back to `default`.
fn requested(value: Option<f64>, default: usize) -> usize {
    match value {
        Some(v) if v.is_nan() => default,
        // `as` saturates: +inf becomes usize::MAX and is clamped by the caller.
        Some(v) => v.floor().max(1.0) as usize,
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_core::config::{BlockStreamingChunkConfig, SurfaceConfig};

    struct FixedLimit(usize);

    impl TextLimitSource for FixedLimit {
        fn text_limit(&self, _config: &SwitchboardConfig, _surface: Option<ChunkSurface>) -> usize {
            self.0
        }
    }

    fn with_chunk(min: Option<f64>, max: Option<f64>, pref: Option<&str>) -> SwitchboardConfig {
        let mut cfg = SwitchboardConfig::default();
        cfg.agent.block_streaming_chunk = Some(BlockStreamingChunkConfig {
            min_chars: min,
            max_chars: max,
            break_preference: pref.map(String::from),
        });
        cfg
    }

    #[test]
    fn defaults_without_overrides() {
        let cfg = SwitchboardConfig::default();
        let bounds = resolve_chunking_with(&FixedLimit(4000), &cfg, Some("slack"));
        assert_eq!(
            bounds,
            ChunkBounds {
                min_chars: 800,
                max_chars: 1200,
                break_preference: BreakPreference::Paragraph,
            }
        );
    }

    #[test]
    fn min_is_clamped_down_to_max() {
        let cfg = with_chunk(Some(800.0), Some(50.0), None);
        let bounds = resolve_chunking_with(&FixedLimit(4000), &cfg, Some("slack"));
        assert_eq!(bounds.min_chars, 50);
        assert_eq!(bounds.max_chars, 50);
        assert_eq!(bounds.break_preference, BreakPreference::Paragraph);
    }

    #[test]
    fn max_is_capped_by_text_limit() {
        let cfg = with_chunk(None, Some(9000.0), None);
        let bounds = resolve_chunking_with(&FixedLimit(2000), &cfg, None);
        assert_eq!(bounds.max_chars, 2000);
        assert_eq!(bounds.min_chars, 800);
    }

    #[test]
    fn fractional_and_negative_overrides_are_floored_and_raised() {
        let cfg = with_chunk(Some(-10.0), Some(99.9), None);
        let bounds = resolve_chunking_with(&FixedLimit(4000), &cfg, None);
        assert_eq!(bounds.max_chars, 99);
        assert_eq!(bounds.min_chars, 1);
    }

    #[test]
    fn zero_text_limit_still_yields_one() {
        let cfg = SwitchboardConfig::default();
        let bounds = resolve_chunking_with(&FixedLimit(0), &cfg, None);
        assert_eq!(bounds.max_chars, 1);
        assert_eq!(bounds.min_chars, 1);
    }

    #[test]
    fn non_finite_overrides_stay_in_range() {
        let cfg = with_chunk(Some(f64::NAN), Some(f64::INFINITY), None);
        let bounds = resolve_chunking_with(&FixedLimit(4000), &cfg, None);
        assert_eq!(bounds.max_chars, 4000);
        assert_eq!(bounds.min_chars, 800);
    }

    #[test]
    fn break_preference_passthrough() {
        for (raw, expected) in [
            (Some("newline"), BreakPreference::Newline),
            (Some("sentence"), BreakPreference::Sentence),
            (Some("paragraph"), BreakPreference::Paragraph),
            (Some("Sentence"), BreakPreference::Paragraph),
            (Some("word"), BreakPreference::Paragraph),
            (None, BreakPreference::Paragraph),
        ] {
            let cfg = with_chunk(None, None, raw);
            let bounds = resolve_chunking(&cfg, None);
            assert_eq!(bounds.break_preference, expected, "input {raw:?}");
        }
    }

    #[test]
    fn bounds_hold_across_inputs() {
        let values = [None, Some(-1.0), Some(0.0), Some(0.5), Some(1.0), Some(799.0), Some(5000.0)];
        for limit in [1, 10, 2000, 4000] {
            for min in values {
                for max in values {
                    let cfg = with_chunk(min, max, None);
                    let b = resolve_chunking_with(&FixedLimit(limit), &cfg, None);
                    assert!(b.min_chars >= 1, "{min:?}/{max:?}/{limit}");
                    assert!(b.min_chars <= b.max_chars, "{min:?}/{max:?}/{limit}");
                    assert!(b.max_chars <= limit, "{min:?}/{max:?}/{limit}");
                }
            }
        }
    }

    #[test]
    fn surface_name_selects_configured_limit() {
        let mut cfg = with_chunk(None, Some(3000.0), None);
        cfg.channels.telegram = Some(SurfaceConfig {
            text_chunk_limit: Some(2500),
        });
        assert_eq!(resolve_chunking(&cfg, Some(" Telegram ")).max_chars, 2500);
        assert_eq!(resolve_chunking(&cfg, Some("discord")).max_chars, 2000);
        // unknown surface falls back to the generic 4000 ceiling
        assert_eq!(resolve_chunking(&cfg, Some("irc")).max_chars, 3000);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let bounds = resolve_chunking(&SwitchboardConfig::default(), Some("slack"));
        let json = serde_json::to_value(bounds).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "minChars": 800,
                "maxChars": 1200,
                "breakPreference": "paragraph"
            })
        );
    }

    #[test]
    fn camel_case_config_keys_drive_bounds() {
        let cfg: SwitchboardConfig = serde_json::from_value(serde_json::json!({
            "agent": {
                "blockStreamingChunk": { "maxChars": 50, "minChars": 10, "breakPreference": "sentence" }
            }
        }))
        .unwrap();
        let bounds = resolve_chunking(&cfg, Some("slack"));
        assert_eq!(bounds.max_chars, 50);
        assert_eq!(bounds.min_chars, 10);
        assert_eq!(bounds.break_preference, BreakPreference::Sentence);
    }
}
