//! Engine tuning knobs.

use serde::Deserialize;

/// Thresholds governing delete/insert pairing and inline refinement.
///
/// All fields have defaults; a partial TOML table deserializes on top of
/// them via `#[serde(default)]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// A paired insert's new-file line number must lie within this distance
    /// of the delete's old-file line number.
    pub max_diff_distance: u32,
    /// Maximum fraction of differing characters for a delete/insert pair to
    /// collapse into a single modified row.
    pub max_change_ratio: f64,
    /// Character-edit budget under which an adjacent word-level
    /// delete/insert pair is refined to character granularity.
    pub inline_max_char_edits: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_diff_distance: 30,
            max_change_ratio: 0.45,
            inline_max_char_edits: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_diff_distance, 30);
        assert_eq!(config.max_change_ratio, 0.45);
        assert_eq!(config.inline_max_char_edits, 4);
    }
}
