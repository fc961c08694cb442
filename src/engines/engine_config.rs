//! Engine tuning knobs and their protocol option names.

use std::time::Duration;

use thiserror::Error;

use crate::search::iterative_deepening::SearchConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    #[error("invalid value {value:?} for option {name}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub move_time_ms: u64,
    /// Budget once the engine has played `late_game_move_number` moves.
    pub late_move_time_ms: u64,
    pub late_game_move_number: u32,
    pub forced_move_time_ms: u64,
    pub max_depth: u32,
    pub forced_depth: u32,
    pub forced_max_replies: usize,
    pub forced_search: bool,
    pub tt_buckets: usize,
    pub tt_bucket_capacity: usize,
    pub hash_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            move_time_ms: 7000,
            late_move_time_ms: 1900,
            late_game_move_number: 60,
            forced_move_time_ms: 600,
            max_depth: 20,
            forced_depth: 7,
            forced_max_replies: 4,
            forced_search: true,
            tt_buckets: 1 << 16,
            tt_bucket_capacity: 8,
            hash_seed: 0x5EED_C4A2_71F0_0D15,
        }
    }
}

impl EngineConfig {
    /// Option names accepted by `set_option`, with their current values.
    pub fn options(&self) -> Vec<(&'static str, String)> {
        vec![
            ("MoveTime", self.move_time_ms.to_string()),
            ("LateMoveTime", self.late_move_time_ms.to_string()),
            ("LateMoveNumber", self.late_game_move_number.to_string()),
            ("ForcedMoveTime", self.forced_move_time_ms.to_string()),
            ("MaxDepth", self.max_depth.to_string()),
            ("ForcedDepth", self.forced_depth.to_string()),
            ("ForcedMaxReplies", self.forced_max_replies.to_string()),
            ("ForcedSearch", self.forced_search.to_string()),
            ("HashBuckets", self.tt_buckets.to_string()),
            ("HashBucketSize", self.tt_bucket_capacity.to_string()),
            ("HashSeed", self.hash_seed.to_string()),
        ]
    }

    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let bad = || OptionError::InvalidValue {
            name: name.to_owned(),
            value: value.to_owned(),
        };
        let value = value.trim();

        match name {
            "MoveTime" => self.move_time_ms = value.parse().map_err(|_| bad())?,
            "LateMoveTime" => self.late_move_time_ms = value.parse().map_err(|_| bad())?,
            "LateMoveNumber" => self.late_game_move_number = value.parse().map_err(|_| bad())?,
            "ForcedMoveTime" => self.forced_move_time_ms = value.parse().map_err(|_| bad())?,
            "MaxDepth" => {
                let depth: u32 = value.parse().map_err(|_| bad())?;
                if depth < 2 {
                    return Err(bad());
                }
                self.max_depth = depth;
            }
            "ForcedDepth" => self.forced_depth = value.parse().map_err(|_| bad())?,
            "ForcedMaxReplies" => self.forced_max_replies = value.parse().map_err(|_| bad())?,
            "ForcedSearch" => {
                self.forced_search = match value.to_ascii_lowercase().as_str() {
                    "true" | "1" | "on" => true,
                    "false" | "0" | "off" => false,
                    _ => return Err(bad()),
                }
            }
            "HashBuckets" => self.tt_buckets = value.parse::<usize>().map_err(|_| bad())?.max(1),
            "HashBucketSize" => self.tt_bucket_capacity = value.parse::<usize>().map_err(|_| bad())?.max(1),
            "HashSeed" => self.hash_seed = value.parse().map_err(|_| bad())?,
            _ => return Err(OptionError::Unknown(name.to_owned())),
        }
        Ok(())
    }

    pub fn search_config(&self, move_time: Duration) -> SearchConfig {
        SearchConfig {
            max_depth: self.max_depth,
            move_time,
            forced_search: self.forced_search,
            forced_depth: self.forced_depth,
            forced_max_replies: self.forced_max_replies,
            forced_time: Duration::from_millis(self.forced_move_time_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineConfig, OptionError};

    #[test]
    fn options_update_named_fields() {
        let mut config = EngineConfig::default();
        config.set_option("MoveTime", "2500").expect("valid");
        config.set_option("ForcedSearch", "off").expect("valid");
        config.set_option("MaxDepth", "6").expect("valid");
        assert_eq!(config.move_time_ms, 2500);
        assert!(!config.forced_search);
        assert_eq!(config.max_depth, 6);
    }

    #[test]
    fn bad_options_are_reported() {
        let mut config = EngineConfig::default();
        assert_eq!(
            config.set_option("Ponder", "true"),
            Err(OptionError::Unknown("Ponder".to_owned()))
        );
        assert!(config.set_option("MoveTime", "soon").is_err());
        assert!(config.set_option("MaxDepth", "1").is_err());
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn every_listed_option_round_trips() {
        let mut config = EngineConfig::default();
        for (name, value) in EngineConfig::default().options() {
            config.set_option(name, &value).expect("listed option accepts its own value");
        }
        assert_eq!(config, EngineConfig::default());
    }
}
