//! Per-move time budgeting.
//!
//! The engine spends a fixed budget per move and drops to a shorter one
//! after a configured number of its own moves. When the controller reports
//! the remaining clock, the budget is further capped at a twentieth of it.

use std::time::Duration;

use crate::engines::engine_config::EngineConfig;
use crate::engines::engine_trait::GoParams;

/// `engine_moves` counts the move about to be played, starting at 1.
pub fn resolve_move_budget(config: &EngineConfig, engine_moves: u32, params: &GoParams) -> Duration {
    if let Some(fixed) = params.move_time_ms {
        return Duration::from_millis(fixed.max(1));
    }

    let mut budget_ms = if engine_moves >= config.late_game_move_number {
        config.late_move_time_ms
    } else {
        config.move_time_ms
    };

    if let Some(remaining) = params.time_left_ms {
        budget_ms = budget_ms.min((remaining / 20).max(1));
    }

    Duration::from_millis(budget_ms)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::resolve_move_budget;
    use crate::engines::engine_config::EngineConfig;
    use crate::engines::engine_trait::GoParams;

    #[test]
    fn budget_tapers_after_late_move_number() {
        let config = EngineConfig::default();
        let params = GoParams::default();
        assert_eq!(resolve_move_budget(&config, 1, &params), Duration::from_millis(7000));
        assert_eq!(resolve_move_budget(&config, 59, &params), Duration::from_millis(7000));
        assert_eq!(resolve_move_budget(&config, 60, &params), Duration::from_millis(1900));
    }

    #[test]
    fn clock_caps_and_fixed_time_overrides() {
        let config = EngineConfig::default();
        let low_clock = GoParams {
            time_left_ms: Some(20_000),
            ..GoParams::default()
        };
        assert_eq!(resolve_move_budget(&config, 1, &low_clock), Duration::from_millis(1000));

        let fixed = GoParams {
            move_time_ms: Some(250),
            time_left_ms: Some(20_000),
            ..GoParams::default()
        };
        assert_eq!(resolve_move_budget(&config, 1, &fixed), Duration::from_millis(250));
    }
}
