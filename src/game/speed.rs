//! Speed progression: the tick delay tightens as food is eaten.

use super::config::GameConfig;
use std::time::Duration;

/// Next tick interval after a tick. The delay only changes on ticks where
/// food was eaten, shrinking by the configured decrement down to the floor.
pub fn next_interval(current: Duration, ate_food: bool, config: &GameConfig) -> Duration {
    if !ate_food {
        return current;
    }
    current
        .saturating_sub(config.speed_decrement())
        .max(config.min_tick())
}
