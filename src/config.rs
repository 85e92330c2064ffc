use std::time::Duration;

use crate::error::ConfigError;
use crate::Coord;

/// Constructor-time settings of an [`Engine`](crate::Engine). Changing any
/// of them means building a new engine.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    /// Base interval between two ticks, in milliseconds
    pub tick_interval_ms: u64,
    pub initial_length: usize,
    pub score_per_food: u32,
    /// Factor applied to the tick interval after each food eaten
    pub speed_up: f64,
    /// Floor for the sped-up tick interval, in milliseconds
    pub min_tick_interval_ms: u64,
    pub foods_per_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 20,
            height: 10,
            tick_interval_ms: 100,
            initial_length: 3,
            score_per_food: 1,
            speed_up: 0.98,
            min_tick_interval_ms: 40,
            foods_per_level: 5,
        }
    }
}

impl GameConfig {
    pub fn new(width: Coord, height: Coord, tick_interval_ms: u64) -> Self {
        GameConfig { width, height, tick_interval_ms, ..Default::default() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::EmptyBoard { width: self.width, height: self.height });
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        if self.initial_length == 0 {
            return Err(ConfigError::EmptySnake);
        }

        // The snake spawns on the center cell heading right, its body
        // trailing to the left of it.
        if self.initial_length > self.width as usize / 2 + 1 {
            return Err(ConfigError::SnakeDoesNotFit { length: self.initial_length, width: self.width });
        }

        if self.initial_length >= self.area() {
            return Err(ConfigError::NoRoomForFood {
                length: self.initial_length,
                width: self.width,
                height: self.height,
            });
        }

        if !(self.speed_up > 0.0 && self.speed_up <= 1.0) {
            return Err(ConfigError::InvalidSpeedUp(self.speed_up));
        }

        if self.min_tick_interval_ms > self.tick_interval_ms {
            return Err(ConfigError::MinIntervalAboveBase {
                min_ms: self.min_tick_interval_ms,
                base_ms: self.tick_interval_ms,
            });
        }

        if self.foods_per_level == 0 {
            return Err(ConfigError::ZeroFoodsPerLevel);
        }

        // Every cell eaten at full increment must still fit the score.
        if (self.score_per_food as u64).checked_mul(self.area() as u64).is_none() {
            return Err(ConfigError::ScoreOverflow { score_per_food: self.score_per_food });
        }

        Ok(())
    }

    fn area(&self) -> usize {
        (self.width.max(0) as usize).saturating_mul(self.height.max(0) as usize)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Effective tick interval once `foods_eaten` foods have sped the game up.
    pub fn tick_interval_after(&self, foods_eaten: u32) -> Duration {
        let base = self.tick_interval_ms as f64;
        let sped_up = base * self.speed_up.powi(foods_eaten.min(i32::MAX as u32) as i32);
        let floor = self.min_tick_interval_ms as f64;
        Duration::from_micros((sped_up.max(floor) * 1000.0).round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        let err = GameConfig::new(0, 10, 100).validate().unwrap_err();
        assert_eq!(err, ConfigError::EmptyBoard { width: 0, height: 10 });

        let err = GameConfig::new(10, -3, 100).validate().unwrap_err();
        assert_eq!(err, ConfigError::EmptyBoard { width: 10, height: -3 });
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let config = GameConfig { min_tick_interval_ms: 0, ..GameConfig::new(10, 10, 0) };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));
    }

    #[test]
    fn snake_must_fit_left_of_center() {
        // Center of a 4-wide board is x = 2, so 3 segments reach x = 0.
        let fits = GameConfig { initial_length: 3, ..GameConfig::new(4, 4, 100) };
        assert_eq!(fits.validate(), Ok(()));

        let too_long = GameConfig { initial_length: 4, ..GameConfig::new(4, 4, 100) };
        assert_eq!(too_long.validate(), Err(ConfigError::SnakeDoesNotFit { length: 4, width: 4 }));
    }

    #[test]
    fn board_needs_a_cell_for_food() {
        let config = GameConfig { initial_length: 1, ..GameConfig::new(1, 1, 100) };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NoRoomForFood { length: 1, width: 1, height: 1 })
        );
    }

    #[test]
    fn huge_initial_length_is_refused() {
        let config = GameConfig { initial_length: usize::MAX, ..GameConfig::new(10, 10, 100) };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SnakeDoesNotFit { length: usize::MAX, width: 10 })
        );
    }

    #[test]
    fn score_must_not_overflow_on_a_full_board() {
        let config = GameConfig { score_per_food: u32::MAX, ..GameConfig::new(10, 10, 100) };
        assert_eq!(config.validate(), Ok(()));

        let config = GameConfig { score_per_food: u32::MAX, ..GameConfig::new(i32::MAX, i32::MAX, 100) };
        assert_eq!(config.validate(), Err(ConfigError::ScoreOverflow { score_per_food: u32::MAX }));
    }

    #[test]
    fn speed_up_must_be_a_fraction() {
        let config = GameConfig { speed_up: 1.5, ..GameConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::InvalidSpeedUp(1.5)));

        let config = GameConfig { speed_up: 0.0, ..GameConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::InvalidSpeedUp(0.0)));
    }

    #[test]
    fn tick_interval_speeds_up_down_to_the_floor() {
        let config = GameConfig { speed_up: 0.5, min_tick_interval_ms: 30, ..GameConfig::new(10, 10, 100) };

        assert_eq!(config.tick_interval_after(0), Duration::from_millis(100));
        assert_eq!(config.tick_interval_after(1), Duration::from_millis(50));
        assert_eq!(config.tick_interval_after(2), Duration::from_millis(30));
        assert_eq!(config.tick_interval_after(50), Duration::from_millis(30));
    }
}
