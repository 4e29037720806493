//! Grid configuration

use crate::error::GridError;
use crate::types::{Direction, DEFAULT_HEIGHT, DEFAULT_PLACEMENT_ATTEMPTS, DEFAULT_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub width: u16,
    pub height: u16,
    /// Side new tiles enter from after a destruction
    pub fill_direction: Direction,
    /// Generator draws allowed per cell before board setup gives up
    pub max_placement_attempts: u32,
}

impl GridConfig {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_fill_direction(mut self, direction: Direction) -> Self {
        self.fill_direction = direction;
        self
    }

    pub fn with_max_placement_attempts(mut self, attempts: u32) -> Self {
        self.max_placement_attempts = attempts;
        self
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.width == 0 || self.height == 0 {
            return Err(GridError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fill_direction: Direction::Up,
            max_placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_nine_by_nine_filling_up() {
        let config = GridConfig::default();
        assert_eq!((config.width, config.height), (9, 9));
        assert_eq!(config.fill_direction, Direction::Up);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert_eq!(
            GridConfig::new(0, 5).validate(),
            Err(GridError::InvalidDimensions { width: 0, height: 5 })
        );
    }
}
