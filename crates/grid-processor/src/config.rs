//! Configuration for the grid processor.

use crate::types::InterpolationMethod;
use serde::{Deserialize, Serialize};

/// Configuration for the grid processor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridProcessorConfig {
    /// Interpolation method for grid alignment.
    pub interpolation: InterpolationMethod,
}

impl GridProcessorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_INTERPOLATION") {
            config.interpolation = InterpolationMethod::from_str(&val);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_bilinear() {
        assert_eq!(
            GridProcessorConfig::default().interpolation,
            InterpolationMethod::Bilinear
        );
    }
}
