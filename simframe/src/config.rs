use crate::error::{FrameError, Result};
use crate::types::Real;

// Knobs that apply to a whole frozen frame tree.
//
// Deserializable so a host application can keep them
// alongside the rest of its model settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Memoize ground transforms per state stamp.
    pub cache_ground_transforms: bool,
    /// How far a rotation quaternion's norm may stray from 1
    /// before the transform is treated as degenerate.
    pub unit_tolerance: Real,
}

impl TreeConfig {
    pub fn from_json_str(json: &str) -> Result<TreeConfig> {
        let config: TreeConfig = serde_json::from_str(json)
            .map_err(|err| FrameError::invalid_config(err.to_string()))?;
        if !config.is_valid() {
            return Err(FrameError::invalid_config(format!(
                "unit_tolerance must be positive and finite, got {}",
                config.unit_tolerance
            )));
        }
        Ok(config)
    }

    pub fn is_valid(&self) -> bool {
        self.unit_tolerance.is_finite() && self.unit_tolerance > 0.0
    }
}

impl Default for TreeConfig {
    fn default() -> TreeConfig {
        TreeConfig {
            cache_ground_transforms: true,
            unit_tolerance: 1e-9,
        }
    }
}
