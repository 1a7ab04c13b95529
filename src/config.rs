use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::charts::colors::{SHIFT_PALETTE, ShiftColors};
use crate::charts::distribution::BucketConfig;
use crate::charts::utility::MAX_TICKS;

/// Chart settings that can be overridden per deployment.
///
/// Stored as a plain JSON object on disk; every field is optional:
/// ```json
/// {
///   "distance": { "bucket_size": 10.0, "num_buckets": 8 },
///   "max_ticks": 6,
///   "shift_palette": ["#fee0d2", "#fc9272", "#de2d26"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub distance: BucketConfig,
    pub max_ticks: usize,
    pub shift_palette: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            distance: BucketConfig::default(),
            max_ticks: MAX_TICKS,
            shift_palette: SHIFT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ChartConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read chart config {path}"))?;
        let config: ChartConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid chart config {path}"))?;
        config
            .validate()
            .with_context(|| format!("invalid chart config {path}"))?;
        Ok(config)
    }

    /// Buckets must have a positive, finite width.
    pub fn validate(&self) -> Result<()> {
        let size = self.distance.bucket_size;
        ensure!(
            size.is_finite() && size > 0.0,
            "distance.bucket_size must be a positive number, got {size}"
        );
        Ok(())
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn palette(&self) -> Vec<&str> {
        self.shift_palette.iter().map(String::as_str).collect()
    }

    pub fn shift_colors<S: AsRef<str>>(&self, labels: &[S]) -> ShiftColors {
        ShiftColors::new(labels, &self.palette())
    }
}
