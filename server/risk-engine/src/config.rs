//! Scoring constants and process settings.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::EngineError;

/// Number of risk tiers; the category mapping in `tier` assumes exactly this many.
pub const TIER_COUNT: usize = 5;

/// Tolerance for the weight-sum invariant.
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// One row of the tier table. Levels are implied by position (first row = level 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSpec {
  /// Inclusive upper bound on the adjusted risk score for this tier.
  pub upper_bound: f64,
  /// Premium surcharge in whole percent.
  pub surcharge_percent: u8,
  /// Discount in whole percent, under the discount convention.
  pub discount_percent: u8,
}

/// Loadings applied by the comprehensive risk variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComprehensiveWeights {
  pub per_chronic_condition: f64,
  pub max_chronic_loading: f64,
  pub current_smoker: f64,
  pub former_smoker: f64,
  pub manual_occupation: f64,
  pub hazardous_occupation: f64,
}

impl Default for ComprehensiveWeights {
  fn default() -> Self {
    Self {
      per_chronic_condition: 0.05,
      max_chronic_loading: 0.20,
      current_smoker: 0.15,
      former_smoker: 0.05,
      manual_occupation: 0.05,
      hazardous_occupation: 0.10,
    }
  }
}

/// Tunable constants of the risk formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
  /// BMI treated as zero deviation.
  pub optimal_bmi: f64,
  /// Deviation (in BMI points) at which the BMI factor saturates at 1.0.
  pub max_bmi_deviation: f64,
  /// Weight of the BMI factor. `bmi_weight + exercise_weight` must be 1.0.
  pub bmi_weight: f64,
  /// Weight of the inactivity term `(1 - exercise_factor)`.
  pub exercise_weight: f64,
  /// Ages at or below this get an age factor of exactly 1.0.
  pub age_threshold: u32,
  /// Length of one age step past the threshold, in years.
  pub age_step_years: u32,
  /// Age factor increment per full step.
  pub age_step_increment: f64,
  /// Ordered tier table, lowest risk first.
  pub tiers: Vec<TierSpec>,
  pub comprehensive: ComprehensiveWeights,
}

impl Default for ScoringConfig {
  fn default() -> Self {
    Self {
      optimal_bmi: 22.5,
      max_bmi_deviation: 10.0,
      bmi_weight: 0.6,
      exercise_weight: 0.4,
      age_threshold: 35,
      age_step_years: 10,
      age_step_increment: 0.02,
      tiers: vec![
        TierSpec { upper_bound: 0.20, surcharge_percent: 5, discount_percent: 20 },
        TierSpec { upper_bound: 0.40, surcharge_percent: 10, discount_percent: 15 },
        TierSpec { upper_bound: 0.60, surcharge_percent: 15, discount_percent: 10 },
        TierSpec { upper_bound: 0.80, surcharge_percent: 20, discount_percent: 5 },
        TierSpec { upper_bound: 1.00, surcharge_percent: 25, discount_percent: 0 },
      ],
      comprehensive: ComprehensiveWeights::default(),
    }
  }
}

impl ScoringConfig {
  /// Parse a (possibly partial) config from JSON and validate it.
  pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
    let config: Self = serde_json::from_str(raw)?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: &std::path::Path) -> Result<Self, EngineError> {
    let raw = std::fs::read_to_string(path)?;
    Self::from_json_str(&raw)
  }

  /// Check the invariants the formula depends on.
  pub fn validate(&self) -> Result<(), EngineError> {
    if self.bmi_weight < 0.0 || self.exercise_weight < 0.0 {
      return Err(EngineError::config("weights must be non-negative"));
    }
    if ((self.bmi_weight + self.exercise_weight) - 1.0).abs() > WEIGHT_SUM_EPSILON {
      return Err(EngineError::config(format!(
        "bmi_weight + exercise_weight must equal 1.0 (got {})",
        self.bmi_weight + self.exercise_weight
      )));
    }
    if !(self.optimal_bmi > 0.0) {
      return Err(EngineError::config("optimal_bmi must be positive"));
    }
    if !(self.max_bmi_deviation > 0.0) {
      return Err(EngineError::config("max_bmi_deviation must be positive"));
    }
    if self.age_step_years == 0 {
      return Err(EngineError::config("age_step_years must be at least 1"));
    }
    if !(self.age_step_increment >= 0.0) {
      return Err(EngineError::config("age_step_increment must be non-negative"));
    }
    if self.tiers.len() != TIER_COUNT {
      return Err(EngineError::config(format!(
        "expected {} tiers, got {}",
        TIER_COUNT,
        self.tiers.len()
      )));
    }
    let mut prev = 0.0;
    for (i, tier) in self.tiers.iter().enumerate() {
      if !(tier.upper_bound > prev) {
        return Err(EngineError::config(format!(
          "tier {} upper bound {} must exceed {}",
          i + 1,
          tier.upper_bound,
          prev
        )));
      }
      prev = tier.upper_bound;
    }
    if prev < 1.0 {
      return Err(EngineError::config("last tier must cover scores up to 1.0"));
    }
    let c = &self.comprehensive;
    let loadings = [
      c.per_chronic_condition,
      c.max_chronic_loading,
      c.current_smoker,
      c.former_smoker,
      c.manual_occupation,
      c.hazardous_occupation,
    ];
    if loadings.iter().any(|w| !(*w >= 0.0)) {
      return Err(EngineError::config("comprehensive loadings must be non-negative"));
    }
    Ok(())
  }
}

// ---------------------------------------------------------------------------
// Process settings (binary only)
// ---------------------------------------------------------------------------

/// Settings for the `youmatter-risk` binary, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub log_level: String,
  pub catalog_path: Option<PathBuf>,
  pub scoring_path: Option<PathBuf>,
}

impl AppConfig {
  pub fn from_env() -> Self {
    dotenvy::dotenv().ok();

    let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());

    Self {
      log_level: non_empty("YOUMATTER_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
      catalog_path: non_empty("YOUMATTER_CATALOG").map(PathBuf::from),
      scoring_path: non_empty("YOUMATTER_SCORING").map(PathBuf::from),
    }
  }
}
