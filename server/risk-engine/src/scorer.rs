//! RiskScorer: BMI deviation + inactivity, weighted, age-adjusted, tiered.
//!
//! Every function here is pure. A `RiskScorer` only holds its validated
//! `ScoringConfig`, so it can be shared across threads freely.

use crate::config::ScoringConfig;
use crate::error::{EngineError, ProfileField};
use crate::normalize::{clamp_days, MAX_EXERCISE_DAYS};
use crate::tier;
use crate::types::{HealthProfile, RiskResult};

/// `weight / height_m^2`.
pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
  let height_m = height_cm / 100.0;
  weight_kg / (height_m * height_m)
}

/// `min(1, |bmi - optimal| / max_deviation)`; NaN saturates at 1.
pub fn bmi_deviation_factor(bmi: f64, config: &ScoringConfig) -> f64 {
  ((bmi - config.optimal_bmi).abs() / config.max_bmi_deviation)
    .min(1.0)
    .max(0.0)
}

/// Exercise days on the 0–1 scale.
pub fn exercise_factor(days_per_week: f64) -> f64 {
  clamp_days(days_per_week) / MAX_EXERCISE_DAYS
}

/// Step function: 1.0 up to the threshold age, then one increment per full
/// step past it.
pub fn age_factor(age: u32, config: &ScoringConfig) -> f64 {
  if age <= config.age_threshold {
    return 1.0;
  }
  let steps = (age - config.age_threshold) / config.age_step_years.max(1);
  1.0 + config.age_step_increment * f64::from(steps)
}

#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
  config: ScoringConfig,
}

impl RiskScorer {
  /// Build a scorer from a config, validating it first.
  pub fn try_new(config: ScoringConfig) -> Result<Self, EngineError> {
    config.validate()?;
    Ok(Self { config })
  }

  pub fn config(&self) -> &ScoringConfig {
    &self.config
  }

  /// Compute the risk result for one profile.
  ///
  /// Fails only with `IncompleteProfile` when age, height or weight is zero,
  /// negative or NaN. Extreme but positive values yield extreme results.
  pub fn compute_risk(
    &self,
    profile: &HealthProfile,
    base_premium: Option<f64>,
  ) -> Result<RiskResult, EngineError> {
    check_complete(profile)?;
    let config = &self.config;

    let bmi = bmi(profile.height_cm, profile.weight_kg);
    let bmi_deviation_factor = bmi_deviation_factor(bmi, config);
    let exercise_factor = exercise_factor(profile.exercise_days_per_week);
    let base_risk_score = (config.bmi_weight * bmi_deviation_factor
      + config.exercise_weight * (1.0 - exercise_factor))
      .min(1.0)
      .max(0.0);
    let age_factor = age_factor(profile.age, config);
    let adjusted_risk_score = (base_risk_score * age_factor).min(1.0).max(0.0);

    let (risk_level, tier_spec) = tier::classify(adjusted_risk_score, &config.tiers);

    tracing::debug!(
      bmi,
      bmi_deviation_factor,
      exercise_factor,
      base_risk_score,
      age_factor,
      adjusted_risk_score,
      level = risk_level.get(),
      "computed risk"
    );

    Ok(RiskResult {
      age: profile.age,
      bmi,
      bmi_deviation_factor,
      exercise_factor,
      base_risk_score,
      age_factor,
      adjusted_risk_score,
      risk_level,
      risk_category: risk_level.category(),
      premium_surcharge_percentage: tier_spec.surcharge_percent,
      discount_percentage: tier_spec.discount_percent,
      final_premium: base_premium.map(|p| tier::apply_surcharge(p, tier_spec.surcharge_percent)),
      discounted_premium: base_premium.map(|p| tier::apply_discount(p, tier_spec.discount_percent)),
    })
  }
}

fn check_complete(profile: &HealthProfile) -> Result<(), EngineError> {
  let mut missing = Vec::new();
  if profile.age == 0 {
    missing.push(ProfileField::Age);
  }
  if !(profile.height_cm > 0.0) {
    missing.push(ProfileField::HeightCm);
  }
  if !(profile.weight_kg > 0.0) {
    missing.push(ProfileField::WeightKg);
  }
  if missing.is_empty() {
    Ok(())
  } else {
    Err(EngineError::incomplete(missing))
  }
}
