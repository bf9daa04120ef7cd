//! Comprehensive risk: the core score plus chronic-condition, smoking and
//! occupation loadings, re-tiered with the same table.

use serde::Serialize;

use crate::config::ComprehensiveWeights;
use crate::error::EngineError;
use crate::scorer::RiskScorer;
use crate::tier;
use crate::types::{
  HealthProfile, OccupationCategory, RiskCategory, RiskLevel, RiskResult, SmokingStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Loadings {
  pub chronic_conditions: f64,
  pub smoking: f64,
  pub occupation: f64,
}

impl Loadings {
  pub fn total(&self) -> f64 {
    self.chronic_conditions + self.smoking + self.occupation
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveRisk {
  pub risk_score: f64,
  pub level: RiskLevel,
  pub risk_category: RiskCategory,
  pub premium_surcharge_percentage: u8,
  pub discount_percentage: u8,
  pub loadings: Loadings,
}

pub fn loadings(profile: &HealthProfile, weights: &ComprehensiveWeights) -> Loadings {
  let chronic_conditions = (weights.per_chronic_condition * profile.chronic_conditions.len() as f64)
    .min(weights.max_chronic_loading);
  let smoking = match profile.smoking {
    Some(SmokingStatus::Current) => weights.current_smoker,
    Some(SmokingStatus::Former) => weights.former_smoker,
    Some(SmokingStatus::Never) | None => 0.0,
  };
  let occupation = match profile.occupation {
    Some(OccupationCategory::Manual) => weights.manual_occupation,
    Some(OccupationCategory::Hazardous) => weights.hazardous_occupation,
    Some(OccupationCategory::Sedentary) | None => 0.0,
  };
  Loadings {
    chronic_conditions,
    smoking,
    occupation,
  }
}

impl RiskScorer {
  /// Core result for `profile` and the comprehensive variant layered on it.
  pub fn compute_comprehensive(
    &self,
    profile: &HealthProfile,
    base_premium: Option<f64>,
  ) -> Result<(RiskResult, ComprehensiveRisk), EngineError> {
    let core = self.compute_risk(profile, base_premium)?;
    let comprehensive = self.comprehensive_from(&core, profile);
    Ok((core, comprehensive))
  }

  /// Layer lifestyle loadings on an already computed core result.
  pub fn comprehensive_from(&self, core: &RiskResult, profile: &HealthProfile) -> ComprehensiveRisk {
    let config = self.config();
    let loadings = loadings(profile, &config.comprehensive);
    let risk_score = (core.adjusted_risk_score + loadings.total()).min(1.0).max(0.0);
    let (level, tier_spec) = tier::classify(risk_score, &config.tiers);
    ComprehensiveRisk {
      risk_score,
      level,
      risk_category: level.category(),
      premium_surcharge_percentage: tier_spec.surcharge_percent,
      discount_percentage: tier_spec.discount_percent,
      loadings,
    }
  }
}
