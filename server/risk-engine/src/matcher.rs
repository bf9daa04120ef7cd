//! PlanMatcher: eligibility filter + additive advisory score over the catalog.

use serde::Serialize;
use std::cmp::Ordering;

use crate::catalog::{AgeGroup, InsurancePlan, PlanCatalog};
use crate::types::{RiskCategory, RiskResult};

pub const AGE_GROUP_POINTS: u32 = 20;
pub const RISK_CATEGORY_POINTS: u32 = 15;
pub const EXACT_LEVEL_POINTS: u32 = 10;
pub const POPULAR_POINTS: u32 = 5;
pub const CHRONIC_FEATURE_POINTS: u32 = 15;
pub const SPECIALIST_FEATURE_POINTS: u32 = 10;
pub const WELLNESS_FEATURE_POINTS: u32 = 10;
pub const SCREENING_FEATURE_POINTS: u32 = 10;
/// Plans at or above this score are flagged as recommended.
pub const RECOMMENDED_THRESHOLD: u32 = 70;
/// Age from which screening/senior features count.
const SCREENING_AGE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMatch {
  pub plan_id: String,
  pub name: String,
  pub score: u32,
  pub recommended: bool,
  pub reasons: Vec<String>,
  #[serde(skip)]
  hospital_care: f64,
}

/// Stateless; the catalog is always passed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanMatcher;

impl PlanMatcher {
  /// Eligible plans ranked by score desc, hospital cover desc, then plan id.
  pub fn match_plans(
    &self,
    risk: &RiskResult,
    user_level: u32,
    catalog: &PlanCatalog,
  ) -> Vec<PlanMatch> {
    let age_group = AgeGroup::for_age(risk.age);
    let mut matches: Vec<PlanMatch> = catalog
      .plans()
      .iter()
      .filter(|plan| is_eligible(plan, age_group, risk.risk_category, user_level))
      .map(|plan| score_plan(plan, risk, age_group, user_level))
      .collect();

    matches.sort_by(|a, b| {
      b.score
        .cmp(&a.score)
        .then_with(|| b.hospital_care.partial_cmp(&a.hospital_care).unwrap_or(Ordering::Equal))
        .then_with(|| a.plan_id.cmp(&b.plan_id))
    });

    tracing::debug!(
      eligible = matches.len(),
      catalog = catalog.len(),
      "matched plans"
    );
    matches
  }
}

fn is_eligible(
  plan: &InsurancePlan,
  age_group: AgeGroup,
  category: RiskCategory,
  user_level: u32,
) -> bool {
  (plan.age_groups.is_empty() || plan.age_groups.contains(&age_group))
    && (plan.risk_categories.is_empty() || plan.risk_categories.contains(&category))
    && plan.min_level <= user_level
}

fn has_feature(plan: &InsurancePlan, keywords: &[&str]) -> bool {
  plan.features.iter().any(|f| {
    let f = f.to_lowercase();
    keywords.iter().any(|k| f.contains(k))
  })
}

fn score_plan(
  plan: &InsurancePlan,
  risk: &RiskResult,
  age_group: AgeGroup,
  user_level: u32,
) -> PlanMatch {
  let mut score = 0;
  let mut reasons = Vec::new();

  if plan.age_groups.contains(&age_group) {
    score += AGE_GROUP_POINTS;
    reasons.push("Designed for your age group".to_string());
  }
  if plan.risk_categories.contains(&risk.risk_category) {
    score += RISK_CATEGORY_POINTS;
    reasons.push(format!("Suited to {} risk profiles", risk.risk_category.as_str()));
  }
  if plan.min_level == user_level {
    score += EXACT_LEVEL_POINTS;
    reasons.push(format!("Unlocked at your level ({})", user_level));
  }
  if plan.popular {
    score += POPULAR_POINTS;
    reasons.push("Popular with members".to_string());
  }

  if risk.risk_category == RiskCategory::Low {
    if has_feature(plan, &["wellness", "fitness", "preventive"]) {
      score += WELLNESS_FEATURE_POINTS;
      reasons.push("Rewards your healthy lifestyle".to_string());
    }
  } else {
    if has_feature(plan, &["chronic"]) {
      score += CHRONIC_FEATURE_POINTS;
      reasons.push("Includes chronic condition management".to_string());
    }
    if has_feature(plan, &["specialist"]) {
      score += SPECIALIST_FEATURE_POINTS;
      reasons.push("Specialist network access".to_string());
    }
  }
  if risk.age >= SCREENING_AGE && has_feature(plan, &["screening", "senior"]) {
    score += SCREENING_FEATURE_POINTS;
    reasons.push("Age-appropriate screenings".to_string());
  }

  PlanMatch {
    plan_id: plan.id.clone(),
    name: plan.name.clone(),
    score,
    recommended: score >= RECOMMENDED_THRESHOLD,
    reasons,
    hospital_care: plan.coverage.hospital_care,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Coverage;
  use crate::scorer::RiskScorer;
  use crate::types::HealthProfile;

  fn risk(age: u32, weight: f64, days: f64) -> RiskResult {
    RiskScorer::default()
      .compute_risk(&HealthProfile::new(age, 170.0, weight, days), None)
      .unwrap()
  }

  fn ids(matches: &[PlanMatch]) -> Vec<&str> {
    matches.iter().map(|m| m.plan_id.as_str()).collect()
  }

  #[test]
  fn high_risk_fifty_year_old_gets_chronic_care_first() {
    let r = risk(50, 95.0, 0.0);
    let matches = PlanMatcher.match_plans(&r, 1, &PlanCatalog::builtin());
    assert_eq!(ids(&matches), vec!["chronic-care-plus", "basic-health"]);
    let top = &matches[0];
    // 20 + 15 + 10 + 5 + 15 + 10 + 10
    assert_eq!(top.score, 85);
    assert!(top.recommended);
    assert!(!matches[1].recommended);
  }

  #[test]
  fn young_low_risk_user_sees_active_life_once_unlocked() {
    let r = risk(28, 65.0, 5.0);
    let catalog = PlanCatalog::builtin();

    let at_level_one = PlanMatcher.match_plans(&r, 1, &catalog);
    assert_eq!(ids(&at_level_one), vec!["basic-health"]);

    let at_level_two = PlanMatcher.match_plans(&r, 2, &catalog);
    assert_eq!(ids(&at_level_two), vec!["active-life", "basic-health"]);
    // 20 + 15 + 10 + 5 + 10
    assert_eq!(at_level_two[0].score, 60);
    assert!(!at_level_two[0].recommended);
  }

  #[test]
  fn ties_break_on_hospital_cover_then_id() {
    let plan = |id: &str, hospital_care: f64| InsurancePlan {
      id: id.into(),
      name: id.to_uppercase(),
      category: "health".into(),
      base_premium: 100.0,
      coverage: Coverage {
        hospital_care,
        ..Default::default()
      },
      age_groups: vec![],
      risk_categories: vec![],
      min_level: 1,
      popular: false,
      features: vec![],
    };
    let catalog = PlanCatalog::new(vec![
      plan("b", 10_000.0),
      plan("a", 10_000.0),
      plan("c", 90_000.0),
    ])
    .unwrap();
    let matches = PlanMatcher.match_plans(&risk(30, 65.0, 4.0), 1, &catalog);
    assert_eq!(ids(&matches), vec!["c", "a", "b"]);
    assert!(matches.iter().all(|m| m.score == 10));
  }

  #[test]
  fn ordering_is_stable_across_calls() {
    let r = risk(40, 80.0, 2.0);
    let catalog = PlanCatalog::builtin();
    let first = PlanMatcher.match_plans(&r, 3, &catalog);
    for _ in 0..10 {
      assert_eq!(PlanMatcher.match_plans(&r, 3, &catalog), first);
    }
  }

  #[test]
  fn empty_catalog_yields_no_matches() {
    let r = risk(40, 80.0, 2.0);
    assert!(PlanMatcher
      .match_plans(&r, 5, &PlanCatalog::default())
      .is_empty());
  }
}
