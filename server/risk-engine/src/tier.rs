//! Risk tiering: adjusted score -> level, surcharge, discount.

use crate::config::TierSpec;
use crate::types::RiskLevel;

/// Map a score to its tier. The first tier whose upper bound is >= `score`
/// wins; anything past the table (including NaN) lands in the last tier.
///
/// Assumes a validated, non-empty table.
pub fn classify(score: f64, tiers: &[TierSpec]) -> (RiskLevel, TierSpec) {
  let last = tiers.len().saturating_sub(1);
  let index = tiers
    .iter()
    .position(|t| score <= t.upper_bound)
    .unwrap_or(last);
  (RiskLevel::from_index(index), tiers[index])
}

/// Apply a percentage surcharge to a premium.
pub fn apply_surcharge(base_premium: f64, percent: u8) -> f64 {
  base_premium * (1.0 + f64::from(percent) / 100.0)
}

/// Apply a percentage discount to a premium.
pub fn apply_discount(base_premium: f64, percent: u8) -> f64 {
  base_premium * (1.0 - f64::from(percent) / 100.0)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ScoringConfig;

  fn level(score: f64) -> u8 {
    classify(score, &ScoringConfig::default().tiers).0.get()
  }

  #[test]
  fn boundaries_are_inclusive_upper() {
    assert_eq!(level(0.0), 1);
    assert_eq!(level(0.20), 1);
    assert_eq!(level(0.2000001), 2);
    assert_eq!(level(0.40), 2);
    assert_eq!(level(0.60), 3);
    assert_eq!(level(0.80), 4);
    assert_eq!(level(0.81), 5);
    assert_eq!(level(1.0), 5);
  }

  #[test]
  fn out_of_table_scores_land_in_last_tier() {
    assert_eq!(level(f64::NAN), 5);
    assert_eq!(level(1.5), 5);
  }

  #[test]
  fn every_score_maps_to_exactly_one_level() {
    let tiers = ScoringConfig::default().tiers;
    for i in 0..=10_000 {
      let score = i as f64 / 10_000.0;
      let (lvl, tier) = classify(score, &tiers);
      let matching: Vec<usize> = (0..tiers.len())
        .filter(|&j| {
          let lower = if j == 0 { f64::NEG_INFINITY } else { tiers[j - 1].upper_bound };
          score > lower && score <= tiers[j].upper_bound
        })
        .collect();
      assert_eq!(matching.len(), 1, "score {} matched {:?}", score, matching);
      assert_eq!(usize::from(lvl.get()), matching[0] + 1);
      assert_eq!(tier, tiers[matching[0]]);
    }
  }

  #[test]
  fn surcharge_and_discount_table() {
    let tiers = ScoringConfig::default().tiers;
    let surcharges: Vec<u8> = tiers.iter().map(|t| t.surcharge_percent).collect();
    let discounts: Vec<u8> = tiers.iter().map(|t| t.discount_percent).collect();
    assert_eq!(surcharges, vec![5, 10, 15, 20, 25]);
    assert_eq!(discounts, vec![20, 15, 10, 5, 0]);
  }

  #[test]
  fn premium_adjustments() {
    assert!((apply_surcharge(200.0, 25) - 250.0).abs() < 1e-9);
    assert!((apply_discount(200.0, 20) - 160.0).abs() < 1e-9);
    assert!((apply_discount(200.0, 0) - 200.0).abs() < 1e-9);
  }
}
