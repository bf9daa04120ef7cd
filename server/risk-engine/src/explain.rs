//! Display report and human-readable reasons for a risk result.

use crate::normalize::clamp_days;
use crate::scorer::RiskScorer;
use crate::types::{HealthProfile, RiskFactors, RiskReport, RiskResult};

/// Round for display only; `RiskResult` keeps full precision.
pub fn round3(v: f64) -> f64 {
  (v * 1000.0).round() / 1000.0
}

fn round2(v: f64) -> f64 {
  (v * 100.0).round() / 100.0
}

/// Output-boundary shape of a result (`riskScore`, `level`, `factors`, ...).
pub fn report(result: &RiskResult) -> RiskReport {
  RiskReport {
    risk_score: round3(result.adjusted_risk_score),
    level: result.risk_level,
    risk_category: result.risk_category,
    premium_surcharge_percentage: result.premium_surcharge_percentage,
    discount_percentage: result.discount_percentage,
    final_premium: result.final_premium.map(round2),
    discounted_premium: result.discounted_premium.map(round2),
    factors: RiskFactors {
      bmi: round3(result.bmi),
      bmi_risk: round3(result.bmi_deviation_factor),
      fitness_risk: round3(1.0 - result.exercise_factor),
      age_risk: round3(result.age_factor - 1.0),
    },
  }
}

fn bmi_band(bmi: f64) -> &'static str {
  if bmi < 18.5 {
    "underweight"
  } else if bmi < 25.0 {
    "in the healthy range"
  } else if bmi < 30.0 {
    "overweight"
  } else {
    "in the obese range"
  }
}

/// Whole days print without decimals; partial days keep one.
fn format_days(days: f64) -> String {
  if days.fract() == 0.0 {
    format!("{:.0}", days)
  } else {
    format!("{:.1}", days)
  }
}

/// Short reasons plus improvement suggestions.
pub fn explanations(scorer: &RiskScorer, profile: &HealthProfile, result: &RiskResult) -> Vec<String> {
  let mut out = Vec::new();

  out.push(format!("BMI {:.1} is {}", result.bmi, bmi_band(result.bmi)));

  let days = clamp_days(profile.exercise_days_per_week);
  if days <= 0.0 {
    out.push("No regular exercise recorded".to_string());
  } else if days >= 5.0 {
    out.push(format!("Active {} days per week lowers your risk", format_days(days)));
  } else {
    out.push(format!("Exercising {} days per week", format_days(days)));
  }

  if result.age_factor > 1.0 {
    out.push(format!(
      "Age {} adds {:.0}% to the risk score",
      result.age,
      (result.age_factor - 1.0) * 100.0
    ));
  }

  out.push(format!(
    "Risk level {} of 5 ({}): {}% premium surcharge, {}% wellness discount",
    result.risk_level,
    result.risk_category.as_str(),
    result.premium_surcharge_percentage,
    result.discount_percentage
  ));

  // Suggestions: what one more workout day per week would change.
  if profile.exercise_days_per_week < 7.0 {
    let mut more = profile.clone();
    more.exercise_days_per_week = (profile.exercise_days_per_week + 1.0).min(7.0);
    if let Ok(next) = scorer.compute_risk(&more, None) {
      let points = ((result.adjusted_risk_score - next.adjusted_risk_score) * 100.0).round();
      if points >= 1.0 {
        let mut line = format!(
          "Adding one more workout day per week lowers your risk score by {:.0} points",
          points
        );
        if next.risk_level < result.risk_level {
          line.push_str(&format!(" and moves you to level {}", next.risk_level));
        }
        out.push(line);
      }
    }
  }
  if result.bmi_deviation_factor >= 0.5 {
    out.push(format!(
      "Moving your BMI toward {:.1} has the largest effect on your score",
      scorer.config().optimal_bmi
    ));
  }

  out
}
