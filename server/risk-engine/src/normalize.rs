//! Normalize inbound profiles into the canonical HealthProfile.

use chrono::{DateTime, NaiveDate};
use std::collections::BTreeSet;

use crate::error::{EngineError, ProfileField};
use crate::types::*;

/// Upper end of the canonical exercise scale.
pub const MAX_EXERCISE_DAYS: f64 = 7.0;

/// Validate required measurements and convert every exercise shape to days per week.
///
/// Missing or non-positive age/height/weight are collected and reported together
/// as `IncompleteProfile`. Nothing is defaulted. A bad date of birth is only
/// reported once the other required fields are present.
pub fn normalize(raw: &InboundProfile, as_of: NaiveDate) -> Result<HealthProfile, EngineError> {
  let mut missing = Vec::new();

  let age = resolve_age(raw, as_of);
  if matches!(age, Ok(None)) {
    missing.push(ProfileField::Age);
  }
  let height_cm = raw.height_cm.filter(|h| *h > 0.0);
  if height_cm.is_none() {
    missing.push(ProfileField::HeightCm);
  }
  let weight_kg = raw.weight_kg.filter(|w| *w > 0.0);
  if weight_kg.is_none() {
    missing.push(ProfileField::WeightKg);
  }

  if !missing.is_empty() {
    tracing::warn!(missing = ?missing, "rejecting incomplete health profile");
    return Err(EngineError::incomplete(missing));
  }
  let (age, height_cm, weight_kg) = match (age?, height_cm, weight_kg) {
    (Some(a), Some(h), Some(w)) => (a, h, w),
    _ => return Err(EngineError::incomplete(ProfileField::ALL.to_vec())),
  };

  let smoking = match &raw.smoking_status {
    Some(s) if !s.trim().is_empty() => Some(
      SmokingStatus::from_str_loose(s)
        .ok_or_else(|| EngineError::validation("smokingStatus", "expected never|former|current"))?,
    ),
    _ => None,
  };

  let occupation = match &raw.occupation {
    Some(s) if !s.trim().is_empty() => Some(OccupationCategory::from_str_loose(s).ok_or_else(
      || EngineError::validation("occupation", "expected sedentary|manual|hazardous"),
    )?),
    _ => None,
  };

  Ok(HealthProfile {
    age,
    height_cm,
    weight_kg,
    exercise_days_per_week: exercise_days(raw)?,
    chronic_conditions: normalize_conditions(&raw.chronic_conditions),
    smoking,
    occupation,
  })
}

/// Explicit age wins; otherwise whole years since date of birth as of `as_of`.
/// `Ok(None)` means the age is missing or not positive. Ages past `u32::MAX`
/// saturate.
fn resolve_age(raw: &InboundProfile, as_of: NaiveDate) -> Result<Option<u32>, EngineError> {
  if let Some(age) = raw.age {
    return Ok(
      Some(age)
        .filter(|a| *a > 0)
        .map(|a| u32::try_from(a).unwrap_or(u32::MAX)),
    );
  }
  let dob = match raw.date_of_birth.as_deref().map(str::trim) {
    Some(s) if !s.is_empty() => parse_date(s)?,
    _ => return Ok(None),
  };
  let years = as_of
    .years_since(dob)
    .ok_or_else(|| EngineError::validation("dateOfBirth", "must not be in the future"))?;
  Ok(Some(years).filter(|a| *a > 0))
}

fn parse_date(s: &str) -> Result<NaiveDate, EngineError> {
  if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    return Ok(d);
  }
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.date_naive())
    .map_err(|e| {
      EngineError::validation(
        "dateOfBirth",
        &format!("expected YYYY-MM-DD or RFC3339: {}", e),
      )
    })
}

/// Exercise shape precedence: days per week, then frequency word, then weekly
/// challenge completions. Absent means no exercise.
pub fn exercise_days(raw: &InboundProfile) -> Result<f64, EngineError> {
  if let Some(days) = raw.exercise_days_per_week {
    return Ok(clamp_days(days));
  }
  if let Some(word) = raw.exercise_frequency.as_deref().filter(|w| !w.trim().is_empty()) {
    return ExerciseFrequency::from_str_loose(word)
      .map(ExerciseFrequency::days_per_week)
      .ok_or_else(|| {
        EngineError::validation("exerciseFrequency", "expected none|light|moderate|heavy")
      });
  }
  if let Some(count) = raw.weekly_challenge_completions {
    return Ok(clamp_days(count as f64));
  }
  Ok(0.0)
}

/// Clamp to 0–7; NaN counts as no exercise.
pub fn clamp_days(days: f64) -> f64 {
  days.max(0.0).min(MAX_EXERCISE_DAYS)
}

fn normalize_conditions(conditions: &[String]) -> BTreeSet<String> {
  conditions
    .iter()
    .map(|c| c.trim().to_lowercase())
    .filter(|c| !c.is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
  }

  fn complete() -> InboundProfile {
    InboundProfile {
      age: Some(30),
      height_cm: Some(170.0),
      weight_kg: Some(65.0),
      exercise_days_per_week: Some(4.0),
      ..Default::default()
    }
  }

  #[test]
  fn normalize_valid_profile() {
    let p = normalize(&complete(), as_of()).unwrap();
    assert_eq!(p.age, 30);
    assert_eq!(p.height_cm, 170.0);
    assert_eq!(p.weight_kg, 65.0);
    assert_eq!(p.exercise_days_per_week, 4.0);
    assert!(!p.has_lifestyle_data());
  }

  #[test]
  fn missing_weight_is_incomplete() {
    let raw = InboundProfile {
      weight_kg: None,
      ..complete()
    };
    match normalize(&raw, as_of()).unwrap_err() {
      EngineError::IncompleteProfile { missing } => {
        assert_eq!(missing, vec![ProfileField::WeightKg])
      }
      other => panic!("unexpected error: {}", other),
    }
  }

  #[test]
  fn zero_and_negative_values_are_incomplete() {
    let raw = InboundProfile {
      age: Some(0),
      height_cm: Some(-170.0),
      weight_kg: Some(0.0),
      ..Default::default()
    };
    match normalize(&raw, as_of()).unwrap_err() {
      EngineError::IncompleteProfile { missing } => {
        assert_eq!(missing, ProfileField::ALL.to_vec())
      }
      other => panic!("unexpected error: {}", other),
    }
  }

  #[test]
  fn nan_height_is_incomplete() {
    let raw = InboundProfile {
      height_cm: Some(f64::NAN),
      ..complete()
    };
    assert!(matches!(
      normalize(&raw, as_of()),
      Err(EngineError::IncompleteProfile { .. })
    ));
  }

  #[test]
  fn age_from_date_of_birth() {
    let raw = InboundProfile {
      age: None,
      date_of_birth: Some("1990-06-02".into()),
      ..complete()
    };
    // One day before the 35th birthday.
    assert_eq!(normalize(&raw, as_of()).unwrap().age, 34);

    let raw = InboundProfile {
      age: None,
      date_of_birth: Some("1990-06-01T08:00:00Z".into()),
      ..complete()
    };
    assert_eq!(normalize(&raw, as_of()).unwrap().age, 35);
  }

  #[test]
  fn explicit_age_wins_over_date_of_birth() {
    let raw = InboundProfile {
      age: Some(40),
      date_of_birth: Some("2000-01-01".into()),
      ..complete()
    };
    assert_eq!(normalize(&raw, as_of()).unwrap().age, 40);
  }

  #[test]
  fn future_or_garbled_date_of_birth_is_validation_error() {
    let raw = InboundProfile {
      age: None,
      date_of_birth: Some("2030-01-01".into()),
      ..complete()
    };
    let err = normalize(&raw, as_of()).unwrap_err();
    assert!(err.to_string().contains("dateOfBirth"));

    let raw = InboundProfile {
      age: None,
      date_of_birth: Some("last spring".into()),
      ..complete()
    };
    assert!(matches!(
      normalize(&raw, as_of()),
      Err(EngineError::Validation { .. })
    ));
  }

  #[test]
  fn missing_weight_wins_over_bad_date_of_birth() {
    for dob in ["last spring", "2030-01-01"] {
      let raw = InboundProfile {
        age: None,
        date_of_birth: Some(dob.into()),
        weight_kg: None,
        ..complete()
      };
      match normalize(&raw, as_of()).unwrap_err() {
        EngineError::IncompleteProfile { missing } => {
          assert_eq!(missing, vec![ProfileField::WeightKg], "dob {}", dob)
        }
        other => panic!("dob {}: unexpected error: {}", dob, other),
      }
    }
  }

  #[test]
  fn huge_explicit_age_saturates() {
    let raw = InboundProfile {
      age: Some(i64::from(u32::MAX) + 10),
      ..complete()
    };
    assert_eq!(normalize(&raw, as_of()).unwrap().age, u32::MAX);

    let raw = InboundProfile {
      age: Some(-4),
      ..complete()
    };
    assert!(matches!(
      normalize(&raw, as_of()),
      Err(EngineError::IncompleteProfile { .. })
    ));
  }

  #[test]
  fn newborn_from_date_of_birth_is_incomplete() {
    let raw = InboundProfile {
      age: None,
      date_of_birth: Some("2025-01-01".into()),
      ..complete()
    };
    assert!(matches!(
      normalize(&raw, as_of()),
      Err(EngineError::IncompleteProfile { .. })
    ));
  }

  #[test]
  fn exercise_shapes_are_normalized() {
    let days = |raw: InboundProfile| exercise_days(&raw).unwrap();

    assert_eq!(days(InboundProfile { exercise_days_per_week: Some(9.0), ..Default::default() }), 7.0);
    assert_eq!(days(InboundProfile { exercise_days_per_week: Some(-2.0), ..Default::default() }), 0.0);
    assert_eq!(
      days(InboundProfile { exercise_frequency: Some("moderate".into()), ..Default::default() }),
      4.0
    );
    assert_eq!(
      days(InboundProfile { weekly_challenge_completions: Some(12), ..Default::default() }),
      7.0
    );
    assert_eq!(days(InboundProfile::default()), 0.0);
  }

  #[test]
  fn days_take_precedence_over_frequency() {
    let raw = InboundProfile {
      exercise_days_per_week: Some(1.0),
      exercise_frequency: Some("heavy".into()),
      ..Default::default()
    };
    assert_eq!(exercise_days(&raw).unwrap(), 1.0);
  }

  #[test]
  fn unknown_frequency_is_validation_error() {
    let raw = InboundProfile {
      exercise_days_per_week: None,
      exercise_frequency: Some("whenever".into()),
      ..complete()
    };
    let err = normalize(&raw, as_of()).unwrap_err();
    assert!(err.to_string().contains("exerciseFrequency"));
  }

  #[test]
  fn lifestyle_fields_are_parsed() {
    let raw = InboundProfile {
      chronic_conditions: vec!["Asthma".into(), " asthma ".into(), "".into(), "Diabetes".into()],
      smoking_status: Some("former".into()),
      occupation: Some("office".into()),
      ..complete()
    };
    let p = normalize(&raw, as_of()).unwrap();
    assert_eq!(p.chronic_conditions.len(), 2);
    assert!(p.chronic_conditions.contains("asthma"));
    assert_eq!(p.smoking, Some(SmokingStatus::Former));
    assert_eq!(p.occupation, Some(OccupationCategory::Sedentary));
    assert!(p.has_lifestyle_data());
  }

  #[test]
  fn clamp_days_handles_nan() {
    assert_eq!(clamp_days(f64::NAN), 0.0);
    assert_eq!(clamp_days(3.5), 3.5);
  }
}
