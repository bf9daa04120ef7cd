//! Core types for the risk engine (JSON contracts + internal models).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use crate::comprehensive::ComprehensiveRisk;
use crate::error::EngineError;
use crate::ledger::DiscountEvent;
use crate::matcher::PlanMatch;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the caller sends)
// ---------------------------------------------------------------------------

/// A health profile as stored by the app. Every field is optional on the wire;
/// `normalize` decides what is missing. Unknown fields are silently ignored.
///
/// Exercise may arrive as days per week, a frequency word, or a count of
/// challenges completed this week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundProfile {
  #[serde(default)]
  pub age: Option<i64>,
  #[serde(default, alias = "height_cm")]
  pub height_cm: Option<f64>,
  #[serde(default, alias = "weight_kg")]
  pub weight_kg: Option<f64>,
  /// `YYYY-MM-DD` or RFC 3339; used when `age` is absent.
  #[serde(default, alias = "date_of_birth")]
  pub date_of_birth: Option<String>,
  #[serde(
    default,
    alias = "exercise_days_per_week",
    alias = "workoutDaysPerWeek",
    alias = "workout_days_per_week"
  )]
  pub exercise_days_per_week: Option<f64>,
  #[serde(default, alias = "exercise_frequency")]
  pub exercise_frequency: Option<String>,
  #[serde(default, alias = "weekly_challenge_completions")]
  pub weekly_challenge_completions: Option<u32>,
  #[serde(default, alias = "chronic_conditions")]
  pub chronic_conditions: Vec<String>,
  #[serde(default, alias = "smoking_status")]
  pub smoking_status: Option<String>,
  #[serde(default)]
  pub occupation: Option<String>,
}

/// One assessment request (binary `assess` command, `Engine::assess`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
  pub profile: InboundProfile,
  /// Gamification level from the points ladder.
  #[serde(default = "default_user_level")]
  pub user_level: u32,
  #[serde(default)]
  pub base_premium: Option<f64>,
  /// When present, a discount ledger draft is produced for the top plan.
  #[serde(default)]
  pub user_id: Option<Uuid>,
}

fn default_user_level() -> u32 {
  1
}

// ---------------------------------------------------------------------------
// Normalized enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseFrequency {
  None,
  Light,
  Moderate,
  Heavy,
}

impl ExerciseFrequency {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
      "none" | "sedentary" | "never" => Some(Self::None),
      "light" | "low" => Some(Self::Light),
      "moderate" | "medium" => Some(Self::Moderate),
      "heavy" | "high" | "active" | "very_active" => Some(Self::Heavy),
      _ => None,
    }
  }

  /// Representative days per week on the canonical 0–7 scale.
  pub fn days_per_week(self) -> f64 {
    match self {
      Self::None => 0.0,
      Self::Light => 2.0,
      Self::Moderate => 4.0,
      Self::Heavy => 6.0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmokingStatus {
  Never,
  Former,
  Current,
}

impl SmokingStatus {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "never" | "non-smoker" | "nonsmoker" | "no" | "false" => Some(Self::Never),
      "former" | "ex" | "ex-smoker" | "quit" => Some(Self::Former),
      "current" | "smoker" | "yes" | "true" => Some(Self::Current),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupationCategory {
  Sedentary,
  Manual,
  Hazardous,
}

impl OccupationCategory {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "sedentary" | "office" | "desk" => Some(Self::Sedentary),
      "manual" | "physical" | "labor" | "labour" => Some(Self::Manual),
      "hazardous" | "high-risk" | "high_risk" | "dangerous" => Some(Self::Hazardous),
      _ => None,
    }
  }
}

// ---------------------------------------------------------------------------
// Internal normalized profile
// ---------------------------------------------------------------------------

/// Canonical profile after normalization. `RiskScorer` still rejects
/// non-positive measurements, so constructing one directly is safe.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthProfile {
  pub age: u32,
  pub height_cm: f64,
  pub weight_kg: f64,
  /// Canonical 0–7 scale.
  pub exercise_days_per_week: f64,
  /// Lowercased, de-duplicated.
  pub chronic_conditions: BTreeSet<String>,
  pub smoking: Option<SmokingStatus>,
  pub occupation: Option<OccupationCategory>,
}

impl HealthProfile {
  pub fn new(age: u32, height_cm: f64, weight_kg: f64, exercise_days_per_week: f64) -> Self {
    Self {
      age,
      height_cm,
      weight_kg,
      exercise_days_per_week,
      chronic_conditions: BTreeSet::new(),
      smoking: None,
      occupation: None,
    }
  }

  /// True when any input of the comprehensive variant is present.
  pub fn has_lifestyle_data(&self) -> bool {
    !self.chronic_conditions.is_empty() || self.smoking.is_some() || self.occupation.is_some()
  }
}

// ---------------------------------------------------------------------------
// Risk level / category
// ---------------------------------------------------------------------------

/// Discrete tier, 1 = lowest risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RiskLevel(u8);

impl RiskLevel {
  pub fn from_index(index: usize) -> Self {
    Self(index as u8 + 1)
  }

  pub fn get(self) -> u8 {
    self.0
  }

  pub fn category(self) -> RiskCategory {
    match self.0 {
      0..=2 => RiskCategory::Low,
      3 => RiskCategory::Moderate,
      _ => RiskCategory::High,
    }
  }
}

impl fmt::Display for RiskLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
  Low,
  Moderate,
  High,
}

impl RiskCategory {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Moderate => "moderate",
      Self::High => "high",
    }
  }
}

// ---------------------------------------------------------------------------
// Risk result (full precision)
// ---------------------------------------------------------------------------

/// Output of `RiskScorer::compute_risk`. Percentages are whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
  pub age: u32,
  pub bmi: f64,
  pub bmi_deviation_factor: f64,
  pub exercise_factor: f64,
  pub base_risk_score: f64,
  pub age_factor: f64,
  pub adjusted_risk_score: f64,
  pub risk_level: RiskLevel,
  pub risk_category: RiskCategory,
  pub premium_surcharge_percentage: u8,
  pub discount_percentage: u8,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub final_premium: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub discounted_premium: Option<f64>,
}

// ---------------------------------------------------------------------------
// Output types (JSON contract — what we emit)
// ---------------------------------------------------------------------------

/// Display breakdown of the score; values rounded to 3 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
  pub bmi: f64,
  pub bmi_risk: f64,
  pub fitness_risk: f64,
  pub age_risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
  pub risk_score: f64,
  pub level: RiskLevel,
  pub risk_category: RiskCategory,
  pub premium_surcharge_percentage: u8,
  pub discount_percentage: u8,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub final_premium: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub discounted_premium: Option<f64>,
  pub factors: RiskFactors,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
  pub report: RiskReport,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub comprehensive: Option<ComprehensiveRisk>,
  pub plans: Vec<PlanMatch>,
  pub explanations: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub discount_event: Option<DiscountEvent>,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output written to stdout by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub kind: String,
  pub message: String,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub fields: Vec<String>,
}

impl ErrorOutput {
  pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      error: true,
      kind: kind.into(),
      message: message.into(),
      fields: Vec::new(),
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.fields.push(field.into());
    self
  }

  /// Error body for the binary; names the offending fields where known.
  pub fn from_error(err: &EngineError) -> Self {
    let out = Self::new(err.kind(), err.user_message());
    match err {
      EngineError::IncompleteProfile { missing } => missing
        .iter()
        .fold(out, |out, field| out.with_field(field.as_str())),
      EngineError::Validation { field, .. } => out.with_field(field.clone()),
      _ => out,
    }
  }
}
