//! Structured error types for the risk engine.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Message shown to the user when required health data is missing.
pub const INCOMPLETE_PROFILE_MESSAGE: &str =
  "Complete your health profile to see your personalized risk assessment";

/// Profile fields the risk formula cannot work without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
  Age,
  HeightCm,
  WeightKg,
}

impl ProfileField {
  pub const ALL: [ProfileField; 3] = [Self::Age, Self::HeightCm, Self::WeightKg];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Age => "age",
      Self::HeightCm => "heightCm",
      Self::WeightKg => "weightKg",
    }
  }
}

impl fmt::Display for ProfileField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("incomplete profile: missing or non-positive {}", join_fields(.missing))]
  IncompleteProfile { missing: Vec<ProfileField> },

  #[error("validation: {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("config: {0}")]
  Config(String),

  #[error("catalog: {0}")]
  Catalog(String),

  #[error("profile store: {0}")]
  Store(String),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),
}

fn join_fields(fields: &[ProfileField]) -> String {
  fields
    .iter()
    .map(|f| f.as_str())
    .collect::<Vec<_>>()
    .join(", ")
}

impl EngineError {
  pub fn incomplete(missing: Vec<ProfileField>) -> Self {
    Self::IncompleteProfile { missing }
  }

  pub fn validation(field: &str, reason: &str) -> Self {
    Self::Validation {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }

  pub fn catalog(msg: impl Into<String>) -> Self {
    Self::Catalog(msg.into())
  }

  pub fn store(msg: impl Into<String>) -> Self {
    Self::Store(msg.into())
  }

  /// Short machine-readable kind, used in structured error output.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::IncompleteProfile { .. } => "incomplete_profile",
      Self::Validation { .. } => "validation",
      Self::Config(_) => "config",
      Self::Catalog(_) => "catalog",
      Self::Store(_) => "store",
      Self::Json(_) => "json",
      Self::Io(_) => "io",
    }
  }

  /// Process exit code for the binary: 2 when the input was rejected, 1 when
  /// the engine could not run.
  pub fn exit_code(&self) -> u8 {
    match self {
      Self::IncompleteProfile { .. } | Self::Validation { .. } => 2,
      _ => 1,
    }
  }

  /// Text suitable for showing to the end user.
  pub fn user_message(&self) -> String {
    match self {
      Self::IncompleteProfile { .. } => INCOMPLETE_PROFILE_MESSAGE.to_string(),
      other => other.to_string(),
    }
  }
}
