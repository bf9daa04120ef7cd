//! Discount ledger drafts. The engine computes the event; callers persist it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::types::RiskResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
  /// From the core risk tier, the same tier plans are ranked on.
  RiskTier,
}

impl DiscountType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::RiskTier => "risk_tier",
    }
  }
}

/// One row for the append-only discount ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountEvent {
  pub id: String,
  pub user_id: Uuid,
  pub plan_id: String,
  pub discount_type: DiscountType,
  /// Discount in whole percent.
  pub amount: u8,
  pub reason: String,
  pub timestamp: DateTime<Utc>,
}

/// Stable event id: `disc-` + 16 hex chars of blake3(user|plan|type|timestamp).
pub fn event_id(
  user_id: &Uuid,
  plan_id: &str,
  discount_type: DiscountType,
  timestamp: &DateTime<Utc>,
) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(user_id.as_bytes());
  hasher.update(b"|");
  hasher.update(plan_id.as_bytes());
  hasher.update(b"|");
  hasher.update(discount_type.as_str().as_bytes());
  hasher.update(b"|");
  hasher.update(
    timestamp
      .to_rfc3339_opts(SecondsFormat::Millis, true)
      .as_bytes(),
  );
  let hex = hasher.finalize().to_hex();
  format!("disc-{}", &hex[..16])
}

/// Build a draft; a zero discount is not an event.
pub fn draft(
  user_id: Uuid,
  plan_id: &str,
  discount_type: DiscountType,
  amount: u8,
  reason: impl Into<String>,
  timestamp: DateTime<Utc>,
) -> Option<DiscountEvent> {
  if amount == 0 {
    return None;
  }
  Some(DiscountEvent {
    id: event_id(&user_id, plan_id, discount_type, &timestamp),
    user_id,
    plan_id: plan_id.to_string(),
    discount_type,
    amount,
    reason: reason.into(),
    timestamp,
  })
}

/// Draft for the core risk tier discount.
pub fn draft_for_result(
  user_id: Uuid,
  plan_id: &str,
  result: &RiskResult,
  timestamp: DateTime<Utc>,
) -> Option<DiscountEvent> {
  draft(
    user_id,
    plan_id,
    DiscountType::RiskTier,
    result.discount_percentage,
    format!(
      "Risk level {} ({} risk, score {:.2})",
      result.risk_level,
      result.risk_category.as_str(),
      result.adjusted_risk_score
    ),
    timestamp,
  )
}

/// Destination for discount events, owned by the persistence layer.
pub trait DiscountLedger {
  fn record(&mut self, event: DiscountEvent) -> Result<(), EngineError>;
}

/// Append-only in-process ledger.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
  events: Vec<DiscountEvent>,
}

impl InMemoryLedger {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn events(&self) -> &[DiscountEvent] {
    &self.events
  }

  pub fn total_for_user(&self, user_id: &Uuid) -> u32 {
    self
      .events
      .iter()
      .filter(|e| e.user_id == *user_id)
      .map(|e| u32::from(e.amount))
      .sum()
  }
}

impl DiscountLedger for InMemoryLedger {
  fn record(&mut self, event: DiscountEvent) -> Result<(), EngineError> {
    if self.events.iter().any(|e| e.id == event.id) {
      return Err(EngineError::store(format!("duplicate discount event {}", event.id)));
    }
    self.events.push(event);
    Ok(())
  }
}
