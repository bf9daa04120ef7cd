//! Core engine: normalize -> score -> match -> explain for one request.

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::catalog::{PlanCatalog, SharedCatalog};
use crate::config::ScoringConfig;
use crate::error::{EngineError, ProfileField};
use crate::explain;
use crate::ledger::{self, DiscountLedger};
use crate::matcher::PlanMatcher;
use crate::normalize;
use crate::scorer::RiskScorer;
use crate::store::ProfileStore;
use crate::types::*;

/// The risk engine. Holds only the validated scoring config and the current
/// plan catalog; every call is otherwise independent.
#[derive(Debug, Default)]
pub struct Engine {
  scorer: RiskScorer,
  matcher: PlanMatcher,
  catalog: SharedCatalog,
}

impl Engine {
  pub fn new(config: ScoringConfig, catalog: PlanCatalog) -> Result<Self, EngineError> {
    Ok(Self {
      scorer: RiskScorer::try_new(config)?,
      matcher: PlanMatcher,
      catalog: SharedCatalog::new(catalog),
    })
  }

  /// Default scoring constants and the built-in catalog.
  pub fn with_defaults() -> Self {
    Self::default()
  }

  pub fn scorer(&self) -> &RiskScorer {
    &self.scorer
  }

  pub fn catalog(&self) -> Arc<PlanCatalog> {
    self.catalog.snapshot()
  }

  /// Swap in a new catalog; in-flight requests keep their snapshot.
  pub fn replace_catalog(&self, catalog: PlanCatalog) -> Arc<PlanCatalog> {
    self.catalog.replace(catalog)
  }

  /// Score one inbound profile (no plan matching).
  pub fn score(
    &self,
    raw: &InboundProfile,
    base_premium: Option<f64>,
    as_of: NaiveDate,
  ) -> Result<RiskReport, EngineError> {
    let profile = normalize::normalize(raw, as_of)?;
    let result = self.scorer.compute_risk(&profile, base_premium)?;
    Ok(explain::report(&result))
  }

  /// Full assessment for one request. `now` fixes both the age reference date
  /// and the discount event timestamp, so output is reproducible.
  pub fn assess(
    &self,
    request: &AssessmentRequest,
    now: DateTime<Utc>,
  ) -> Result<Assessment, EngineError> {
    let profile = normalize::normalize(&request.profile, now.date_naive())?;
    let result = self.scorer.compute_risk(&profile, request.base_premium)?;

    let comprehensive = if profile.has_lifestyle_data() {
      Some(self.scorer.comprehensive_from(&result, &profile))
    } else {
      None
    };

    let catalog = self.catalog.snapshot();
    let plans = self.matcher.match_plans(&result, request.user_level, &catalog);
    let explanations = explain::explanations(&self.scorer, &profile, &result);

    // Draft from the core tier, the one plans were ranked on. The caller
    // decides whether to record it.
    let discount_event = match (request.user_id, plans.iter().find(|p| p.recommended)) {
      (Some(user_id), Some(top)) => ledger::draft_for_result(user_id, &top.plan_id, &result, now),
      _ => None,
    };

    tracing::debug!(
      level = result.risk_level.get(),
      plans = plans.len(),
      drafted = discount_event.is_some(),
      "assessment complete"
    );

    Ok(Assessment {
      report: explain::report(&result),
      comprehensive,
      plans,
      explanations,
      discount_event,
    })
  }

  /// Fetch the user's profile from `store` and assess it. A user with no
  /// profile at all is reported as missing every required field.
  pub fn assess_user<S: ProfileStore + ?Sized>(
    &self,
    store: &S,
    user_id: Uuid,
    user_level: u32,
    base_premium: Option<f64>,
    now: DateTime<Utc>,
  ) -> Result<Assessment, EngineError> {
    let profile = store.health_profile(&user_id)?.ok_or_else(|| {
      tracing::warn!(%user_id, "no health profile on file");
      EngineError::incomplete(ProfileField::ALL.to_vec())
    })?;
    let request = AssessmentRequest {
      profile,
      user_level,
      base_premium,
      user_id: Some(user_id),
    };
    self.assess(&request, now)
  }

  /// Record a drafted discount, if any. Returns whether an event was written.
  pub fn record_discount<L: DiscountLedger + ?Sized>(
    &self,
    ledger: &mut L,
    assessment: &Assessment,
  ) -> Result<bool, EngineError> {
    match &assessment.discount_event {
      Some(event) => {
        ledger.record(event.clone())?;
        Ok(true)
      }
      None => Ok(false),
    }
  }
}
