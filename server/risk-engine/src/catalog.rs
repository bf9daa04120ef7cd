//! Insurance plan catalog: read-only at scoring time, swapped whole on update.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::EngineError;
use crate::types::RiskCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
  #[serde(rename = "18-30")]
  UpTo30,
  #[serde(rename = "31-45")]
  From31To45,
  #[serde(rename = "46-60")]
  From46To60,
  #[serde(rename = "60+")]
  Over60,
}

impl AgeGroup {
  /// Ages under 18 fall in the youngest group.
  pub fn for_age(age: u32) -> Self {
    match age {
      0..=30 => Self::UpTo30,
      31..=45 => Self::From31To45,
      46..=60 => Self::From46To60,
      _ => Self::Over60,
    }
  }
}

/// Coverage amounts in the plan's currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Coverage {
  pub hospital_care: f64,
  pub outpatient_care: f64,
  pub prescriptions: f64,
  pub wellness: f64,
}

/// One plan offering. Empty `age_groups` / `risk_categories` mean "no constraint".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePlan {
  pub id: String,
  pub name: String,
  pub category: String,
  pub base_premium: f64,
  #[serde(default)]
  pub coverage: Coverage,
  #[serde(default)]
  pub age_groups: Vec<AgeGroup>,
  #[serde(default)]
  pub risk_categories: Vec<RiskCategory>,
  #[serde(default = "default_min_level")]
  pub min_level: u32,
  #[serde(default)]
  pub popular: bool,
  #[serde(default)]
  pub features: Vec<String>,
}

fn default_min_level() -> u32 {
  1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanCatalog {
  plans: Vec<InsurancePlan>,
}

impl PlanCatalog {
  /// Build a catalog, rejecting empty or duplicate plan ids.
  pub fn new(plans: Vec<InsurancePlan>) -> Result<Self, EngineError> {
    let mut seen = HashSet::new();
    for plan in &plans {
      if plan.id.trim().is_empty() {
        return Err(EngineError::catalog("plan id must not be empty"));
      }
      if !seen.insert(plan.id.as_str()) {
        return Err(EngineError::catalog(format!("duplicate plan id {}", plan.id)));
      }
    }
    Ok(Self { plans })
  }

  /// Accepts either `{"plans": [...]}` or a bare array.
  pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Shape {
      Bare(Vec<InsurancePlan>),
      Wrapped { plans: Vec<InsurancePlan> },
    }
    let shape: Shape = serde_json::from_str(raw)?;
    let plans = match shape {
      Shape::Wrapped { plans } => plans,
      Shape::Bare(plans) => plans,
    };
    Self::new(plans)
  }

  pub fn load(path: &Path) -> Result<Self, EngineError> {
    let raw = std::fs::read_to_string(path)?;
    Self::from_json_str(&raw)
  }

  pub fn plans(&self) -> &[InsurancePlan] {
    &self.plans
  }

  pub fn get(&self, id: &str) -> Option<&InsurancePlan> {
    self.plans.iter().find(|p| p.id == id)
  }

  pub fn len(&self) -> usize {
    self.plans.len()
  }

  pub fn is_empty(&self) -> bool {
    self.plans.is_empty()
  }

  /// Default offerings shipped with the app.
  pub fn builtin() -> Self {
    let plan = |id: &str,
                name: &str,
                category: &str,
                base_premium: f64,
                hospital_care: f64,
                age_groups: &[AgeGroup],
                risk_categories: &[RiskCategory],
                min_level: u32,
                popular: bool,
                features: &[&str]| InsurancePlan {
      id: id.to_string(),
      name: name.to_string(),
      category: category.to_string(),
      base_premium,
      coverage: Coverage {
        hospital_care,
        outpatient_care: hospital_care / 10.0,
        prescriptions: hospital_care / 20.0,
        wellness: if features.iter().any(|f| f.contains("wellness")) { 500.0 } else { 0.0 },
      },
      age_groups: age_groups.to_vec(),
      risk_categories: risk_categories.to_vec(),
      min_level,
      popular,
      features: features.iter().map(|f| f.to_string()).collect(),
    };

    use AgeGroup::*;
    use RiskCategory::*;
    Self {
      plans: vec![
        plan(
          "basic-health",
          "Basic Health",
          "health",
          89.0,
          50_000.0,
          &[],
          &[],
          1,
          false,
          &["hospital care", "emergency cover"],
        ),
        plan(
          "active-life",
          "Active Life",
          "health",
          119.0,
          100_000.0,
          &[UpTo30, From31To45],
          &[Low],
          2,
          true,
          &["fitness tracker rewards", "wellness program", "preventive checkups"],
        ),
        plan(
          "family-plus",
          "Family Plus",
          "family",
          189.0,
          250_000.0,
          &[From31To45, From46To60],
          &[Low, Moderate],
          3,
          true,
          &["pediatric care", "maternity", "preventive checkups"],
        ),
        plan(
          "chronic-care-plus",
          "Chronic Care Plus",
          "health",
          229.0,
          300_000.0,
          &[From46To60, Over60],
          &[Moderate, High],
          1,
          true,
          &["chronic condition management", "specialist network", "annual health screening"],
        ),
        plan(
          "senior-secure",
          "Senior Secure",
          "senior",
          259.0,
          300_000.0,
          &[Over60],
          &[],
          1,
          false,
          &["senior home care", "specialist network", "annual health screening"],
        ),
      ],
    }
  }
}

/// Shared, swappable catalog. Readers take an `Arc` snapshot and keep using it
/// even if a new catalog is installed mid-request.
#[derive(Debug)]
pub struct SharedCatalog {
  current: RwLock<Arc<PlanCatalog>>,
}

impl SharedCatalog {
  pub fn new(catalog: PlanCatalog) -> Self {
    Self {
      current: RwLock::new(Arc::new(catalog)),
    }
  }

  pub fn snapshot(&self) -> Arc<PlanCatalog> {
    Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
  }

  /// Install a new catalog, returning the previous one.
  pub fn replace(&self, catalog: PlanCatalog) -> Arc<PlanCatalog> {
    let next = Arc::new(catalog);
    let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
    tracing::debug!(plans = next.len(), "replacing plan catalog");
    std::mem::replace(&mut *guard, next)
  }
}

impl Default for SharedCatalog {
  fn default() -> Self {
    Self::new(PlanCatalog::builtin())
  }
}
