//! YouMatter risk engine — consolidated risk & discount scoring; no DB, no network.
//!
//! Normalizes a health profile, computes a bounded risk score and 5-tier level,
//! prices it under both the surcharge and discount conventions, ranks insurance
//! plans against the result, and drafts discount ledger events for the caller.
//!
//! Used by the binary for stdin/stdout; can also be called as a library.

pub mod catalog;
pub mod comprehensive;
pub mod config;
pub mod engine;
pub mod error;
pub mod explain;
pub mod ledger;
pub mod matcher;
pub mod normalize;
pub mod scorer;
pub mod store;
pub mod telemetry;
pub mod tier;
pub mod types;

pub use catalog::{InsurancePlan, PlanCatalog, SharedCatalog};
pub use config::{AppConfig, ScoringConfig};
pub use engine::Engine;
pub use error::{EngineError, ProfileField};
pub use matcher::{PlanMatch, PlanMatcher};
pub use scorer::RiskScorer;
pub use types::{Assessment, AssessmentRequest, HealthProfile, InboundProfile, RiskReport, RiskResult};
