//! Profile store seam. The real store is the app's database; the engine only
//! sees this trait.

use std::collections::HashMap;
use uuid::Uuid;

use crate::error::EngineError;
use crate::types::InboundProfile;

pub trait ProfileStore {
  /// `Ok(None)` when the user has no health profile yet.
  fn health_profile(&self, user_id: &Uuid) -> Result<Option<InboundProfile>, EngineError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryProfileStore {
  profiles: HashMap<Uuid, InboundProfile>,
}

impl InMemoryProfileStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, user_id: Uuid, profile: InboundProfile) -> Option<InboundProfile> {
    self.profiles.insert(user_id, profile)
  }
}

impl ProfileStore for InMemoryProfileStore {
  fn health_profile(&self, user_id: &Uuid) -> Result<Option<InboundProfile>, EngineError> {
    Ok(self.profiles.get(user_id).cloned())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn returns_inserted_profile() {
    let mut store = InMemoryProfileStore::new();
    let id = Uuid::new_v4();
    let profile = InboundProfile {
      age: Some(41),
      ..Default::default()
    };
    assert!(store.insert(id, profile.clone()).is_none());
    assert_eq!(store.health_profile(&id).unwrap(), Some(profile));
    assert_eq!(store.health_profile(&Uuid::new_v4()).unwrap(), None);
  }
}
