use serde::{Deserialize, Serialize};

use crate::store::Keyed;

/// One pet's persisted field set.
///
/// `id` is assigned by the repository and immutable afterwards; `name` is set
/// at creation and immutable; `food` and `age` are counters mutated in place
/// by feeding and aging. `weight` is reserved: no current operation mutates it.
///
/// Liveness is derived, not stored: a pet is considered dead when `food < 0`.
/// That classification happens at read time in the service layer, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: u64,
    pub name: String,
    pub food: i64,
    pub age: i64,
    pub weight: i64,
}

impl Pet {
    /// Construct a newborn pet: all counters start at 1.
    pub fn born(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            food: 1,
            age: 1,
            weight: 1,
        }
    }

    /// Derived liveness check; `food` below zero means the pet has starved.
    pub fn is_dead(&self) -> bool {
        self.food < 0
    }
}

impl Keyed for Pet {
    fn id(&self) -> u64 {
        self.id
    }
}
