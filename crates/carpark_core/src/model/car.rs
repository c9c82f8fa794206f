//! Car domain model.
//!
//! # Invariants
//! - `car_id` is store-assigned, unique, and stable for the row lifetime.
//! - Cars are created and deleted, never updated in place.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned identity of a `Car` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(pub i64);

impl Display for CarId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted car record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub car_id: CarId,
    pub car_brand: String,
    pub color: String,
    pub year: i64,
}

/// Car attributes before the store assigns an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCar {
    pub car_brand: String,
    pub color: String,
    pub year: i64,
}

impl NewCar {
    pub fn new(car_brand: impl Into<String>, color: impl Into<String>, year: i64) -> Self {
        Self {
            car_brand: car_brand.into(),
            color: color.into(),
            year,
        }
    }

    /// Binds this draft to the identity the store assigned.
    pub fn into_car(self, car_id: CarId) -> Car {
        Car {
            car_id,
            car_brand: self.car_brand,
            color: self.color,
            year: self.year,
        }
    }
}
