//! Car park and car-in-park association records.
//!
//! No chat command manages these yet; they exist at the store level only.

use crate::model::car::CarId;
use serde::{Deserialize, Serialize};

/// Store-assigned identity of a `CarPark` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarParkId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarPark {
    pub car_park_id: CarParkId,
    pub car_park_name: String,
}

/// One `Cars_Id` row: "this car is located in this car park".
///
/// Has no identity of its own; both sides must reference existing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarParkAssignment {
    pub car_park_id: CarParkId,
    pub car_id: CarId,
}
