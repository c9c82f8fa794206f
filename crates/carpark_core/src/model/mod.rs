//! Domain records for the car park store.
//!
//! # Responsibility
//! - Define the shapes persisted in `Car`, `CarPark` and `Cars_Id`.
//!
//! # Invariants
//! - Identities are assigned by the store and never reused or mutated.

pub mod car;
pub mod car_park;
