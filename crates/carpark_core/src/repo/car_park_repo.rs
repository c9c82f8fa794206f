//! Car park and association persistence.
//!
//! # Responsibility
//! - Insert car parks and `Cars_Id` association rows.
//!
//! # Invariants
//! - Association writes rely on `foreign_keys=ON`; a reference to a missing
//!   car or car park fails with a storage error rather than being stored.
//! - Deleting a car does not cascade to its association rows.

use crate::model::car::CarId;
use crate::model::car_park::{CarPark, CarParkAssignment, CarParkId};
use crate::repo::car_repo::RepoResult;
use rusqlite::{params, Connection};

/// SQLite-backed car park repository.
pub struct SqliteCarParkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCarParkRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Inserts a car park and returns it with its store-assigned identity.
    pub fn insert_car_park(&self, name: &str) -> RepoResult<CarPark> {
        self.conn
            .execute("INSERT INTO CarPark (car_park_name) VALUES (?1);", [name])?;

        Ok(CarPark {
            car_park_id: CarParkId(self.conn.last_insert_rowid()),
            car_park_name: name.to_string(),
        })
    }

    /// Records that `car_id` is parked in `car_park_id`.
    pub fn assign_car(
        &self,
        car_park_id: CarParkId,
        car_id: CarId,
    ) -> RepoResult<CarParkAssignment> {
        self.conn.execute(
            "INSERT INTO Cars_Id (cars_park_id, car_id) VALUES (?1, ?2);",
            params![car_park_id.0, car_id.0],
        )?;

        Ok(CarParkAssignment {
            car_park_id,
            car_id,
        })
    }

    /// Lists association rows ordered by car park, then car.
    pub fn list_assignments(&self) -> RepoResult<Vec<CarParkAssignment>> {
        let mut stmt = self.conn.prepare(
            "SELECT cars_park_id, car_id
             FROM Cars_Id
             ORDER BY cars_park_id ASC, car_id ASC;",
        )?;
        let assignments = stmt
            .query_map([], |row| {
                Ok(CarParkAssignment {
                    car_park_id: CarParkId(row.get(0)?),
                    car_id: CarId(row.get(1)?),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(assignments)
    }
}
