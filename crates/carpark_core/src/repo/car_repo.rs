//! Car repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/delete/list/get over the `Car` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Each public method runs exactly one statement.
//! - `list_cars` returns rows ordered by `car_id` ascending.
//! - Read paths reject NULL attributes instead of masking them.

use crate::db::DbError;
use crate::model::car::{Car, CarId, NewCar};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CAR_SELECT_SQL: &str = "SELECT car_id, car_brand, color, year FROM Car";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for car park store operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(CarId),
    InvalidData(String),
}

impl RepoError {
    /// Returns whether the underlying storage failure is lock contention.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Db(err) => err.is_transient(),
            Self::NotFound(_) | Self::InvalidData(_) => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "car not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted car data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for car CRUD operations.
pub trait CarRepository {
    fn insert_car(&self, car: &NewCar) -> RepoResult<Car>;
    fn delete_car(&self, id: CarId) -> RepoResult<()>;
    fn get_car(&self, id: CarId) -> RepoResult<Option<Car>>;
    fn list_cars(&self) -> RepoResult<Vec<Car>>;
}

/// SQLite-backed car repository.
pub struct SqliteCarRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCarRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CarRepository for SqliteCarRepository<'_> {
    fn insert_car(&self, car: &NewCar) -> RepoResult<Car> {
        self.conn.execute(
            "INSERT INTO Car (car_brand, color, year) VALUES (?1, ?2, ?3);",
            params![car.car_brand.as_str(), car.color.as_str(), car.year],
        )?;

        Ok(car.clone().into_car(CarId(self.conn.last_insert_rowid())))
    }

    fn delete_car(&self, id: CarId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM Car WHERE car_id = ?1;", [id.0])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn get_car(&self, id: CarId) -> RepoResult<Option<Car>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CAR_SELECT_SQL} WHERE car_id = ?1;"))?;

        let mut rows = stmt.query([id.0])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_car_row(row)?));
        }

        Ok(None)
    }

    fn list_cars(&self) -> RepoResult<Vec<Car>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CAR_SELECT_SQL} ORDER BY car_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut cars = Vec::new();

        while let Some(row) = rows.next()? {
            cars.push(parse_car_row(row)?);
        }

        Ok(cars)
    }
}

fn parse_car_row(row: &Row<'_>) -> RepoResult<Car> {
    let car_id = CarId(row.get("car_id")?);

    Ok(Car {
        car_id,
        car_brand: required_column(row, "car_brand", car_id)?,
        color: required_column(row, "color", car_id)?,
        year: required_column(row, "year", car_id)?,
    })
}

fn required_column<T: rusqlite::types::FromSql>(
    row: &Row<'_>,
    column: &str,
    car_id: CarId,
) -> RepoResult<T> {
    row.get::<_, Option<T>>(column)?.ok_or_else(|| {
        RepoError::InvalidData(format!("NULL value in Car.{column} for car_id {car_id}"))
    })
}
