//! Car use-case service.
//!
//! # Responsibility
//! - Run each car operation on its own scoped connection under the retry
//!   executor.
//! - Collapse repository errors and retry results into `StoreOutcome`.
//!
//! # Invariants
//! - A connection lives for exactly one attempt and is dropped on every exit
//!   path of that attempt.
//! - The service never surfaces a storage error as a panic or `Err`; callers
//!   branch on the outcome variant.

use crate::db::ConnectionSource;
use crate::model::car::{Car, CarId, NewCar};
use crate::repo::car_repo::{CarRepository, RepoError, SqliteCarRepository};
use crate::service::retry::{RetryExecutor, RetryOutcome, Sleeper, ThreadSleeper};

/// Outcome of a car store operation.
#[derive(Debug)]
pub enum StoreOutcome<T> {
    Success(T),
    /// The targeted car does not exist. Not a failure.
    NotFound(CarId),
    /// Retryable storage failure that outlasted the retry budget.
    TransientFailure(RepoError),
    /// Storage failure the retry policy refused to repeat.
    PermanentFailure(RepoError),
}

impl<T> StoreOutcome<T> {
    fn from_retry(outcome: RetryOutcome<T>) -> Self {
        match outcome {
            RetryOutcome::Completed(value) => Self::Success(value),
            RetryOutcome::Failed(RepoError::NotFound(id)) => Self::NotFound(id),
            RetryOutcome::Failed(err) => Self::PermanentFailure(err),
            RetryOutcome::Exhausted { last_error, .. } => Self::TransientFailure(last_error),
        }
    }

    /// Flattens the outcome for operations where a missing car is itself a
    /// failure; `NotFound` becomes `RepoError::NotFound`.
    pub fn into_result(self) -> Result<T, RepoError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::NotFound(id) => Err(RepoError::NotFound(id)),
            Self::TransientFailure(err) | Self::PermanentFailure(err) => Err(err),
        }
    }
}

/// Use-case service for car CRUD against a connection source.
pub struct CarService<C, S = ThreadSleeper> {
    source: C,
    retry: RetryExecutor<S>,
}

impl<C: ConnectionSource, S: Sleeper> CarService<C, S> {
    pub fn new(source: C, retry: RetryExecutor<S>) -> Self {
        Self { source, retry }
    }

    /// Inserts one car and returns it with the store-assigned identity.
    pub fn add_car(&self, car: &NewCar) -> StoreOutcome<Car> {
        self.run("add_car", |repo| repo.insert_car(car))
    }

    /// Deletes the car with `id`; `NotFound` when no row matched.
    pub fn delete_car(&self, id: CarId) -> StoreOutcome<()> {
        self.run("delete_car", |repo| repo.delete_car(id))
    }

    /// Lists all cars ordered by identity ascending.
    pub fn list_cars(&self) -> StoreOutcome<Vec<Car>> {
        self.run("list_cars", |repo| repo.list_cars())
    }

    fn run<T>(
        &self,
        operation: &str,
        op: impl Fn(&SqliteCarRepository<'_>) -> Result<T, RepoError>,
    ) -> StoreOutcome<T> {
        let outcome = self.retry.run(operation, || {
            let conn = self.source.connect()?;
            let repo = SqliteCarRepository::new(&conn);
            op(&repo)
        });
        StoreOutcome::from_retry(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::StoreOutcome;
    use crate::db::DbError;
    use crate::model::car::CarId;
    use crate::repo::car_repo::RepoError;
    use crate::service::retry::RetryOutcome;

    #[test]
    fn retry_results_map_onto_outcome_variants() {
        let missing = RetryOutcome::Failed(RepoError::NotFound(CarId(3)));
        let not_found = StoreOutcome::<()>::from_retry(missing);
        assert!(matches!(not_found, StoreOutcome::NotFound(CarId(3))));

        let exhausted = StoreOutcome::<()>::from_retry(RetryOutcome::Exhausted {
            attempts: 3,
            last_error: RepoError::Db(DbError::MissingTable("Car")),
        });
        assert!(matches!(exhausted, StoreOutcome::TransientFailure(_)));

        let bad_row = RetryOutcome::Failed(RepoError::InvalidData("bad row".to_string()));
        let refused = StoreOutcome::<()>::from_retry(bad_row);
        assert!(matches!(refused, StoreOutcome::PermanentFailure(_)));
    }

    #[test]
    fn into_result_treats_not_found_as_error() {
        assert_eq!(StoreOutcome::Success(5).into_result().ok(), Some(5));

        let err = StoreOutcome::<i32>::NotFound(CarId(9))
            .into_result()
            .expect_err("missing car must be an error");
        assert!(matches!(err, RepoError::NotFound(CarId(9))));

        let failure = RepoError::InvalidData("x".to_string());
        let err = StoreOutcome::<i32>::PermanentFailure(failure)
            .into_result()
            .expect_err("failure must stay an error");
        assert!(matches!(err, RepoError::InvalidData(_)));
    }
}
