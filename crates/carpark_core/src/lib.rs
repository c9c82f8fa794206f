//! Core logic for the car park chat bot.
//! Commands in, one store operation each, reply text out.

pub mod bot;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use bot::command::{parse_command, Command, InboundCommand, InputError};
pub use bot::dispatcher::CommandDispatcher;
pub use config::{BotConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::car::{Car, CarId, NewCar};
pub use model::car_park::{CarPark, CarParkAssignment, CarParkId};
pub use repo::car_park_repo::SqliteCarParkRepository;
pub use repo::car_repo::{CarRepository, RepoError, RepoResult, SqliteCarRepository};
pub use service::car_service::{CarService, StoreOutcome};
pub use service::retry::{
    retry_storage_errors, retry_transient_only, RetryExecutor, RetryOutcome, RetryPolicy,
    Sleeper, ThreadSleeper,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Builds a dispatcher over the SQLite file named in `config`.
///
/// Does not create the schema; call `db::initialize_schema` first.
pub fn build_dispatcher(config: &BotConfig) -> CommandDispatcher<db::SqliteFileStore> {
    let store = db::SqliteFileStore::new(config.db_path.clone());
    let retry = RetryExecutor::new(config.retry);
    CommandDispatcher::new(CarService::new(store, retry))
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
