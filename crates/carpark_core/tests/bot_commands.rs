use carpark_core::db::{initialize_schema, ConnectionSource, DbError, DbResult, SqliteFileStore};
use carpark_core::{
    build_dispatcher, BotConfig, CarService, CommandDispatcher, RetryExecutor, RetryPolicy,
    Sleeper,
};
use rusqlite::{ffi, Connection};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use tempfile::TempDir;

const RETRY_DELAY: Duration = Duration::from_millis(5);

#[derive(Clone, Default)]
struct RecordingSleeper {
    waits: Rc<RefCell<Vec<Duration>>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.waits.borrow_mut().push(duration);
    }
}

/// Counts connection attempts and optionally fails the first `failures` of them.
#[derive(Clone)]
struct CountingStore {
    inner: SqliteFileStore,
    connects: Rc<Cell<usize>>,
    failures: usize,
}

impl CountingStore {
    fn new(path: &Path, failures: usize) -> Self {
        Self {
            inner: SqliteFileStore::new(path),
            connects: Rc::new(Cell::new(0)),
            failures,
        }
    }
}

impl ConnectionSource for CountingStore {
    fn connect(&self) -> DbResult<Connection> {
        let attempt = self.connects.get() + 1;
        self.connects.set(attempt);
        if attempt <= self.failures {
            return Err(DbError::Sqlite(rusqlite::Error::SqliteFailure(
                ffi::Error::new(ffi::SQLITE_BUSY),
                None,
            )));
        }
        self.inner.connect()
    }
}

struct Harness {
    _dir: TempDir,
    store: CountingStore,
    sleeper: RecordingSleeper,
    dispatcher: CommandDispatcher<CountingStore, RecordingSleeper>,
}

impl Harness {
    fn new() -> Self {
        Self::with_failures(0)
    }

    fn with_failures(failures: usize) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.db");
        initialize_schema(&path).unwrap();

        let store = CountingStore::new(&path, failures);
        let sleeper = RecordingSleeper::default();
        let retry = RetryExecutor::with_sleeper(RetryPolicy::new(3, RETRY_DELAY), sleeper.clone());
        let dispatcher = CommandDispatcher::new(CarService::new(store.clone(), retry));

        Self {
            _dir: dir,
            store,
            sleeper,
            dispatcher,
        }
    }

    fn send(&self, text: &str) -> String {
        self.dispatcher
            .dispatch(text)
            .unwrap_or_else(|| panic!("no reply for `{text}`"))
    }

    fn car_count(&self) -> i64 {
        let conn = self.store.inner.connect().unwrap();
        conn.query_row("SELECT COUNT(*) FROM Car;", [], |row| row.get(0))
            .unwrap()
    }
}

#[test]
fn end_to_end_add_view_delete() {
    let bot = Harness::new();

    assert_eq!(bot.send("/add_car Toyota Red 2020"), "Car added: Toyota, Red, 2020");
    assert_eq!(
        bot.send("/view_cars"),
        "Here are the cars in the database:\n\nID: 1, Brand: Toyota, Color: Red, Year: 2020\n"
    );
    assert_eq!(bot.send("/delete_car 1"), "Car with car_id 1 has been deleted.");
    assert_eq!(bot.send("/delete_car 1"), "No car found with car_id: 1");
    assert_eq!(bot.send("/view_cars"), "No cars found in the database.");
}

#[test]
fn start_replies_with_greeting_without_storage() {
    let bot = Harness::new();

    assert_eq!(bot.send("/start"), "Hello! I am your bot.");
    assert_eq!(bot.store.connects.get(), 0);
}

#[test]
fn added_cars_get_distinct_identities() {
    let bot = Harness::new();

    bot.send("/add_car Toyota Red 2020");
    bot.send("/add_car Toyota Red 2020");

    assert_eq!(
        bot.send("/view_cars"),
        "Here are the cars in the database:\n\n\
         ID: 1, Brand: Toyota, Color: Red, Year: 2020\n\
         ID: 2, Brand: Toyota, Color: Red, Year: 2020\n"
    );
}

#[test]
fn invalid_arguments_never_reach_storage() {
    let bot = Harness::new();

    let cases = [
        ("/add_car", "Usage: /add_car <car_brand> <color> <year>"),
        ("/add_car Toyota", "Usage: /add_car <car_brand> <color> <year>"),
        ("/add_car Toyota Red", "Usage: /add_car <car_brand> <color> <year>"),
        ("/add_car Toyota Red new", "Year must be an integer."),
        ("/add_car Toyota Red 20.5", "Year must be an integer."),
        ("/delete_car", "Usage: /delete_car <car_id>"),
        ("/delete_car one", "Car ID must be an integer."),
    ];
    for (input, expected) in cases {
        assert_eq!(bot.send(input), expected, "input `{input}`");
    }

    assert_eq!(bot.store.connects.get(), 0);
    assert!(bot.sleeper.waits.borrow().is_empty());
}

#[test]
fn delete_of_absent_car_leaves_table_unchanged() {
    let bot = Harness::new();
    bot.send("/add_car Fiat Blue 1999");

    assert_eq!(bot.send("/delete_car 77"), "No car found with car_id: 77");
    assert_eq!(bot.car_count(), 1);
    assert!(bot.sleeper.waits.borrow().is_empty());
}

#[test]
fn transient_failure_is_retried_then_succeeds() {
    let bot = Harness::with_failures(2);

    assert_eq!(bot.send("/add_car Volvo Grey 2011"), "Car added: Volvo, Grey, 2011");
    assert_eq!(bot.store.connects.get(), 3);
    assert_eq!(*bot.sleeper.waits.borrow(), vec![RETRY_DELAY, RETRY_DELAY]);
    assert_eq!(bot.car_count(), 1);
}

#[test]
fn exhausted_retries_produce_generic_replies() {
    let bot = Harness::with_failures(usize::MAX);

    assert_eq!(
        bot.send("/add_car Volvo Grey 2011"),
        "An error occurred while adding the car."
    );
    assert_eq!(bot.store.connects.get(), 3);

    assert_eq!(
        bot.send("/delete_car 1"),
        "An error occurred while deleting the car."
    );
    assert_eq!(
        bot.send("/view_cars"),
        "An error occurred while retrieving the cars."
    );
    assert_eq!(bot.store.connects.get(), 9);
    assert_eq!(bot.sleeper.waits.borrow().len(), 6);
}

#[test]
fn deleting_a_parked_car_reports_generic_error() {
    let bot = Harness::new();
    bot.send("/add_car Toyota Red 2020");
    {
        let conn = bot.store.inner.connect().unwrap();
        conn.execute_batch(
            "INSERT INTO CarPark (car_park_id, car_park_name) VALUES (1, 'Central');
             INSERT INTO Cars_Id (cars_park_id, car_id) VALUES (1, 1);",
        )
        .unwrap();
    }

    assert_eq!(
        bot.send("/delete_car 1"),
        "An error occurred while deleting the car."
    );
    assert_eq!(bot.car_count(), 1);
}

#[test]
fn view_cars_with_null_attribute_reports_generic_error() {
    let bot = Harness::new();
    bot.send("/add_car Toyota Red 2020");
    {
        let conn = bot.store.inner.connect().unwrap();
        conn.execute(
            "INSERT INTO Car (car_brand, color, year) VALUES ('Fiat', NULL, 1999);",
            [],
        )
        .unwrap();
    }

    assert_eq!(
        bot.send("/view_cars"),
        "An error occurred while retrieving the cars."
    );
    // one for the add, one for the listing; bad rows are not retried
    assert_eq!(bot.store.connects.get(), 2);
}

#[test]
fn non_commands_get_no_reply() {
    let bot = Harness::new();

    assert_eq!(bot.dispatcher.dispatch("hello"), None);
    assert_eq!(bot.dispatcher.dispatch("/park_car 1 2"), None);
    assert_eq!(
        bot.dispatcher.dispatch("/start@carpark_bot"),
        Some("Hello! I am your bot.".to_string())
    );
}

#[test]
fn build_dispatcher_uses_configured_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.db");
    let path_text = path.to_str().unwrap().to_string();
    let config = BotConfig::from_lookup(|key| match key {
        "CARPARK_DB_PATH" => Some(path_text.clone()),
        "CARPARK_RETRY_DELAY_MS" => Some("0".to_string()),
        _ => None,
    })
    .unwrap();
    initialize_schema(&config.db_path).unwrap();

    let dispatcher = build_dispatcher(&config);
    assert_eq!(
        dispatcher.dispatch("/add_car Fiat Blue 1999").as_deref(),
        Some("Car added: Fiat, Blue, 1999")
    );

    let conn = Connection::open(&path).unwrap();
    let brand: String = conn
        .query_row("SELECT car_brand FROM Car;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(brand, "Fiat");
}
