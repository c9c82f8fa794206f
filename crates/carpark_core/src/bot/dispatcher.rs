//! Command handlers and the dispatcher that routes chat text to them.
//!
//! # Responsibility
//! - Map each command to one validated storage operation.
//! - Turn every outcome into a user-facing reply string.
//!
//! # Invariants
//! - Input errors never reach storage and are not logged as faults.
//! - Storage failures are logged at error level and answered with a generic
//!   reply; no error escapes to the transport.

use crate::bot::command::{
    parse_add_car_args, parse_command, parse_delete_car_args, Command, InboundCommand,
};
use crate::db::ConnectionSource;
use crate::model::car::Car;
use crate::repo::car_repo::RepoError;
use crate::service::car_service::{CarService, StoreOutcome};
use crate::service::retry::{Sleeper, ThreadSleeper};
use log::{debug, error, info};

const START_REPLY: &str = "Hello! I am your bot.";
const ADD_CAR_FAILED_REPLY: &str = "An error occurred while adding the car.";
const DELETE_CAR_FAILED_REPLY: &str = "An error occurred while deleting the car.";
const VIEW_CARS_FAILED_REPLY: &str = "An error occurred while retrieving the cars.";
const NO_CARS_REPLY: &str = "No cars found in the database.";
const CAR_LIST_HEADER: &str = "Here are the cars in the database:\n\n";

/// Routes inbound commands to their handlers.
pub struct CommandDispatcher<C, S = ThreadSleeper> {
    cars: CarService<C, S>,
}

impl<C: ConnectionSource, S: Sleeper> CommandDispatcher<C, S> {
    pub fn new(cars: CarService<C, S>) -> Self {
        Self { cars }
    }

    /// Handles one line of chat text.
    ///
    /// Returns `None` when the text is not a command this bot answers.
    pub fn dispatch(&self, text: &str) -> Option<String> {
        parse_command(text).map(|inbound| self.handle(&inbound))
    }

    /// Runs the handler for an already parsed command.
    pub fn handle(&self, inbound: &InboundCommand) -> String {
        debug!(
            "event=command_received module=bot command={} args={}",
            inbound.command.name(),
            inbound.args.len()
        );
        match inbound.command {
            Command::Start => self.start(),
            Command::AddCar => self.add_car(&inbound.args),
            Command::DeleteCar => self.delete_car(&inbound.args),
            Command::ViewCars => self.view_cars(),
        }
    }

    fn start(&self) -> String {
        START_REPLY.to_string()
    }

    fn add_car(&self, args: &[String]) -> String {
        let car = match parse_add_car_args(args) {
            Ok(car) => car,
            Err(err) => {
                debug!("event=command_rejected module=bot command=add_car reason={err}");
                return err.reply().to_string();
            }
        };

        match self.cars.add_car(&car).into_result() {
            Ok(added) => {
                info!("event=car_added module=bot status=ok car_id={}", added.car_id);
                format!("Car added: {}, {}, {}", added.car_brand, added.color, added.year)
            }
            Err(err) => {
                log_store_failure("add_car", &err);
                ADD_CAR_FAILED_REPLY.to_string()
            }
        }
    }

    fn delete_car(&self, args: &[String]) -> String {
        let car_id = match parse_delete_car_args(args) {
            Ok(car_id) => car_id,
            Err(err) => {
                debug!("event=command_rejected module=bot command=delete_car reason={err}");
                return err.reply().to_string();
            }
        };

        match self.cars.delete_car(car_id) {
            StoreOutcome::Success(()) => {
                info!("event=car_deleted module=bot status=ok car_id={car_id}");
                format!("Car with car_id {car_id} has been deleted.")
            }
            StoreOutcome::NotFound(missing) => format!("No car found with car_id: {missing}"),
            StoreOutcome::TransientFailure(err) | StoreOutcome::PermanentFailure(err) => {
                log_store_failure("delete_car", &err);
                DELETE_CAR_FAILED_REPLY.to_string()
            }
        }
    }

    fn view_cars(&self) -> String {
        match self.cars.list_cars().into_result() {
            Ok(cars) => format_car_list(&cars),
            Err(err) => {
                log_store_failure("view_cars", &err);
                VIEW_CARS_FAILED_REPLY.to_string()
            }
        }
    }
}

fn format_car_list(cars: &[Car]) -> String {
    if cars.is_empty() {
        return NO_CARS_REPLY.to_string();
    }

    let mut message = String::from(CAR_LIST_HEADER);
    for car in cars {
        message.push_str(&format!(
            "ID: {}, Brand: {}, Color: {}, Year: {}\n",
            car.car_id, car.car_brand, car.color, car.year
        ));
    }
    message
}

fn log_store_failure(command: &str, err: &RepoError) {
    error!(
        "event=command_failed module=bot status=error command={command} transient={} error={err}",
        err.is_transient()
    );
}
