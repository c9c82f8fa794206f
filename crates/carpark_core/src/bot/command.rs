//! Inbound command parsing and argument validation.
//!
//! # Responsibility
//! - Split chat text into a command name and positional arguments.
//! - Validate `add_car` / `delete_car` arguments before any storage access.
//!
//! # Invariants
//! - Validation is total: every argument list maps to a value or an
//!   `InputError`, never to a storage call.
//! - Extra arguments beyond those a command needs are ignored.

use crate::model::car::{CarId, NewCar};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

// `/name` or `/name@botname`, as chat platforms send it in group chats.
static COMMAND_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/([A-Za-z0-9_]+)(?:@[A-Za-z0-9_]+)?$").expect("valid command regex")
});

/// Commands the bot answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    AddCar,
    DeleteCar,
    ViewCars,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::Start,
        Command::AddCar,
        Command::DeleteCar,
        Command::ViewCars,
    ];

    /// Name as typed after the leading slash.
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::AddCar => "add_car",
            Self::DeleteCar => "delete_car",
            Self::ViewCars => "view_cars",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }
}

/// A recognized command with its raw positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub command: Command,
    pub args: Vec<String>,
}

/// Parses chat text into a known command.
///
/// Returns `None` for plain text and for commands the bot does not handle.
pub fn parse_command(text: &str) -> Option<InboundCommand> {
    let mut tokens = text.split_whitespace();
    let head = tokens.next()?;
    let name = COMMAND_TOKEN_RE.captures(head)?.get(1)?.as_str();
    let command = Command::from_name(name)?;

    Some(InboundCommand {
        command,
        args: tokens.map(str::to_string).collect(),
    })
}

/// User input problems, reported straight back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    AddCarUsage,
    YearNotInteger(String),
    DeleteCarUsage,
    CarIdNotInteger(String),
}

impl InputError {
    /// Reply text shown to the user.
    pub fn reply(&self) -> &'static str {
        match self {
            Self::AddCarUsage => "Usage: /add_car <car_brand> <color> <year>",
            Self::YearNotInteger(_) => "Year must be an integer.",
            Self::DeleteCarUsage => "Usage: /delete_car <car_id>",
            Self::CarIdNotInteger(_) => "Car ID must be an integer.",
        }
    }
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddCarUsage => write!(f, "add_car needs brand, color and year"),
            Self::YearNotInteger(value) => write!(f, "year `{value}` is not an integer"),
            Self::DeleteCarUsage => write!(f, "delete_car needs a car_id"),
            Self::CarIdNotInteger(value) => write!(f, "car_id `{value}` is not an integer"),
        }
    }
}

impl Error for InputError {}

/// Validates `/add_car <brand> <color> <year>` arguments.
pub fn parse_add_car_args(args: &[String]) -> Result<NewCar, InputError> {
    let [brand, color, year, ..] = args else {
        return Err(InputError::AddCarUsage);
    };
    let year = year
        .parse::<i64>()
        .map_err(|_| InputError::YearNotInteger(year.clone()))?;

    Ok(NewCar::new(brand.as_str(), color.as_str(), year))
}

/// Validates `/delete_car <car_id>` arguments.
pub fn parse_delete_car_args(args: &[String]) -> Result<CarId, InputError> {
    let Some(raw_id) = args.first() else {
        return Err(InputError::DeleteCarUsage);
    };
    raw_id
        .parse::<i64>()
        .map(CarId)
        .map_err(|_| InputError::CarIdNotInteger(raw_id.clone()))
}
