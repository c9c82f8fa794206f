//! Line-based transport for the car park bot.
//!
//! # Responsibility
//! - Load configuration, start logging, and initialize the store schema.
//! - Feed each stdin line to the dispatcher and print the reply.
//!
//! Schema initialization failure is fatal: the process exits before reading
//! any command.

use carpark_core::db::initialize_schema;
use carpark_core::{build_dispatcher, core_version, init_logging, BotConfig, Command};
use log::{error, info};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("carpark-bot: invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("carpark-bot: logging init failed: {err}");
        return ExitCode::FAILURE;
    }

    info!(
        "event=bot_start module=cli status=start version={} db_path={} token_configured={}",
        core_version(),
        config.db_path.display(),
        config.bot_token.is_some()
    );

    if let Err(err) = initialize_schema(&config.db_path) {
        error!("event=bot_start module=cli status=error error_code=schema_init_failed error={err}");
        eprintln!("carpark-bot: could not initialize store: {err}");
        return ExitCode::FAILURE;
    }

    let dispatcher = build_dispatcher(&config);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!("event=stdin_read module=cli status=error error={err}");
                return ExitCode::FAILURE;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = dispatcher
            .dispatch(&line)
            .unwrap_or_else(unknown_command_hint);
        if writeln!(stdout, "{reply}").and_then(|()| stdout.flush()).is_err() {
            return ExitCode::FAILURE;
        }
    }

    info!("event=bot_stop module=cli status=ok");
    ExitCode::SUCCESS
}

fn unknown_command_hint() -> String {
    let names = Command::ALL
        .iter()
        .map(|command| format!("/{}", command.name()))
        .collect::<Vec<_>>();
    format!("Unknown command. Try one of: {}", names.join(", "))
}
