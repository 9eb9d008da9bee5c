use clap::Parser;
use serde_json::json;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli::{usage, Cli, CliCommand};
use crate::config::{load_config, MobConfig, CONFIG_FILE_NAME};
use crate::console::{Console, StdConsole};
use crate::logger::Logger;
use crate::session::{Quit, Session};
use crate::shell::{Runner, SystemRunner};

fn current_branch(runner: &mut SystemRunner) -> Result<String, Quit> {
    let args = vec![
        "rev-parse".to_string(),
        "--abbrev-ref".to_string(),
        "HEAD".to_string(),
    ];
    let failed = |message: String| {
        eprintln!("{}", message);
        Quit {
            code: 1,
            reason: "current_branch".to_string(),
        }
    };
    let result = runner.git(&args).map_err(failed)?;
    if !result.success() {
        return Err(failed(format!(
            "Failed to determine the current branch (is this a git repository?)\n{}",
            result.output.trim_end()
        )));
    }
    Ok(result.output.trim().to_string())
}

fn build_session(stay: bool) -> Result<Session<SystemRunner, StdConsole>, Quit> {
    let mut runner = SystemRunner;
    let mut console = StdConsole;
    let base_branch = current_branch(&mut runner)?;
    let defaults = MobConfig::with_base_branch(&base_branch);

    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let (mut config, warnings) = if config_path.is_file() {
        let loaded = load_config(&config_path, defaults).map_err(|message| {
            eprintln!("{}", message);
            Quit {
                code: 1,
                reason: message,
            }
        })?;
        (loaded.config, loaded.warnings)
    } else {
        (defaults, Vec::new())
    };
    for warning in &warnings {
        console.say_note(warning);
    }
    if stay {
        config.mob_next_stay = true;
    }

    let logger = Logger::new(config.log_path.clone());
    logger.record(
        "config",
        json!({
            "base_branch": &config.base_branch,
            "wip_branch": &config.wip_branch,
            "warnings": &warnings
        }),
    );
    Ok(Session::new(config, config_path, runner, console, logger))
}

fn run_with_cli_impl<R: Runner, C: Console>(
    session: &mut Session<R, C>,
    command: &CliCommand,
) -> Result<(), Quit> {
    if session.config.debug {
        session.console.say(&format!("command '{:?}'", command));
    }
    match command {
        CliCommand::Start { params } => {
            session.start(params)?;
            session.status()
        }
        CliCommand::Next => session.next(),
        CliCommand::Done => session.done(),
        CliCommand::Reset => session.reset(),
        CliCommand::Timer { minutes } => {
            if let Some(minutes) = minutes {
                session.start_timer(minutes);
            }
            Ok(())
        }
        CliCommand::Share => {
            session.start_screenshare();
            Ok(())
        }
        CliCommand::Status => session.status(),
        CliCommand::Setup => session.setup(),
        CliCommand::Help | CliCommand::Version => Ok(()),
    }
}

pub(crate) fn run_with_cli(cli: Cli) -> Result<(), Quit> {
    let command = cli.command.unwrap_or(CliCommand::Status);
    let mut console = StdConsole;
    match command {
        CliCommand::Help => {
            console.say(usage());
            return Ok(());
        }
        CliCommand::Version => {
            console.say(&format!("v{}", env!("CARGO_PKG_VERSION")));
            return Ok(());
        }
        _ => {}
    }
    debug_assert!(command.needs_repository());

    let mut session = build_session(cli.stay)?;
    run_with_cli_impl(&mut session, &command)
}

#[cfg(test)]
pub(crate) fn run_command_for_test<R: Runner, C: Console>(
    session: &mut Session<R, C>,
    command: &CliCommand,
) -> Result<(), Quit> {
    run_with_cli_impl(session, command)
}

pub(crate) fn run_with_args(args: Vec<OsString>) -> Result<(), Quit> {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            // Render clap output ourselves so it stays capture-friendly.
            if err.use_stderr() {
                eprintln!("{err}");
            } else {
                println!("{err}");
            }
            return Err(Quit {
                code: err.exit_code(),
                reason: "cli_parse".to_string(),
            });
        }
    };
    run_with_cli(cli)
}

pub(crate) fn main_with_args(args: Vec<OsString>) -> ExitCode {
    match run_with_args(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(quit) => quit.exit_code(),
    }
}

pub(crate) fn main() -> ExitCode {
    main_with_args(env::args_os().collect())
}
