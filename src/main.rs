use std::process::ExitCode;

mod app;
mod branches;
mod cli;
mod config;
mod console;
mod handover;
mod logger;
mod screenshare;
mod session;
mod setup;
mod shell;
mod timer;


fn main() -> ExitCode {
    app::main()
}
