//! `appdeploy` CLI entrypoint.
//!
//! This binary deploys an application package to an activation service and
//! exits with status 0 only when the service accepted it.

use std::io::Write;

use appdeploy::transport::UreqTransport;
use appdeploy_cli::cli::Cli;
use appdeploy_cli::config::{Config, Settings, env_target};
use appdeploy_cli::dirs::{BaseDirs, SystemBaseDirs};
use appdeploy_cli::error::Result;
use appdeploy_cli::output::TerminalReporter;
use appdeploy_cli::run::{execute, exit_code};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &SystemBaseDirs);
    let status = exit_code_for_run_result(run_result, &mut stderr);
    if status != 0 {
        std::process::exit(status);
    }
}

fn run(cli: &Cli, dirs: &dyn BaseDirs) -> Result<bool> {
    let config = Config::load(dirs)?;
    let settings = Settings::resolve(cli, &config, env_target());
    let reporter = TerminalReporter::stdio(settings.color);
    let transport = UreqTransport::new(&reporter);
    execute(&cli.command, &settings.target, &transport, &reporter)
}

fn exit_code_for_run_result(result: Result<bool>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(succeeded) => exit_code(succeeded),
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
