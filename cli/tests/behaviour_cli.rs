//! End-to-end CLI behaviour tests for `appdeploy`.
//!
//! These scenarios run the binary against a local mock deploy service and
//! validate exit status, output and what the service received. Each run gets
//! an isolated configuration directory and a clean environment.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const DEPLOY_API: &str = "/application/v2/tenant/default";
const OPERATIONS: [&str; 3] = ["prepare", "activate", "prepareandactivate"];

struct CliWorld {
    server: Option<mockito::ServerGuard>,
    mocks: Vec<(&'static str, mockito::Mock)>,
    args: Vec<String>,
    working_dir: PathBuf,
    config_home: TempDir,
    output: Option<Output>,
}

#[fixture]
fn cli_world() -> CliWorld {
    CliWorld {
        server: None,
        mocks: Vec::new(),
        args: Vec::new(),
        working_dir: workspace_root(),
        config_home: TempDir::new().expect("failed to create config home"),
        output: None,
    }
}

fn workspace_root() -> PathBuf {
    PathBuf::from(std::env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("manifest dir should have parent")
        .to_owned()
}

impl CliWorld {
    fn server_url(&self) -> String {
        self.server.as_ref().expect("deploy service running").url()
    }

    fn run(&mut self, extra_args: &[String], env_target: Option<String>) {
        let mut command = Command::new(env!("CARGO_BIN_EXE_appdeploy"));
        command
            .args(&self.args)
            .args(extra_args)
            .current_dir(&self.working_dir)
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env_remove("APPDEPLOY_TARGET")
            .env_remove("NO_COLOR");
        if let Some(target) = env_target {
            command.env("APPDEPLOY_TARGET", target);
        }
        self.output = Some(command.output().expect("failed to run appdeploy"));
    }

    fn output(&self) -> &Output {
        self.output.as_ref().expect("appdeploy has run")
    }

    fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output().stdout).into_owned()
    }

    fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output().stderr).into_owned()
    }
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a deploy service answering {status}")]
fn given_deploy_service(cli_world: &mut CliWorld, status: usize) {
    let mut server = mockito::Server::new();
    cli_world.mocks = OPERATIONS
        .iter()
        .map(|operation| {
            let mock = server
                .mock("POST", format!("{DEPLOY_API}/{operation}").as_str())
                .match_header("content-type", "application/zip")
                .with_status(status)
                .with_body(format!("status {status}"))
                .create();
            (*operation, mock)
        })
        .collect();
    cli_world.server = Some(server);
}

#[given("the working directory \"{dir}\"")]
fn given_working_directory(cli_world: &mut CliWorld, dir: String) {
    cli_world.working_dir = workspace_root().join(dir);
}

#[given("the arguments \"{args}\"")]
fn given_arguments(cli_world: &mut CliWorld, args: String) {
    cli_world.args = args.split_whitespace().map(str::to_owned).collect();
}

#[given("a configuration file containing \"{contents}\"")]
fn given_configuration_file(cli_world: &mut CliWorld, contents: String) {
    let dir = cli_world.config_home.path().join("appdeploy");
    std::fs::create_dir_all(&dir).expect("failed to create config dir");
    std::fs::write(dir.join("config.toml"), format!("{contents}\n"))
        .expect("failed to write config file");
}

#[when("appdeploy is run against the deploy service")]
fn when_run_against_service(cli_world: &mut CliWorld) {
    let target = vec!["--target".to_owned(), cli_world.server_url()];
    cli_world.run(&target, None);
}

#[when("appdeploy is run with the deploy service in the environment")]
fn when_run_with_env_target(cli_world: &mut CliWorld) {
    let target = cli_world.server_url();
    cli_world.run(&[], Some(target));
}

#[when("appdeploy is run")]
fn when_run(cli_world: &mut CliWorld) {
    cli_world.run(&[], None);
}

#[then("appdeploy exits with status {code}")]
fn then_exit_status(cli_world: &mut CliWorld, code: i32) {
    assert_eq!(
        cli_world.output().status.code(),
        Some(code),
        "stdout: {}\nstderr: {}",
        cli_world.stdout(),
        cli_world.stderr()
    );
}

#[then("stdout contains \"{expected}\"")]
fn then_stdout_contains(cli_world: &mut CliWorld, expected: String) {
    let stdout = cli_world.stdout();
    assert!(
        stdout.contains(&expected),
        "expected '{expected}' in stdout: {stdout}"
    );
}

#[then("stderr contains \"{expected}\"")]
fn then_stderr_contains(cli_world: &mut CliWorld, expected: String) {
    let stderr = cli_world.stderr();
    assert!(
        stderr.contains(&expected),
        "expected '{expected}' in stderr: {stderr}"
    );
}

#[then("the deploy service received \"{operation}\"")]
fn then_service_received(cli_world: &mut CliWorld, operation: String) {
    for (name, mock) in &cli_world.mocks {
        assert_eq!(
            mock.matched(),
            *name == operation,
            "unexpected request state for {name}; stderr: {}",
            cli_world.stderr()
        );
    }
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/cli.feature", index = 0)]
fn scenario_deploy_packaged_application(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 1)]
fn scenario_prepare_source_directory(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 2)]
fn scenario_rejected_package(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 3)]
fn scenario_target_from_environment(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 4)]
fn scenario_invalid_target(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 5)]
fn scenario_unreachable_service(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 6)]
fn scenario_malformed_configuration(cli_world: CliWorld) {
    let _ = cli_world;
}
