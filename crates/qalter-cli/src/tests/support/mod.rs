//! Test support for the `qalter` runtime.
//!
//! Supplies an in-memory batch cluster for dispatcher tests, a TCP fake
//! server for exercising the real RPC client, and the harness that drives
//! `run_with` from feature scenarios.

mod fake_cluster;
mod fake_server;

use std::cell::RefCell;
use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use qalter_config::{Config, ServerName};
use rstest::fixture;

use crate::client::RpcClient;
use crate::security::NoSecurity;
use crate::{AppError, ConfigLoader, IoStreams, run_with};

pub(crate) use fake_cluster::{Call, FakeCluster};
pub(crate) use fake_server::FakeServer;

/// A config loader that returns a fixed configuration for tests.
pub(crate) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(crate) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Parses a server name, panicking on malformed test input.
pub(crate) fn server(name: &str) -> ServerName {
    name.parse().expect("valid server name")
}

/// Splits a command string into an argument vector headed by `qalter`.
pub(crate) fn build_args(command: &str) -> Vec<OsString> {
    let mut args = vec![OsString::from("qalter")];
    args.extend(
        command
            .trim()
            .trim_matches('"')
            .split_whitespace()
            .map(OsString::from),
    );
    args
}

/// Output captured from one in-process run.
#[derive(Debug, Default)]
pub(crate) struct Captured {
    pub(crate) stdout: Vec<u8>,
    pub(crate) stderr: Vec<u8>,
    pub(crate) exit_code: Option<ExitCode>,
}

impl Captured {
    pub(crate) fn stdout_text(&self) -> Result<String> {
        String::from_utf8(self.stdout.clone()).context("stdout utf8")
    }

    pub(crate) fn stderr_text(&self) -> Result<String> {
        String::from_utf8(self.stderr.clone()).context("stderr utf8")
    }

    pub(crate) fn assert_exit_code(&self, expected: u8) -> Result<()> {
        let exit = self.exit_code.context("exit code recorded")?;
        ensure!(
            exit == ExitCode::from(expected),
            "expected exit code {expected}, got {exit:?}"
        );
        Ok(())
    }
}

/// Runs the CLI against an in-memory cluster.
pub(crate) fn run_against_cluster(config: Config, cluster: &FakeCluster, command: &str) -> Captured {
    let mut captured = Captured::default();
    let loader = StaticConfigLoader::new(config);
    let mut io = IoStreams::new(&mut captured.stdout, &mut captured.stderr);
    let exit = run_with(
        build_args(command),
        &mut io,
        &loader,
        |_: &Config| cluster.clone(),
        cluster.security(),
    );
    captured.exit_code = Some(exit);
    captured
}

/// Scenario state for the TCP-backed feature tests.
#[derive(Default)]
pub(crate) struct TestWorld {
    pub(crate) config: Config,
    pub(crate) primary: Option<FakeServer>,
    pub(crate) relocated: Option<FakeServer>,
    pub(crate) captured: Captured,
    pub(crate) primary_requests: Vec<String>,
    pub(crate) relocated_requests: Vec<String>,
}

impl TestWorld {
    pub(crate) fn use_primary(&mut self, server: FakeServer) {
        self.config.default_server = ServerName::new("127.0.0.1", server.port());
        self.primary = Some(server);
    }

    pub(crate) fn run(&mut self, command: &str) -> Result<()> {
        let mut captured = Captured::default();
        let loader = StaticConfigLoader::new(self.config.clone());
        let mut io = IoStreams::new(&mut captured.stdout, &mut captured.stderr);
        let exit = run_with(
            build_args(command),
            &mut io,
            &loader,
            RpcClient::new,
            NoSecurity,
        );
        captured.exit_code = Some(exit);
        self.captured = captured;

        if let Some(server) = self.primary.as_mut() {
            self.primary_requests = server.take_requests()?;
        }
        if let Some(server) = self.relocated.as_mut() {
            self.relocated_requests = server.take_requests()?;
        }
        Ok(())
    }
}

#[fixture]
pub(crate) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}
