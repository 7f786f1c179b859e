//! Runtime for `qalter`, the batch job alteration client.
//!
//! The command line is turned into a frozen list of attribute edits, which
//! is then submitted to the owning server of every job named on the command
//! line. Configuration loading, the RPC client, and the security library are
//! injectable so the whole flow can be exercised in-process.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use qalter_config::Config;
use time::OffsetDateTime;

mod attributes;
mod classify;
mod cli;
mod client;
mod config;
mod dispatch;
mod errors;
mod job_id;
mod security;
mod telemetry;
mod transport;

use attributes::{AttributeBuilder, AttributeList};
use classify::{OptionTable, USAGE_EXIT};
use cli::{Invocation, Parsed, USAGE, parse_invocation};
use client::{BatchClient, RpcClient};
use config::{command_arguments, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
use dispatch::Dispatcher;
pub(crate) use errors::AppError;
use security::{NoSecurity, SecurityContext, SecurityLibrary};

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: keep in sync with the fields of `qalter_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--default-server",
    "--connect-timeout-ms",
    "--log-filter",
    "--log-format",
];

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with(args, &mut io, &OrthoConfigLoader, RpcClient::new, NoSecurity)
}

/// Runs the CLI with injected configuration, client, and security library.
pub(crate) fn run_with<I, W, E, L, C, F, S>(
    args: I,
    io: &mut IoStreams<'_, W, E>,
    loader: &L,
    make_client: F,
    security: S,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
    C: BatchClient,
    F: FnOnce(&Config) -> C,
    S: SecurityLibrary,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);

    let invocation = match parse_invocation(command_arguments(&args, &split)) {
        Parsed::Run(invocation) => invocation,
        Parsed::Version(text) => {
            let _ = io.stdout.write_all(text.as_bytes());
            return ExitCode::SUCCESS;
        }
    };

    let result = loader.load(&split.config_arguments).and_then(|config| {
        telemetry::initialise(&config)?;
        let Some(attributes) = build_attributes(&invocation, &mut *io.stderr) else {
            return Ok(usage_exit(&mut *io.stderr));
        };
        let security = SecurityContext::initialise(security)?;
        let client = make_client(&config);
        let table = OptionTable::new();
        let outcome = Dispatcher::new(
            &client,
            &table,
            config.default_server(),
            security,
            &mut *io.stderr,
        )
        .run(&invocation.jobs, &attributes);
        tracing::debug!(?outcome, "run finished");
        Ok(exit_code_from_status(outcome.status()))
    });

    match result {
        Ok(exit_code) => exit_code,
        Err(error) => {
            let _ = writeln!(io.stderr, "qalter: {error}");
            ExitCode::FAILURE
        }
    }
}

/// Validates every option, reporting each failure along with every argument
/// the parser rejected. Returns `None` when anything failed or no job was
/// named.
fn build_attributes<E: Write>(invocation: &Invocation, stderr: &mut E) -> Option<AttributeList> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let mut builder = AttributeBuilder::new(now);
    for (option, argument) in &invocation.options {
        if let Err(error) = builder.apply(*option, argument) {
            let _ = writeln!(stderr, "qalter: {error}");
        }
    }
    for reason in &invocation.malformed {
        let _ = writeln!(stderr, "qalter: {reason}");
    }
    if builder.failures() > 0 || !invocation.malformed.is_empty() || invocation.jobs.is_empty() {
        return None;
    }
    Some(builder.finish())
}

fn usage_exit<E: Write>(stderr: &mut E) -> ExitCode {
    let _ = stderr.write_all(USAGE.as_bytes());
    exit_code_from_status(USAGE_EXIT)
}

fn exit_code_from_status(status: i32) -> ExitCode {
    match u8::try_from(status) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}
