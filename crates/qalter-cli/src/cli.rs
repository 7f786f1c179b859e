//! Command-line surface of `qalter`.
//!
//! The positional job identifiers come from the derived [`Cli`]; the job
//! options are registered from [`JobOption::ALL`] so that the option letters
//! and their attributes share one table. Options keep their command-line
//! order, which the attribute list preserves.

use std::ffi::OsString;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ArgMatches, Command, CommandFactory, FromArgMatches, Parser};

use crate::attributes::JobOption;

/// Usage text written to stderr on any validation failure.
pub(crate) const USAGE: &str = "\
usage: qalter [-a date_time] [-A account_string] [-c interval] [-e path]
\t[-h hold_list] [-j y|n] [-k keep] [-J X-Y[:Z]] [-l resource_list]
\t[-m mail_options] [-M user_list] [-N jobname] [-o path] [-p priority]
\t[-r y|n] [-S path] [-u user_list] [-W dependency_list] [-P project_name] job_identifier...
       qalter --version
";

#[derive(Parser, Debug)]
#[command(
    name = "qalter",
    version,
    about = "Alter attributes of submitted batch jobs",
    disable_help_flag = true
)]
struct Cli {
    /// Jobs to alter, `<seq>[.<parent-server>][@<server>]`.
    #[arg(value_name = "job_identifier")]
    jobs: Vec<String>,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Invocation {
    /// Job options with their arguments, in command-line order.
    pub(crate) options: Vec<(JobOption, String)>,
    pub(crate) jobs: Vec<String>,
    /// One-line reasons for arguments the parser could not accept, such as
    /// unknown option letters or options missing their argument.
    pub(crate) malformed: Vec<String>,
}

#[derive(Debug)]
pub(crate) enum Parsed {
    Run(Invocation),
    /// `--version` was requested; the payload is the rendered version line.
    Version(String),
}

/// Parses the command line without stopping at the first malformed
/// argument: unknown options are recorded and dropped, and parsing resumes so
/// the remaining options can still be validated.
pub(crate) fn parse_invocation(mut args: Vec<OsString>) -> Parsed {
    let mut malformed = Vec::new();
    loop {
        let error = match command().try_get_matches_from(args.iter().cloned()) {
            Ok(matches) => return Parsed::Run(invocation_from(&matches, malformed)),
            Err(error) => error,
        };
        if error.kind() == ErrorKind::DisplayVersion {
            return Parsed::Version(error.to_string());
        }
        malformed.push(reason(&error));

        if let Some(index) = unknown_argument_index(&error, &args) {
            args.remove(index);
            continue;
        }

        // Anything else: keep whatever was matched before the error.
        return Parsed::Run(
            match command().ignore_errors(true).try_get_matches_from(args) {
                Ok(matches) => invocation_from(&matches, malformed),
                Err(_) => Invocation {
                    options: Vec::new(),
                    jobs: Vec::new(),
                    malformed,
                },
            },
        );
    }
}

fn command() -> Command {
    Cli::command().args(JobOption::ALL.map(option_arg))
}

fn invocation_from(matches: &ArgMatches, malformed: Vec<String>) -> Invocation {
    let jobs = Cli::from_arg_matches(matches)
        .map(|cli| cli.jobs)
        .unwrap_or_default();
    Invocation {
        options: ordered_options(matches),
        jobs,
        malformed,
    }
}

/// Position in `args` of the token clap rejected as unknown.
fn unknown_argument_index(error: &clap::Error, args: &[OsString]) -> Option<usize> {
    if error.kind() != ErrorKind::UnknownArgument {
        return None;
    }
    let Some(ContextValue::String(argument)) = error.get(ContextKind::InvalidArg) else {
        return None;
    };
    args.iter()
        .skip(1)
        .position(|token| token == argument.as_str())
        .map(|index| index + 1)
}

fn option_arg(option: JobOption) -> Arg {
    Arg::new(option.letter().to_string())
        .short(option.letter())
        .action(ArgAction::Append)
        .num_args(1)
        .allow_hyphen_values(true)
}

fn ordered_options(matches: &ArgMatches) -> Vec<(JobOption, String)> {
    let mut indexed: Vec<(usize, JobOption, String)> = Vec::new();
    for option in JobOption::ALL {
        let id = option.letter().to_string();
        let (Some(indices), Some(values)) = (
            matches.indices_of(&id),
            matches.get_many::<String>(&id),
        ) else {
            continue;
        };
        indexed.extend(
            indices
                .zip(values)
                .map(|(index, value)| (index, option, value.clone())),
        );
    }
    indexed.sort_by_key(|(index, _, _)| *index);
    indexed
        .into_iter()
        .map(|(_, option, value)| (option, value))
        .collect()
}

fn reason(error: &clap::Error) -> String {
    error
        .to_string()
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_owned()
}
