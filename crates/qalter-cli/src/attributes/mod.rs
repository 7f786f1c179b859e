//! Translation of command-line options into attribute edits.
//!
//! Each option is validated locally and appended to an ordered list. Failures
//! are counted rather than returned early so that every bad option is
//! reported in one run; the caller decides what to do once scanning ends.

mod date;
mod equal_string;
mod resources;
mod split;

use std::fmt;

use qalter_protocol::AttributeEdit;
use qalter_protocol::attributes as attr;
use thiserror::Error;
use time::OffsetDateTime;

use date::parse_date_time;
use equal_string::parse_keyword_pairs;
use resources::{ResourceListError, ResourceSyntax, parse_resource_list};

/// Options accepted by `qalter`, each taking one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum JobOption {
    ExecutionTime,
    Account,
    Checkpoint,
    ErrorPath,
    HoldTypes,
    JoinPath,
    KeepFiles,
    ArrayRange,
    ResourceList,
    MailPoints,
    MailUsers,
    JobName,
    OutputPath,
    Priority,
    Rerunable,
    Shell,
    UserList,
    Extended,
    Project,
}

impl JobOption {
    pub(crate) const ALL: [Self; 19] = [
        Self::ExecutionTime,
        Self::Account,
        Self::Checkpoint,
        Self::ErrorPath,
        Self::HoldTypes,
        Self::JoinPath,
        Self::KeepFiles,
        Self::ArrayRange,
        Self::ResourceList,
        Self::MailPoints,
        Self::MailUsers,
        Self::JobName,
        Self::OutputPath,
        Self::Priority,
        Self::Rerunable,
        Self::Shell,
        Self::UserList,
        Self::Extended,
        Self::Project,
    ];

    pub(crate) const fn letter(self) -> char {
        match self {
            Self::ExecutionTime => 'a',
            Self::Account => 'A',
            Self::Checkpoint => 'c',
            Self::ErrorPath => 'e',
            Self::HoldTypes => 'h',
            Self::JoinPath => 'j',
            Self::KeepFiles => 'k',
            Self::ArrayRange => 'J',
            Self::ResourceList => 'l',
            Self::MailPoints => 'm',
            Self::MailUsers => 'M',
            Self::JobName => 'N',
            Self::OutputPath => 'o',
            Self::Priority => 'p',
            Self::Rerunable => 'r',
            Self::Shell => 'S',
            Self::UserList => 'u',
            Self::Extended => 'W',
            Self::Project => 'P',
        }
    }

    /// Attribute written by the option. `-W` names its attributes through
    /// its keywords, so it has none of its own.
    pub(crate) const fn attribute(self) -> Option<&'static str> {
        let name = match self {
            Self::ExecutionTime => attr::EXECUTION_TIME,
            Self::Account => attr::ACCOUNT_NAME,
            Self::Checkpoint => attr::CHECKPOINT,
            Self::ErrorPath => attr::ERROR_PATH,
            Self::HoldTypes => attr::HOLD_TYPES,
            Self::JoinPath => attr::JOIN_PATH,
            Self::KeepFiles => attr::KEEP_FILES,
            Self::ArrayRange => attr::ARRAY_INDICES,
            Self::ResourceList => attr::RESOURCE_LIST,
            Self::MailPoints => attr::MAIL_POINTS,
            Self::MailUsers => attr::MAIL_USERS,
            Self::JobName => attr::JOB_NAME,
            Self::OutputPath => attr::OUTPUT_PATH,
            Self::Priority => attr::PRIORITY,
            Self::Rerunable => attr::RERUNABLE,
            Self::Shell => attr::SHELL_PATH_LIST,
            Self::UserList => attr::USER_LIST,
            Self::Project => attr::PROJECT,
            Self::Extended => return None,
        };
        Some(name)
    }
}

impl fmt::Display for JobOption {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "-{}", self.letter())
    }
}

/// Attribute edits gathered from the command line, frozen once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AttributeList {
    edits: Vec<AttributeEdit>,
}

impl AttributeList {
    pub(crate) fn as_slice(&self) -> &[AttributeEdit] {
        &self.edits
    }

    #[cfg(test)]
    pub(crate) fn from_edits(edits: Vec<AttributeEdit>) -> Self {
        Self { edits }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ValidationError {
    #[error("illegal {option} value")]
    IllegalValue { option: JobOption },
    #[error("illegal -l value\n{argument}\n{}^ {reason}", caret_padding(.argument, *.position))]
    ResourceSyntax {
        argument: String,
        position: usize,
        reason: ResourceSyntax,
    },
}

fn single_edit(option: JobOption, value: &str) -> Result<Vec<AttributeEdit>, ValidationError> {
    option
        .attribute()
        .map(|name| vec![AttributeEdit::new(name, value)])
        .ok_or(ValidationError::IllegalValue { option })
}

/// Spaces placing a caret under the character at byte offset `position`.
fn caret_padding(argument: &str, position: usize) -> String {
    let width = argument
        .get(..position)
        .map_or(position, |prefix| prefix.chars().count());
    " ".repeat(width)
}

/// Accumulates edits option by option.
#[derive(Debug)]
pub(crate) struct AttributeBuilder {
    now: OffsetDateTime,
    edits: Vec<AttributeEdit>,
    failures: usize,
}

impl AttributeBuilder {
    /// `now` anchors relative `-a` dates.
    pub(crate) const fn new(now: OffsetDateTime) -> Self {
        Self {
            now,
            edits: Vec::new(),
            failures: 0,
        }
    }

    /// Validates one option and appends its edits; on failure nothing is
    /// appended and the failure count grows.
    pub(crate) fn apply(&mut self, option: JobOption, argument: &str) -> Result<(), ValidationError> {
        match self.edits_for(option, argument) {
            Ok(edits) => {
                self.edits.extend(edits);
                Ok(())
            }
            Err(error) => {
                self.failures += 1;
                tracing::debug!(option = %option, %error, "option rejected");
                Err(error)
            }
        }
    }

    pub(crate) const fn failures(&self) -> usize {
        self.failures
    }

    pub(crate) fn finish(self) -> AttributeList {
        AttributeList { edits: self.edits }
    }

    fn edits_for(&self, option: JobOption, argument: &str) -> Result<Vec<AttributeEdit>, ValidationError> {
        let illegal = || ValidationError::IllegalValue { option };
        let single = |value: &str| single_edit(option, value);

        match option {
            JobOption::ExecutionTime => match parse_date_time(argument, self.now) {
                Ok(epoch) if epoch >= 0 => single(&epoch.to_string()),
                _ => Err(illegal()),
            },
            JobOption::Checkpoint => {
                let value = argument.trim_start();
                if value == "u" {
                    return Err(illegal());
                }
                single(value)
            }
            JobOption::HoldTypes | JobOption::MailPoints | JobOption::Priority => {
                single(argument.trim_start())
            }
            JobOption::Rerunable => match argument {
                "y" | "n" => single(argument),
                _ => Err(illegal()),
            },
            JobOption::ResourceList => match parse_resource_list(argument) {
                Ok(requests) => Ok(requests
                    .into_iter()
                    .map(|request| {
                        AttributeEdit::with_resource(attr::RESOURCE_LIST, request.name, request.value)
                    })
                    .collect()),
                Err(ResourceListError::Syntax { position, reason }) => {
                    Err(ValidationError::ResourceSyntax {
                        argument: argument.to_owned(),
                        position,
                        reason,
                    })
                }
                Err(ResourceListError::Empty) => Err(illegal()),
            },
            JobOption::Extended => {
                let value = argument.trim_start();
                if value.is_empty() {
                    return Err(illegal());
                }
                let pairs = parse_keyword_pairs(value).map_err(|_| illegal())?;
                Ok(pairs
                    .into_iter()
                    .map(|(keyword, value)| AttributeEdit::new(keyword, value))
                    .collect())
            }
            JobOption::Account
            | JobOption::ErrorPath
            | JobOption::JoinPath
            | JobOption::KeepFiles
            | JobOption::ArrayRange
            | JobOption::MailUsers
            | JobOption::JobName
            | JobOption::OutputPath
            | JobOption::Shell
            | JobOption::UserList
            | JobOption::Project => single(argument),
        }
    }
}
