//! Maps server attribute refusals back to the option that produced them.
//!
//! Only the first refusal in the list is decisive. A refusal of an attribute
//! no option writes passes through to the dispatcher's per-job report; any
//! other refusal ends the whole run.

use std::collections::HashMap;
use std::io::Write;

use qalter_protocol::AttributeError;
use qalter_protocol::attributes as attr;
use qalter_protocol::codes;

use crate::attributes::JobOption;
use crate::cli::USAGE;
use crate::client::failure_status;

/// Exit status for usage errors and fatal attribute refusals.
pub(crate) const USAGE_EXIT: i32 = 2;

/// Reverse lookup from attribute name to option letter.
#[derive(Debug, Clone)]
pub(crate) struct OptionTable {
    by_attribute: HashMap<&'static str, char>,
}

impl OptionTable {
    pub(crate) fn new() -> Self {
        let mut by_attribute: HashMap<&'static str, char> = JobOption::ALL
            .into_iter()
            .filter_map(|option| option.attribute().map(|name| (name, option.letter())))
            .collect();
        let extended = JobOption::Extended.letter();
        for name in [
            attr::DEPEND,
            attr::STAGE_IN,
            attr::STAGE_OUT,
            attr::SANDBOX,
            attr::UMASK,
            attr::RUN_COUNT,
            attr::GROUP_LIST,
        ] {
            by_attribute.insert(name, extended);
        }
        Self { by_attribute }
    }

    pub(crate) fn option_for(&self, attribute: &str) -> Option<char> {
        self.by_attribute.get(attribute).copied()
    }
}

impl Default for OptionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of inspecting a refusal list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Not attributable to an option; report per job and carry on.
    PassThrough,
    /// The resource list was refused: report against the job and stop with
    /// the server's code.
    ResourceRefused { code: i32, message: String },
    /// The job exceeds a server limit.
    JobTooBig { message: String },
    /// An option's value was refused.
    IllegalOption { letter: char },
}

impl Verdict {
    /// Whether the connection and security context must be released before
    /// the run stops.
    pub(crate) const fn releases_early(&self) -> bool {
        matches!(self, Self::JobTooBig { .. } | Self::IllegalOption { .. })
    }

    /// Writes the diagnostic and returns the exit status, or `None` for
    /// [`Verdict::PassThrough`].
    pub(crate) fn report<E: Write>(&self, job_id: &str, stderr: &mut E) -> Option<i32> {
        match self {
            Self::PassThrough => None,
            Self::ResourceRefused { code, message } => {
                let _ = writeln!(stderr, "qalter: {message} {job_id}");
                Some(failure_status(*code))
            }
            Self::JobTooBig { message } => {
                let _ = writeln!(stderr, "qalter: Job {message} ");
                Some(USAGE_EXIT)
            }
            Self::IllegalOption { letter } => {
                let _ = writeln!(stderr, "qalter: illegal -{letter} value");
                let _ = stderr.write_all(USAGE.as_bytes());
                Some(USAGE_EXIT)
            }
        }
    }
}

pub(crate) fn classify(errors: &[AttributeError], table: &OptionTable) -> Verdict {
    let Some(first) = errors.first() else {
        return Verdict::PassThrough;
    };
    let Some(letter) = table.option_for(&first.attribute.name) else {
        return Verdict::PassThrough;
    };
    tracing::debug!(attribute = %first.attribute.name, option = %letter, code = first.code, "attribute refused");

    if first.attribute.name == attr::RESOURCE_LIST {
        return Verdict::ResourceRefused {
            code: first.code,
            message: first.message.clone(),
        };
    }
    if first.code == codes::JOB_TOO_BIG {
        return Verdict::JobTooBig {
            message: first.message.clone(),
        };
    }
    Verdict::IllegalOption { letter }
}
