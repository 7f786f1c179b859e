//! In-memory batch cluster implementing the client traits.
//!
//! Every call made through the fake is appended to a shared log so tests
//! can assert on ordering, including when connections and the security
//! context are released.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use qalter_config::ServerName;
use qalter_protocol::{AttributeEdit, AttributeError, codes};

use crate::attributes::AttributeList;
use crate::client::{BatchClient, ClientError, ServerConnection};
use crate::security::{SecurityError, SecurityLibrary};

/// Observable interactions, with servers rendered as `host:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Connect(String),
    Alter { server: String, job_id: String },
    Locate { server: String, job_id: String },
    Disconnect(String),
    SecurityClosed,
}

impl Call {
    pub(crate) fn connect(server: &str) -> Self {
        Self::Connect(server.to_owned())
    }

    pub(crate) fn alter(server: &str, job_id: &str) -> Self {
        Self::Alter {
            server: server.to_owned(),
            job_id: job_id.to_owned(),
        }
    }

    pub(crate) fn locate(server: &str, job_id: &str) -> Self {
        Self::Locate {
            server: server.to_owned(),
            job_id: job_id.to_owned(),
        }
    }

    pub(crate) fn disconnect(server: &str) -> Self {
        Self::Disconnect(server.to_owned())
    }
}

#[derive(Debug, Clone)]
struct Refusal {
    code: i32,
    message: String,
    attribute_errors: Vec<AttributeError>,
}

#[derive(Debug, Default)]
struct ClusterState {
    owners: HashMap<String, ServerName>,
    locations: HashMap<String, ServerName>,
    refusals: HashMap<String, Refusal>,
    unreachable: HashSet<ServerName>,
    failing_locator: bool,
    security_fails: bool,
    calls: Vec<Call>,
    submissions: Vec<(String, Vec<AttributeEdit>)>,
}

/// Shared handle to the fake cluster; clones observe the same state.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeCluster {
    state: Rc<RefCell<ClusterState>>,
}

impl FakeCluster {
    /// Places `job_id` on `server`; location queries report it there.
    pub(crate) fn with_job(self, job_id: &str, server: &ServerName) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.owners.insert(job_id.to_owned(), server.clone());
            state.locations.insert(job_id.to_owned(), server.clone());
        }
        self
    }

    /// Makes location queries for `job_id` answer `server` without the job
    /// being there.
    pub(crate) fn with_stale_location(self, job_id: &str, server: &ServerName) -> Self {
        self.state
            .borrow_mut()
            .locations
            .insert(job_id.to_owned(), server.clone());
        self
    }

    /// Refuses alterations of `job_id` with a server error.
    pub(crate) fn with_refusal(
        self,
        job_id: &str,
        code: i32,
        message: &str,
        attribute_errors: Vec<AttributeError>,
    ) -> Self {
        self.state.borrow_mut().refusals.insert(
            job_id.to_owned(),
            Refusal {
                code,
                message: message.to_owned(),
                attribute_errors,
            },
        );
        self
    }

    pub(crate) fn with_unreachable(self, server: &ServerName) -> Self {
        self.state.borrow_mut().unreachable.insert(server.clone());
        self
    }

    pub(crate) fn with_failing_locator(self) -> Self {
        self.state.borrow_mut().failing_locator = true;
        self
    }

    pub(crate) fn with_failing_security(self) -> Self {
        self.state.borrow_mut().security_fails = true;
        self
    }

    /// Security library that logs into this cluster's call log.
    pub(crate) fn security(&self) -> FakeSecurity {
        FakeSecurity {
            state: Rc::clone(&self.state),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn submissions(&self) -> Vec<(String, Vec<AttributeEdit>)> {
        self.state.borrow().submissions.clone()
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl BatchClient for FakeCluster {
    type Connection = FakeConnection;

    fn connect(&self, server: &ServerName) -> Result<Self::Connection, ClientError> {
        self.record(Call::Connect(server.to_string()));
        if self.state.borrow().unreachable.contains(server) {
            return Err(ClientError::Connect {
                server: server.clone(),
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            });
        }
        Ok(FakeConnection {
            server: server.clone(),
            cluster: self.clone(),
            attribute_errors: Vec::new(),
        })
    }

    fn locate_job(
        &self,
        job_id: &str,
        server: &ServerName,
    ) -> Result<Option<ServerName>, ClientError> {
        self.record(Call::Locate {
            server: server.to_string(),
            job_id: job_id.to_owned(),
        });
        let state = self.state.borrow();
        if state.failing_locator {
            return Err(ClientError::Rejected {
                code: codes::PROTOCOL,
                message: String::from("locator unavailable"),
            });
        }
        Ok(state.locations.get(job_id).cloned())
    }
}

pub(crate) struct FakeConnection {
    server: ServerName,
    cluster: FakeCluster,
    attribute_errors: Vec<AttributeError>,
}

impl ServerConnection for FakeConnection {
    fn server(&self) -> &ServerName {
        &self.server
    }

    fn alter_job(&mut self, job_id: &str, attributes: &AttributeList) -> Result<(), ClientError> {
        self.cluster.record(Call::Alter {
            server: self.server.to_string(),
            job_id: job_id.to_owned(),
        });
        self.attribute_errors.clear();

        let mut state = self.cluster.state.borrow_mut();
        if state.owners.get(job_id) != Some(&self.server) {
            return Err(ClientError::Rejected {
                code: codes::UNKNOWN_JOB_ID,
                message: String::from("Unknown Job Id"),
            });
        }
        if let Some(refusal) = state.refusals.get(job_id).cloned() {
            self.attribute_errors = refusal.attribute_errors;
            return Err(ClientError::Rejected {
                code: refusal.code,
                message: refusal.message,
            });
        }
        state
            .submissions
            .push((job_id.to_owned(), attributes.as_slice().to_vec()));
        Ok(())
    }

    fn attributes_in_error(&self) -> &[AttributeError] {
        &self.attribute_errors
    }
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.cluster.record(Call::Disconnect(self.server.to_string()));
    }
}

/// Security library sharing the cluster's call log.
pub(crate) struct FakeSecurity {
    state: Rc<RefCell<ClusterState>>,
}

impl SecurityLibrary for FakeSecurity {
    fn init(&mut self) -> Result<(), SecurityError> {
        if self.state.borrow().security_fails {
            return Err(SecurityError);
        }
        Ok(())
    }

    fn close(&mut self) {
        self.state.borrow_mut().calls.push(Call::SecurityClosed);
    }
}
