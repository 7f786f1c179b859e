use serde::{Deserialize, Serialize};

/// One requested change to a job attribute.
///
/// `resource` is only set for subscripted attributes such as
/// [`RESOURCE_LIST`](crate::attributes::RESOURCE_LIST); two edits naming the
/// same `(name, resource)` pair are both sent, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEdit {
    /// Attribute identifier.
    pub name: String,
    /// Resource subscript for resource-list edits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// New value, as text.
    pub value: String,
}

impl AttributeEdit {
    /// Builds an edit for a plain attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource: None,
            value: value.into(),
        }
    }

    /// Builds an edit for one resource of a subscripted attribute.
    #[must_use]
    pub fn with_resource(
        name: impl Into<String>,
        resource: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            resource: Some(resource.into()),
            value: value.into(),
        }
    }
}

/// A server's refusal of one specific attribute edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeError {
    /// The edit that was refused.
    pub attribute: AttributeEdit,
    /// Server error code.
    pub code: i32,
    /// Human-readable reason.
    pub message: String,
}

/// Requests sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Request {
    /// Applies the attribute edits to a job.
    AlterJob {
        /// Fully qualified job identifier.
        job_id: String,
        /// Edits in the order given on the command line.
        attributes: Vec<AttributeEdit>,
    },
    /// Asks which server currently owns a job.
    LocateJob {
        /// Fully qualified job identifier.
        job_id: String,
    },
}

/// Replies sent by the server; exactly one per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    /// The request succeeded.
    Ok,
    /// The job is owned by `server`.
    Located {
        /// Server name, `host[:port]`.
        server: String,
    },
    /// The request failed.
    Error {
        /// Server error code.
        code: i32,
        /// Human-readable reason.
        message: String,
        /// Per-attribute refusals, empty when the failure is not attribute
        /// specific.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attribute_errors: Vec<AttributeError>,
    },
}

impl Reply {
    /// Builds an error reply without attribute detail.
    #[must_use]
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
            attribute_errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alter_request_serialises_with_kind_tag() {
        let request = Request::AlterJob {
            job_id: String::from("12.pbs01"),
            attributes: vec![
                AttributeEdit::new("Job_Name", "renamed"),
                AttributeEdit::with_resource("Resource_List", "walltime", "1:00:00"),
            ],
        };
        let json = serde_json::to_string(&request).expect("serialise request");
        assert_eq!(
            json,
            concat!(
                r#"{"kind":"alter_job","job_id":"12.pbs01","attributes":["#,
                r#"{"name":"Job_Name","value":"renamed"},"#,
                r#"{"name":"Resource_List","resource":"walltime","value":"1:00:00"}]}"#
            )
        );
    }

    #[test]
    fn error_reply_defaults_missing_attribute_errors() {
        let reply: Reply =
            serde_json::from_str(r#"{"kind":"error","code":15001,"message":"Unknown Job Id"}"#)
                .expect("parse reply");
        assert_eq!(reply, Reply::error(15001, "Unknown Job Id"));
    }
}
