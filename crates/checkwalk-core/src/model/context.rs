//! Review context threaded through a walk
//!
//! The context is owned by the caller of the walk and passed by reference to
//! every task and condition. Tasks append outcomes; conditions read them.
//! The engine itself never inspects context fields beyond handing the
//! context to collaborators.

use std::collections::HashMap;

use checkwalk_core_types::RequestContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity and description of the subject under review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Stable identifier for the subject (e.g. a document URI)
    pub id: String,

    /// Human-readable description
    pub description: String,
}

impl Subject {
    /// Create a new subject
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subject({})", self.id)
    }
}

/// Result status recorded by a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeStatus {
    /// The check passed
    Passed,
    /// The check found a conformance failure
    Failed,
    /// The check completed with non-fatal findings
    Warning,
}

/// A single result produced by a check task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Identifier of the check that produced this outcome
    pub check_id: String,

    /// Result status
    pub status: OutcomeStatus,

    /// Optional human-readable message
    pub message: Option<String>,

    /// Optional structured payload from the checking collaborator
    pub details: Option<serde_json::Value>,

    /// When the outcome was recorded
    pub recorded_at: DateTime<Utc>,
}

impl Outcome {
    /// Create a new outcome with the current timestamp
    pub fn new(check_id: impl Into<String>, status: OutcomeStatus) -> Self {
        Self {
            check_id: check_id.into(),
            status,
            message: None,
            details: None,
            recorded_at: Utc::now(),
        }
    }

    /// Attach a human-readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach a structured payload
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Outcome({}, {:?})", self.check_id, self.status)
    }
}

/// Mutable per-walk state: the subject under review plus accumulated results
///
/// Exclusively owned by a single walk. The tree itself is read-only and may
/// be shared; the context is where all mutation happens.
#[derive(Debug, Clone)]
pub struct ReviewContext {
    review_id: String,
    request: RequestContext,
    subject: Subject,
    parameters: HashMap<String, String>,
    outcomes: Vec<Outcome>,
    created_at: DateTime<Utc>,
}

impl ReviewContext {
    /// Create a new context for the given subject
    ///
    /// Generates a UUIDv7 review id and a fresh request context.
    pub fn new(subject: Subject) -> Self {
        Self::with_request(subject, RequestContext::new())
    }

    /// Create a context correlated with an existing surrounding request
    pub fn with_request(subject: Subject, request: RequestContext) -> Self {
        Self {
            review_id: Uuid::now_v7().to_string(),
            request,
            subject,
            parameters: HashMap::new(),
            outcomes: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Get the review id
    pub fn review_id(&self) -> &str {
        &self.review_id
    }

    /// Get the correlation context of the surrounding request
    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    /// Get the subject under review
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// When the context was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Set an input parameter for the checks
    pub fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(key.into(), value.into());
    }

    /// Get an input parameter, if set
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Append an outcome produced by a check
    ///
    /// Outcomes are append-only: recording a second outcome for the same
    /// check id keeps both, and [`ReviewContext::outcome`] returns the
    /// latest.
    pub fn record_outcome(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// All outcomes in recording order
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// The latest outcome recorded for the given check id, if any
    pub fn outcome(&self, check_id: &str) -> Option<&Outcome> {
        self.outcomes.iter().rev().find(|o| o.check_id == check_id)
    }

    /// Whether any recorded outcome is a failure
    pub fn has_failure(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| o.status == OutcomeStatus::Failed)
    }
}
