//! Error handling for ThreatKit
//!
//! Provides the error taxonomy shared by every layer of the diagram engine:
//! - Validation errors (rejected before any I/O, no state change)
//! - Graph errors (view-model mutations that cannot be applied)
//! - Session errors (load/save/create transitions)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Validation error type
///
/// Raised for input that is rejected before any I/O is attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Document name is empty or whitespace
    #[error("Document name must not be empty")]
    EmptyName,

    /// A required property is missing from an element's property bag
    #[error("Element '{element}' is missing required property '{key}'")]
    MissingProperty {
        /// The element id.
        element: String,
        /// The missing property key.
        key: String,
    },

    /// Geometry values are not usable (negative or non-finite)
    #[error("Invalid geometry for '{element}': {reason}")]
    InvalidGeometry {
        /// The element id.
        element: String,
        /// Why the geometry was rejected.
        reason: String,
    },
}

/// Graph view-model error type
///
/// Represents mutations that reference elements the graph does not hold,
/// or that would break a structural invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// No node or edge has this id
    #[error("Unknown element: {id}")]
    UnknownElement {
        /// The requested id.
        id: String,
    },

    /// An element with this id already exists
    #[error("Duplicate element id: {id}")]
    DuplicateId {
        /// The conflicting id.
        id: String,
    },

    /// Source and target are the same node
    #[error("Cannot connect node '{id}' to itself")]
    SelfConnection {
        /// The node id.
        id: String,
    },

    /// Container shapes never take part in connections
    #[error("Node '{id}' is a container and cannot be connected")]
    NotConnectable {
        /// The container node id.
        id: String,
    },

    /// A connection endpoint does not exist
    #[error("Connection endpoint '{id}' does not exist")]
    UnknownEndpoint {
        /// The missing endpoint id.
        id: String,
    },

    /// A property patch carries a value the element cannot take
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Coarse error classification used for notifications and state decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Io,
    Integrity,
    Busy,
    Malformed,
}

impl ErrorKind {
    /// Lowercase label used in notifications and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Io => "io",
            Self::Integrity => "integrity",
            Self::Busy => "busy",
            Self::Malformed => "malformed",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session error type
///
/// Represents failures of session transitions (load, save, create). None of
/// these are fatal: every one is recoverable by retrying or starting a new
/// document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Input rejected before any I/O
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested document does not exist
    #[error("Document '{id}' not found")]
    NotFound {
        /// The requested document id.
        id: String,
    },

    /// Persistence or assistant collaborator failure
    #[error("{operation} failed: {message}")]
    Io {
        /// The operation that failed (load, save, list, report...).
        operation: String,
        /// The collaborator's error message.
        message: String,
    },

    /// A connection references a component that is not in the document
    #[error("Connection '{connection}' references missing component '{missing}'")]
    Integrity {
        /// The offending connection id.
        connection: String,
        /// The component id that could not be found.
        missing: String,
    },

    /// Another operation is pending and this one cannot interleave with it
    #[error("Operation in progress: {operation}")]
    Busy {
        /// The operation that is currently pending.
        operation: String,
    },

    /// The stored document could not be interpreted
    #[error("Malformed document: {message}")]
    Malformed {
        /// What was wrong with the document.
        message: String,
    },
}

impl SessionError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Io { .. } => ErrorKind::Io,
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::Busy { .. } => ErrorKind::Busy,
            Self::Malformed { .. } => ErrorKind::Malformed,
        }
    }

    /// Every session error can be recovered from by user retry or by
    /// starting a new document.
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Shorthand for an I/O failure of the named operation.
    pub fn io(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::Io {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Shorthand for a busy rejection.
    pub fn busy(operation: impl Into<String>) -> Self {
        Self::Busy {
            operation: operation.into(),
        }
    }
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Result type alias for graph mutations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;
