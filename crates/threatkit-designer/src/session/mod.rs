//! Session state machine.
//!
//! - `controller`: the pure [`SessionController`] that decides every
//!   load/save/new transition
//! - `notifier`: rate-limited user notifications

mod controller;
mod notifier;

pub use controller::{
    IdentityAction, LoadDecision, LoadResolution, LoadTicket, NewDecision, SaveResolution,
    SaveTicket, SessionController,
};
pub use notifier::Notifier;

use std::fmt;

use threatkit_core::constants::NEW_DOCUMENT_SENTINEL;
use threatkit_core::ModelKind;

use crate::model::DocumentId;

/// What the external identity source (the route) asks the session to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalIdentity {
    /// Start a new, unsaved document.
    New,
    /// Show a persisted document.
    Existing(DocumentId),
}

impl ExternalIdentity {
    /// Parses a route token; the `"new"` sentinel and blank tokens mean
    /// [`ExternalIdentity::New`].
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() || token.eq_ignore_ascii_case(NEW_DOCUMENT_SENTINEL) {
            ExternalIdentity::New
        } else {
            ExternalIdentity::Existing(DocumentId::new(token))
        }
    }
}

impl fmt::Display for ExternalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalIdentity::New => f.write_str(NEW_DOCUMENT_SENTINEL),
            ExternalIdentity::Existing(id) => write!(f, "{}", id),
        }
    }
}

/// Where the session is.
///
/// `New` is the ready state of an unsaved document (bound id `None`);
/// `Ready` always carries the bound id.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    New {
        name: String,
        kind: ModelKind,
    },
    Loading(DocumentId),
    Ready(DocumentId),
    Error(String),
}

impl SessionState {
    /// Short label for logs and events.
    pub fn label(&self) -> String {
        match self {
            SessionState::Uninitialized => "uninitialized".to_string(),
            SessionState::New { .. } => "new".to_string(),
            SessionState::Loading(id) => format!("loading({})", id),
            SessionState::Ready(id) => format!("ready({})", id),
            SessionState::Error(_) => "error".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SessionState::Error(_))
    }

    /// True for the settled states an editor can work in.
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::New { .. } | SessionState::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identity() {
        assert_eq!(ExternalIdentity::parse("new"), ExternalIdentity::New);
        assert_eq!(ExternalIdentity::parse(" NEW "), ExternalIdentity::New);
        assert_eq!(ExternalIdentity::parse(""), ExternalIdentity::New);
        assert_eq!(
            ExternalIdentity::parse("a1b2"),
            ExternalIdentity::Existing(DocumentId::new("a1b2"))
        );
        assert_eq!(ExternalIdentity::parse("a1b2").to_string(), "a1b2");
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(SessionState::default().label(), "uninitialized");
        assert_eq!(SessionState::Ready("d".into()).label(), "ready(d)");
        assert!(SessionState::New {
            name: "x".into(),
            kind: ModelKind::Process
        }
        .is_ready());
        assert!(!SessionState::Loading("d".into()).is_ready());
    }
}
