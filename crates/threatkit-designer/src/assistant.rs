//! AI assistant collaborator.
//!
//! The assistant reads a [`DocumentSnapshot`] of the open document. Its
//! output is opaque to the engine: suggestion bags are merged into a node
//! without overwriting, and reports are stored verbatim.

use async_trait::async_trait;
use thiserror::Error;
use threatkit_core::SessionError;

use crate::model::{DocumentSnapshot, PropertyBag};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssistantError {
    #[error("Assistant unavailable: {0}")]
    Unavailable(String),

    #[error("Assistant rejected the request: {0}")]
    Rejected(String),
}

impl AssistantError {
    pub fn into_session_error(self, operation: &str) -> SessionError {
        SessionError::io(operation, self)
    }
}

#[async_trait]
pub trait Assistant: Send + Sync {
    /// Suggests properties for one element of the snapshot.
    async fn suggest_properties(
        &self,
        snapshot: &DocumentSnapshot,
        element_id: &str,
    ) -> Result<PropertyBag, AssistantError>;

    /// Produces a formatted report for the whole snapshot.
    async fn generate_report(&self, snapshot: &DocumentSnapshot) -> Result<String, AssistantError>;
}
