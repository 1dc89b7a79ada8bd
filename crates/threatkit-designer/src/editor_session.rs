//! Async driver for an [`EditorState`].
//!
//! [`EditorSession`] runs the collaborator calls the state asks for. The
//! state sits behind a `parking_lot::Mutex` that is only ever locked for
//! synchronous work; no guard lives across an `.await`, so two loads, or a
//! save and a load, can be in flight at once and resolve in any order.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use threatkit_core::{GraphError, ModelKind, SessionError};

use crate::assistant::Assistant;
use crate::editor_state::EditorState;
use crate::model::{DocumentId, DocumentSummary, Report};
use crate::persistence::DocumentStore;
use crate::session::{ExternalIdentity, IdentityAction, LoadDecision, LoadTicket, NewDecision};

/// Failure of an editor operation that can hit either the session or the
/// graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// An editor bound to a document store.
#[derive(Clone)]
pub struct EditorSession {
    state: Arc<Mutex<EditorState>>,
    store: Arc<dyn DocumentStore>,
}

impl EditorSession {
    pub fn new(state: EditorState, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            store,
        }
    }

    /// Shared handle to the editor state for synchronous gestures.
    pub fn state(&self) -> &Arc<Mutex<EditorState>> {
        &self.state
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Runs `f` against the locked state.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut EditorState) -> R) -> R {
        f(&mut self.state.lock())
    }

    pub fn request_new(&self, name: &str, kind: ModelKind) -> Result<NewDecision, SessionError> {
        self.state.lock().request_new(name, kind)
    }

    /// Loads `id`.
    ///
    /// Returns `Ok(true)` if this call's result replaced the graph, and
    /// `Ok(false)` if it was a duplicate, was queued behind a save, or
    /// resolved after a newer load.
    pub async fn load(&self, id: impl Into<DocumentId>) -> Result<bool, SessionError> {
        let decision = self.state.lock().begin_load(id.into());
        match decision {
            LoadDecision::Start(ticket) => self.run_load(ticket).await,
            LoadDecision::AlreadyInFlight | LoadDecision::Queued => Ok(false),
        }
    }

    async fn run_load(&self, ticket: LoadTicket) -> Result<bool, SessionError> {
        let result = self
            .store
            .load_document(&ticket.id)
            .await
            .map_err(|e| e.into_session_error("load"));
        self.state.lock().finish_load(&ticket, result)
    }

    /// Saves the open document and returns its id.
    ///
    /// A load that was queued behind the save runs before this returns;
    /// its failure is reported through notifications, not here.
    pub async fn save(&self) -> Result<DocumentId, SessionError> {
        let (ticket, request) = self.state.lock().begin_save()?;
        let result = self
            .store
            .save_document(request)
            .await
            .map_err(|e| e.into_session_error("save"));
        let outcome = self.state.lock().finish_save(&ticket, result);

        if let Some(next) = outcome.next_load {
            if let Err(e) = self.run_load(next).await {
                tracing::warn!("Queued load failed: {}", e);
            }
        }
        outcome.result
    }

    /// Applies an external identity token (a document id or `"new"`).
    pub async fn navigate(&self, token: &str) -> Result<IdentityAction, SessionError> {
        let action = self
            .state
            .lock()
            .on_identity_changed(ExternalIdentity::parse(token))?;
        if let IdentityAction::Load(ticket) = &action {
            self.run_load(ticket.clone()).await?;
        }
        Ok(action)
    }

    /// Lists the configured owner's documents, newest first.
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>, SessionError> {
        let owner = self.state.lock().defaults().owner_id.clone();
        self.store
            .list_documents(&owner)
            .await
            .map_err(|e| e.into_session_error("list"))
    }

    /// Asks the assistant for a report and stores it verbatim.
    pub async fn generate_report(&self, assistant: &dyn Assistant) -> Result<Report, SessionError> {
        let snapshot = self.state.lock().document_snapshot();
        match assistant.generate_report(&snapshot).await {
            Ok(content) => Ok(self.state.lock().add_report(content)),
            Err(e) => {
                let error = e.into_session_error("report");
                self.state.lock().notifier().error(&error);
                Err(error)
            }
        }
    }

    /// Asks the assistant for properties of `element_id` and merges them
    /// without overwriting. Returns the number of keys added.
    pub async fn suggest_properties(
        &self,
        assistant: &dyn Assistant,
        element_id: &str,
    ) -> Result<usize, EditorError> {
        let snapshot = {
            let state = self.state.lock();
            if state.graph().node(element_id).is_none() {
                return Err(GraphError::UnknownElement {
                    id: element_id.to_string(),
                }
                .into());
            }
            state.document_snapshot()
        };

        let suggestions = match assistant.suggest_properties(&snapshot, element_id).await {
            Ok(bag) => bag,
            Err(e) => {
                let error = e.into_session_error("suggest");
                self.state.lock().notifier().error(&error);
                return Err(error.into());
            }
        };

        Ok(self.state.lock().apply_suggestions(element_id, suggestions)?)
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("state", &*self.state.lock())
            .finish()
    }
}
